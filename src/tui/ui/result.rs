//! Predict button and result panel.

use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{PredictionResult, Severity};
use crate::tui::styles::SleepTheme;

use super::form::FormState;
use super::Density;

pub const BUTTON_LABEL: &str = "Predict Sleep Disorder";

pub fn render_button(f: &mut Frame, area: Rect, state: &FormState, density: Density) {
    let focused = state.button_focused();
    let (style, border) = if focused {
        (SleepTheme::selected(), SleepTheme::border_focused())
    } else {
        (SleepTheme::focused(), SleepTheme::border())
    };

    let button = Paragraph::new(Line::from(Span::styled(
        format!(" {BUTTON_LABEL} "),
        style,
    )))
    .alignment(Alignment::Center);

    let button = match density {
        Density::Full => button.block(Block::default().borders(Borders::ALL).border_style(border)),
        Density::Compact => button,
    };

    f.render_widget(button, area);
}

/// Render the latest result, an error, or nothing.
pub fn render_result(f: &mut Frame, area: Rect, state: &FormState) {
    if let Some(err) = &state.error_message {
        let content = Paragraph::new(vec![
            Line::from(Span::styled("! Prediction failed", SleepTheme::danger())),
            Line::from(Span::styled(err.clone(), SleepTheme::text())),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(SleepTheme::danger()),
        );
        f.render_widget(content, area);
        return;
    }

    let Some(result) = &state.result else {
        return;
    };

    f.render_widget(result_panel(result), area);
}

fn result_panel(result: &PredictionResult) -> Paragraph<'static> {
    let style = SleepTheme::severity(result.severity());
    let icon = match result.severity() {
        Some(Severity::Success) => "OK",
        Some(Severity::Warning) => "!",
        Some(Severity::Error) => "!!",
        None => "?",
    };

    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{icon} {} (class {})", result.label(), result.class_code),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(result.message(), style)),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Prediction Result ", SleepTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(style),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn panel_text(result: PredictionResult) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 4)).expect("terminal");
        terminal
            .draw(|f| {
                let area = f.area();
                f.render_widget(result_panel(&result), area);
            })
            .expect("draw");
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_result_headline_per_class() {
        let cases = [
            (0, "OK No Disorder (class 0)"),
            (1, "! Sleep Apnea (class 1)"),
            (2, "!! Insomnia (class 2)"),
            (7, "? Unknown (class 7)"),
        ];
        for (code, headline) in cases {
            let text = panel_text(PredictionResult::from_class_code(code));
            assert!(text.contains(headline), "missing {headline:?} in\n{text}");
        }
    }
}
