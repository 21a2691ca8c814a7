//! UI module: View components for the TUI.

pub mod form;
pub mod result;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::adapters::JsonModel;
use crate::tui::styles::SleepTheme;

use form::{render_form_sections, sections_height, FormState};
use result::{render_button, render_result};

/// Model details shown in the page header.
#[derive(Debug, Clone, Default)]
pub struct ModelSummary {
    pub name: String,
    pub estimator: String,
    pub fingerprint: String,
}

impl From<&JsonModel> for ModelSummary {
    fn from(model: &JsonModel) -> Self {
        Self {
            name: model.name().unwrap_or("unnamed").to_string(),
            estimator: model.estimator_kind().to_string(),
            fingerprint: model.short_fingerprint().to_string(),
        }
    }
}

/// Full layout height: header, bordered sections, button, result, footer, disclaimer.
const FULL_LAYOUT_HEIGHT: u16 = 35;

/// How much chrome the page can afford at the current terminal height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    Full,
    /// One-line header, button and footer; the form keeps every row.
    Compact,
}

impl Density {
    #[must_use]
    pub fn for_height(height: u16) -> Self {
        if height >= FULL_LAYOUT_HEIGHT {
            Self::Full
        } else {
            Self::Compact
        }
    }
}

/// Render the whole page: header, form, button, result, key hints.
pub fn render_page(f: &mut Frame, area: Rect, state: &FormState, model: &ModelSummary) {
    let density = Density::for_height(area.height);
    let sections = sections_height(state, density);

    match density {
        Density::Full => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4),        // Header
                    Constraint::Length(sections), // Sections
                    Constraint::Length(3),        // Button
                    Constraint::Length(5),        // Result
                    Constraint::Min(0),           // Padding
                    Constraint::Length(2),        // Footer
                    Constraint::Length(3),        // Disclaimer
                ])
                .split(area);

            render_header(f, chunks[0], model);
            render_form_sections(f, chunks[1], state, density);
            render_button(f, chunks[2], state, density);
            render_result(f, chunks[3], state);
            render_footer(f, chunks[5], density);
            render_disclaimer(f, chunks[6], density);
        }
        Density::Compact => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),        // Header
                    Constraint::Length(sections), // Sections
                    Constraint::Length(1),        // Button
                    Constraint::Length(4),        // Result
                    Constraint::Min(0),           // Disclaimer, if it fits
                    Constraint::Length(1),        // Footer
                ])
                .split(area);

            render_compact_header(f, chunks[0], model);
            render_form_sections(f, chunks[1], state, density);
            render_button(f, chunks[2], state, density);
            render_result(f, chunks[3], state);
            render_disclaimer(f, chunks[4], density);
            render_footer(f, chunks[5], density);
        }
    }
}

fn render_header(f: &mut Frame, area: Rect, model: &ModelSummary) {
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" ", SleepTheme::text()),
            Span::styled("Sleep Disorder Prediction", SleepTheme::title()),
        ]),
        Line::from(Span::styled(
            " Predict if you are likely to have a sleep disorder based on your health and lifestyle data.",
            SleepTheme::text_secondary(),
        )),
        Line::from(Span::styled(
            format!(
                " Model: {} ({}) │ sha256 {}",
                model.name, model.estimator, model.fingerprint
            ),
            SleepTheme::text_muted(),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(SleepTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_compact_header(f: &mut Frame, area: Rect, model: &ModelSummary) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Sleep Disorder Prediction", SleepTheme::title()),
        Span::styled(
            format!(" │ {} ({}) {}", model.name, model.estimator, model.fingerprint),
            SleepTheme::text_muted(),
        ),
    ]));

    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, area: Rect, density: Density) {
    let hints = Line::from(vec![
        Span::styled("[↑↓/Tab] ", SleepTheme::key_hint()),
        Span::styled("Field ", SleepTheme::key_desc()),
        Span::styled("[←→] ", SleepTheme::key_hint()),
        Span::styled("Adjust ", SleepTheme::key_desc()),
        Span::styled("[0-9] ", SleepTheme::key_hint()),
        Span::styled("Type ", SleepTheme::key_desc()),
        Span::styled("[Ctrl+P] ", SleepTheme::key_hint()),
        Span::styled("Predict ", SleepTheme::key_desc()),
        Span::styled("[Ctrl+R] ", SleepTheme::key_hint()),
        Span::styled("Reset ", SleepTheme::key_desc()),
        Span::styled("[Esc] ", SleepTheme::key_hint()),
        Span::styled("Quit", SleepTheme::key_desc()),
    ]);

    let footer = Paragraph::new(hints);
    let footer = match density {
        Density::Full => footer.block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(SleepTheme::border()),
        ),
        Density::Compact => footer,
    };

    f.render_widget(footer, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect, density: Density) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
        SleepTheme::text_muted(),
    )])];

    let p = Paragraph::new(text).wrap(Wrap { trim: true });
    let p = match density {
        Density::Full => p.block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(SleepTheme::border()),
        ),
        Density::Compact => p,
    };

    f.render_widget(p, area);
}
