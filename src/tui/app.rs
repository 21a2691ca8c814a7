//! Main TUI application.
//!
//! Handles:
//! - Input event handling
//! - Explicit, synchronous prediction on request

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::adapters::{shared_model, JsonModel};
use crate::application::PredictionService;
use crate::config::AppConfig;

use super::ui::{form::FormState, render_page, ModelSummary};

/// Main application state
pub struct App {
    /// Whether the app should quit
    should_quit: bool,

    service: PredictionService<JsonModel>,

    model_summary: ModelSummary,

    form_state: FormState,
}

impl App {
    /// Create the application, loading the model artifact.
    ///
    /// # Errors
    /// Returns error if the model artifact is missing, unreadable or corrupt.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let model = shared_model(&config.model_path).with_context(|| {
            format!(
                "Failed to load model from {:?}. Set {} to a valid model artifact.",
                config.model_path,
                crate::config::MODEL_PATH_ENV
            )
        })?;

        Ok(Self::with_service(PredictionService::new(model)))
    }

    /// Create the application around an existing service.
    #[must_use]
    pub fn with_service(service: PredictionService<JsonModel>) -> Self {
        let model_summary = ModelSummary::from(service.model());
        Self {
            should_quit: false,
            service,
            model_summary,
            form_state: FormState::default(),
        }
    }

    #[must_use]
    pub fn form_state(&self) -> &FormState {
        &self.form_state
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                render_page(f, area, &self.form_state, &self.model_summary);
            })?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('p') => self.predict(),
                KeyCode::Char('r') => self.form_state.reset(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Left => self.form_state.decrement(),
            KeyCode::Right => self.form_state.increment(),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Enter => {
                if self.form_state.button_focused() {
                    self.predict();
                } else {
                    self.form_state.next_field();
                }
            }
            _ => {}
        }
    }

    fn predict(&mut self) {
        self.form_state.commit_focused();
        let profile = self.form_state.profile();

        match self.service.predict(&profile) {
            Ok(result) => {
                self.form_state.result = Some(result);
                self.form_state.error_message = None;
            }
            Err(e) => {
                self.form_state.result = None;
                self.form_state.error_message = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifact::{Estimator, ModelArtifact, Tree, TreeNode, FORMAT_VERSION};
    use crate::domain::{SleepDisorder, FEATURE_NAMES};
    use std::sync::Arc;

    /// Insomnia when stress level > 6, otherwise no disorder.
    fn stress_model() -> JsonModel {
        JsonModel::from_artifact(ModelArtifact {
            format_version: FORMAT_VERSION,
            name: Some("stress".into()),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classes: vec![0, 1, 2],
            estimator: Estimator::DecisionTree(Tree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 6,
                        threshold: 6.5,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf {
                        value: vec![1.0, 0.0, 0.0],
                    },
                    TreeNode::Leaf {
                        value: vec![0.0, 0.0, 1.0],
                    },
                ],
            }),
        })
        .expect("valid artifact")
    }

    fn new_app() -> App {
        App::with_service(PredictionService::new(Arc::new(stress_model())))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_no_prediction_until_requested() {
        let mut app = new_app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert!(app.form_state().result.is_none());
    }

    #[test]
    fn test_enter_on_button_predicts() {
        let mut app = new_app();
        press(&mut app, KeyCode::Up); // wraps to the button
        assert!(app.form_state().button_focused());
        press(&mut app, KeyCode::Enter);
        let result = app.form_state().result.expect("result");
        assert_eq!(result.disorder, SleepDisorder::NoDisorder);
    }

    #[test]
    fn test_ctrl_p_predicts_current_inputs() {
        let mut app = new_app();
        // Stress level is the eighth control.
        for _ in 0..7 {
            press(&mut app, KeyCode::Tab);
        }
        for _ in 0..3 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.form_state().profile().stress_level, 8);

        ctrl(&mut app, 'p');
        let result = app.form_state().result.expect("result");
        assert_eq!(result.disorder, SleepDisorder::Insomnia);

        // Editing invalidates the shown result.
        press(&mut app, KeyCode::Left);
        assert!(app.form_state().result.is_none());
    }

    #[test]
    fn test_ctrl_r_resets_form() {
        let mut app = new_app();
        press(&mut app, KeyCode::Right);
        ctrl(&mut app, 'r');
        assert_eq!(app.form_state().profile(), crate::domain::UserProfile::default());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());

        let mut app = new_app();
        ctrl(&mut app, 'q');
        assert!(app.should_quit());
    }
}
