//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single page with:
//! - Grouped profile controls
//! - An explicit predict action
//! - The styled prediction result

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::SleepTheme;
pub use ui::form::{Control, FieldId, FormState, Section};
