//! Profile input form.
//!
//! Every control clamps to its field bounds, so `FormState::profile()` always
//! yields an in-range profile.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::profile::{
    AGE, DAILY_STEPS, HEART_RATE, LOWER_BP, PHYSICAL_ACTIVITY, QUALITY_OF_SLEEP, SLEEP_DURATION,
    STRESS_LEVEL, UPPER_BP,
};
use crate::domain::{BmiCategory, FieldBounds, Gender, Occupation, PredictionResult, UserProfile};
use crate::tui::styles::SleepTheme;

use super::Density;

const SLIDER_WIDTH: usize = 24;
const MAX_INPUT_DIGITS: usize = 5;

/// Page section a field is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Personal,
    SleepActivity,
    Health,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Personal, Section::SleepActivity, Section::Health];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::SleepActivity => "Sleep & Activity",
            Self::Health => "Health Metrics",
        }
    }
}

/// Profile attribute backing a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Gender,
    Age,
    Occupation,
    SleepDuration,
    QualityOfSleep,
    PhysicalActivity,
    DailySteps,
    StressLevel,
    BmiCategory,
    HeartRate,
    UpperBp,
    LowerBp,
}

/// Input control with its current value.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Cycles through a closed option list.
    Select {
        options: Vec<&'static str>,
        selected: usize,
    },
    /// Moves in fixed steps between the bounds.
    Slider { bounds: FieldBounds, value: f64 },
    /// Accepts typed digits; the value is clamped when committed.
    Number {
        bounds: FieldBounds,
        value: f64,
        buffer: Option<String>,
    },
}

impl Control {
    fn select(options: Vec<&'static str>) -> Self {
        Self::Select {
            options,
            selected: 0,
        }
    }

    fn slider(bounds: FieldBounds) -> Self {
        Self::Slider {
            bounds,
            value: bounds.default,
        }
    }

    fn number(bounds: FieldBounds) -> Self {
        Self::Number {
            bounds,
            value: bounds.default,
            buffer: None,
        }
    }

    /// Current value including any uncommitted typed input.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Select { selected, .. } => *selected as f64,
            Self::Slider { value, .. } => *value,
            Self::Number {
                bounds,
                value,
                buffer,
            } => buffer
                .as_deref()
                .and_then(|b| b.parse::<f64>().ok())
                .map_or(*value, |typed| bounds.clamp(typed)),
        }
    }

    fn selected_index(&self) -> usize {
        match self {
            Self::Select { selected, .. } => *selected,
            _ => 0,
        }
    }

    fn commit(&mut self) {
        let committed = self.value();
        if let Self::Number { value, buffer, .. } = self {
            *value = committed;
            *buffer = None;
        }
    }

    /// Move by `direction` steps (negative = down/left).
    fn step(&mut self, direction: i8) {
        self.commit();
        match self {
            Self::Select { options, selected } => {
                let len = options.len();
                *selected = if direction < 0 {
                    (*selected + len - 1) % len
                } else {
                    (*selected + 1) % len
                };
            }
            Self::Slider { bounds, value } | Self::Number { bounds, value, .. } => {
                *value = bounds.clamp(*value + f64::from(direction) * bounds.step);
            }
        }
    }

    fn input_digit(&mut self, c: char) -> bool {
        match self {
            Self::Number { buffer, .. } if c.is_ascii_digit() => {
                let buf = buffer.get_or_insert_with(String::new);
                if buf.len() < MAX_INPUT_DIGITS {
                    buf.push(c);
                }
                true
            }
            _ => false,
        }
    }

    fn delete_digit(&mut self) -> bool {
        match self {
            Self::Number { value, buffer, .. } => {
                let buf = buffer.get_or_insert_with(|| format!("{value:.0}"));
                buf.pop();
                true
            }
            _ => false,
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Select { options, selected } => format!("< {} >", options[*selected]),
            Self::Slider { bounds, value } => {
                let ratio = (value - bounds.min) / (bounds.max - bounds.min);
                let filled = (ratio * SLIDER_WIDTH as f64).round() as usize;
                format!(
                    "{}●{} {}",
                    "━".repeat(filled),
                    "─".repeat(SLIDER_WIDTH - filled),
                    format_value(bounds, *value)
                )
            }
            Self::Number {
                bounds,
                value,
                buffer,
            } => match buffer {
                Some(b) => format!("{b}_"),
                None => format_value(bounds, *value),
            },
        }
    }
}

fn format_value(bounds: &FieldBounds, value: f64) -> String {
    if bounds.step.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub section: Section,
    pub label: &'static str,
    pub hint: &'static str,
    pub control: Control,
}

/// Form state: controls, focus and the latest prediction.
pub struct FormState {
    pub fields: Vec<FormField>,
    /// Index into `fields`; `fields.len()` is the predict button.
    pub focus: usize,
    pub result: Option<PredictionResult>,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        let field = |id, section, label, hint, control| FormField {
            id,
            section,
            label,
            hint,
            control,
        };

        Self {
            fields: vec![
                field(
                    FieldId::Gender,
                    Section::Personal,
                    "Gender",
                    "",
                    Control::select(Gender::ALL.iter().map(|g| g.label()).collect()),
                ),
                field(FieldId::Age, Section::Personal, "Age", "years (10-100)", Control::number(AGE)),
                field(
                    FieldId::Occupation,
                    Section::Personal,
                    "Occupation",
                    "",
                    Control::select(Occupation::ALL.iter().map(|o| o.label()).collect()),
                ),
                field(
                    FieldId::SleepDuration,
                    Section::SleepActivity,
                    "Sleep Duration",
                    "hours",
                    Control::slider(SLEEP_DURATION),
                ),
                field(
                    FieldId::QualityOfSleep,
                    Section::SleepActivity,
                    "Quality of Sleep",
                    "1-10",
                    Control::slider(QUALITY_OF_SLEEP),
                ),
                field(
                    FieldId::PhysicalActivity,
                    Section::SleepActivity,
                    "Physical Activity",
                    "minutes/day",
                    Control::slider(PHYSICAL_ACTIVITY),
                ),
                field(
                    FieldId::DailySteps,
                    Section::SleepActivity,
                    "Daily Steps",
                    "0-30000, step 500",
                    Control::number(DAILY_STEPS),
                ),
                field(
                    FieldId::StressLevel,
                    Section::Health,
                    "Stress Level",
                    "1-10",
                    Control::slider(STRESS_LEVEL),
                ),
                field(
                    FieldId::BmiCategory,
                    Section::Health,
                    "BMI Category",
                    "",
                    Control::select(BmiCategory::ALL.iter().map(|b| b.label()).collect()),
                ),
                field(
                    FieldId::HeartRate,
                    Section::Health,
                    "Heart Rate",
                    "bpm (40-180)",
                    Control::number(HEART_RATE),
                ),
                field(
                    FieldId::UpperBp,
                    Section::Health,
                    "Upper BP (Systolic)",
                    "mmHg (90-180)",
                    Control::number(UPPER_BP),
                ),
                field(
                    FieldId::LowerBp,
                    Section::Health,
                    "Lower BP (Diastolic)",
                    "mmHg (60-120)",
                    Control::number(LOWER_BP),
                ),
            ],
            focus: 0,
            result: None,
            error_message: None,
        }
    }
}

impl FormState {
    /// Whether the predict button has focus.
    #[must_use]
    pub fn button_focused(&self) -> bool {
        self.focus == self.fields.len()
    }

    /// Move to the next field (wrapping through the button)
    pub fn next_field(&mut self) {
        self.commit_focused();
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        self.commit_focused();
        if self.focus == 0 {
            self.focus = self.fields.len();
        } else {
            self.focus -= 1;
        }
    }

    pub fn increment(&mut self) {
        self.step_focused(1);
    }

    pub fn decrement(&mut self) {
        self.step_focused(-1);
    }

    /// Type a digit into the focused number input.
    pub fn input_char(&mut self, c: char) {
        let changed = self
            .focused_control()
            .is_some_and(|control| control.input_digit(c));
        if changed {
            self.invalidate_result();
        }
    }

    /// Delete the last typed digit of the focused number input.
    pub fn delete_char(&mut self) {
        let changed = self
            .focused_control()
            .is_some_and(Control::delete_digit);
        if changed {
            self.invalidate_result();
        }
    }

    /// Clamp and store any typed input on the focused field.
    pub fn commit_focused(&mut self) {
        if let Some(control) = self.focused_control() {
            control.commit();
        }
    }

    /// Restore every control to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Snapshot the current values.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        let mut profile = UserProfile::default();
        for field in &self.fields {
            let control = &field.control;
            let int = || control.value().round() as u32;
            match field.id {
                FieldId::Gender => profile.gender = Gender::ALL[control.selected_index()],
                FieldId::Age => profile.age = int(),
                FieldId::Occupation => {
                    profile.occupation = Occupation::ALL[control.selected_index()];
                }
                FieldId::SleepDuration => profile.sleep_duration = control.value(),
                FieldId::QualityOfSleep => profile.quality_of_sleep = int(),
                FieldId::PhysicalActivity => profile.physical_activity = int(),
                FieldId::DailySteps => profile.daily_steps = int(),
                FieldId::StressLevel => profile.stress_level = int(),
                FieldId::BmiCategory => {
                    profile.bmi_category = BmiCategory::ALL[control.selected_index()];
                }
                FieldId::HeartRate => profile.heart_rate = int(),
                FieldId::UpperBp => profile.upper_bp = int(),
                FieldId::LowerBp => profile.lower_bp = int(),
            }
        }
        profile
    }

    fn focused_control(&mut self) -> Option<&mut Control> {
        self.fields.get_mut(self.focus).map(|f| &mut f.control)
    }

    fn step_focused(&mut self, direction: i8) {
        if let Some(control) = self.focused_control() {
            control.step(direction);
            self.invalidate_result();
        }
    }

    // A shown result always describes the current inputs.
    fn invalidate_result(&mut self) {
        self.result = None;
        self.error_message = None;
    }
}

/// Rows the three sections need, borders included.
#[must_use]
pub fn sections_height(state: &FormState, density: Density) -> u16 {
    Section::ALL
        .iter()
        .map(|s| section_height(state, *s, density))
        .sum()
}

fn section_height(state: &FormState, section: Section, density: Density) -> u16 {
    let rows = state.fields.iter().filter(|fl| fl.section == section).count() as u16;
    match density {
        Density::Full => rows + 2,
        // Title sits on the top rule, no bottom border.
        Density::Compact => rows + 1,
    }
}

/// Render the three field sections into `area`.
pub fn render_form_sections(f: &mut Frame, area: Rect, state: &FormState, density: Density) {
    let heights: Vec<Constraint> = Section::ALL
        .iter()
        .map(|s| Constraint::Length(section_height(state, *s, density)))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(heights)
        .split(area);

    for (i, section) in Section::ALL.iter().enumerate() {
        render_section(f, chunks[i], state, *section, density);
    }
}

fn render_section(
    f: &mut Frame,
    area: Rect,
    state: &FormState,
    section: Section,
    density: Density,
) {
    let has_focus = state
        .fields
        .get(state.focus)
        .is_some_and(|fl| fl.section == section);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", section.title()), SleepTheme::subtitle()))
        .borders(match density {
            Density::Full => Borders::ALL,
            Density::Compact => Borders::TOP,
        })
        .border_style(if has_focus {
            SleepTheme::border_focused()
        } else {
            SleepTheme::border()
        });

    let lines: Vec<Line> = state
        .fields
        .iter()
        .enumerate()
        .filter(|(_, fl)| fl.section == section)
        .map(|(i, fl)| field_line(fl, i == state.focus))
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(field: &FormField, focused: bool) -> Line<'static> {
    let (marker, label_style, value_style) = if focused {
        ("▶ ", SleepTheme::focused(), SleepTheme::focused())
    } else {
        ("  ", SleepTheme::text_secondary(), SleepTheme::text())
    };

    Line::from(vec![
        Span::styled(marker, SleepTheme::focused()),
        Span::styled(format!("{:<22}", field.label), label_style),
        Span::styled(field.control.display(), value_style),
        Span::styled(format!("  {}", field.hint), SleepTheme::text_muted()),
    ])
}
