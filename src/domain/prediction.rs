//! Prediction result types.
//!
//! Maps the classifier's class code to a labeled outcome.

use serde::{Deserialize, Serialize};

/// Display severity attached to a known outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Outcome predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepDisorder {
    NoDisorder,
    SleepApnea,
    Insomnia,
    /// The classifier returned a code outside the trained label set.
    Unknown,
}

impl SleepDisorder {
    /// Decode a class code.
    #[must_use]
    pub fn from_class_code(code: i64) -> Self {
        match code {
            0 => Self::NoDisorder,
            1 => Self::SleepApnea,
            2 => Self::Insomnia,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoDisorder => "No Disorder",
            Self::SleepApnea => "Sleep Apnea",
            Self::Insomnia => "Insomnia",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoDisorder => "You are unlikely to have a sleep disorder.",
            Self::SleepApnea => "Possible Sleep Apnea detected. Consider medical consultation.",
            Self::Insomnia => "Possible Insomnia detected. Try improving sleep hygiene.",
            Self::Unknown => "The model returned an unrecognized class code.",
        }
    }

    /// `None` for [`SleepDisorder::Unknown`], which has no defined styling.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::NoDisorder => Some(Severity::Success),
            Self::SleepApnea => Some(Severity::Warning),
            Self::Insomnia => Some(Severity::Error),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for SleepDisorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Labeled prediction ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw class code returned by the classifier
    pub class_code: i64,

    pub disorder: SleepDisorder,
}

impl PredictionResult {
    #[must_use]
    pub fn from_class_code(class_code: i64) -> Self {
        Self {
            class_code,
            disorder: SleepDisorder::from_class_code(class_code),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.disorder.label()
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.disorder.message()
    }

    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.disorder.severity()
    }
}
