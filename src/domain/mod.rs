//! Domain layer: Core types for sleep disorder prediction.
//!
//! Pure Rust types with no I/O. Categorical encodings live here as closed
//! enums so a missing table entry cannot compile.

mod prediction;
pub mod profile;

pub use prediction::{PredictionResult, Severity, SleepDisorder};
pub use profile::{
    BmiCategory, FeatureVector, FieldBounds, Gender, Occupation, UserProfile, FEATURE_COUNT,
    FEATURE_NAMES,
};
