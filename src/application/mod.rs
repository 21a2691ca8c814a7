//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with the classifier port.

mod predictor;

pub use predictor::{predict_disorder, PredictionService};
