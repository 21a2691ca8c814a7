//! # Sleepsense
//!
//! Sleep disorder prediction from demographic, lifestyle and health metrics.
//!
//! This crate provides:
//! - Closed-enum label encodings matching the classifier's training data
//! - A validated JSON model artifact loader with a process-wide cache
//! - A terminal form that collects a profile and renders the prediction
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (UserProfile, FeatureVector, PredictionResult)
//! - `ports`: The `Classifier` trait
//! - `adapters`: The JSON model artifact implementation
//! - `application`: The prediction use case
//! - `tui`: Terminal user interface
//! - `config`: Environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::predict_disorder;
pub use domain::{PredictionResult, SleepDisorder, UserProfile};
pub use ports::{Classifier, ModelError};

/// Result type for Sleepsense operations
pub type Result<T> = std::result::Result<T, SleepsenseError>;

/// Main error type for Sleepsense
#[derive(Debug, thiserror::Error)]
pub enum SleepsenseError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid profile: {0}")]
    Validation(String),
}
