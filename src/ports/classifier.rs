//! Classifier port: Trait for the pre-trained model.
//!
//! This trait abstracts the model artifact from the application logic.

use std::path::PathBuf;

use crate::domain::FeatureVector;

/// Errors raised while loading or evaluating a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model artifact not readable at {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact is corrupt: {0}")]
    Corrupt(String),

    #[error("Model artifact digest mismatch (expected {expected}, got {actual})")]
    DigestMismatch { expected: String, actual: String },

    #[error("Model inference failed: {0}")]
    Inference(String),
}

/// A trained classifier.
///
/// Implementations must be deterministic and immutable after construction;
/// a single instance is shared for the whole process.
pub trait Classifier: Send + Sync {
    /// Predict one class code per input row.
    ///
    /// # Errors
    /// Returns `ModelError::Inference` if a row cannot be evaluated.
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<i64>, ModelError>;
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<i64>, ModelError> {
        (**self).predict(batch)
    }
}
