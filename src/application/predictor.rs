//! Prediction service: Orchestrates encode, classify and label.
//!
//! Profile values and results are never logged or stored.

use std::sync::Arc;

use crate::domain::{PredictionResult, UserProfile};
use crate::ports::{Classifier, ModelError};
use crate::SleepsenseError;

/// Encode a profile, classify it as a one-row batch and label the outcome.
///
/// # Errors
/// Returns the model's error, or `ModelError::Inference` if it returns no
/// class code for the row.
pub fn predict_disorder<C>(profile: &UserProfile, model: &C) -> Result<PredictionResult, ModelError>
where
    C: Classifier + ?Sized,
{
    let features = profile.encode();
    let codes = model.predict(&[features])?;
    let code = codes
        .first()
        .copied()
        .ok_or_else(|| ModelError::Inference("model returned an empty batch".into()))?;
    Ok(PredictionResult::from_class_code(code))
}

/// Service holding the shared classifier.
pub struct PredictionService<C>
where
    C: Classifier,
{
    model: Arc<C>,
}

impl<C> PredictionService<C>
where
    C: Classifier,
{
    /// Create a new prediction service.
    pub fn new(model: Arc<C>) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn model(&self) -> &C {
        &self.model
    }

    /// Run one prediction for the given profile.
    ///
    /// # Errors
    /// Returns `SleepsenseError::Validation` if a field is out of range and
    /// `SleepsenseError::Model` if the classifier fails.
    pub fn predict(&self, profile: &UserProfile) -> Result<PredictionResult, SleepsenseError> {
        tracing::debug!("Prediction requested");
        profile
            .validate()
            .map_err(|errors| SleepsenseError::Validation(errors.join(", ")))?;

        predict_disorder(profile, self.model.as_ref()).map_err(|e| {
            tracing::error!("Prediction failed: {}", e);
            SleepsenseError::Model(e)
        })
    }
}
