//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifact`: JSON model artifact loading, integrity check and evaluation

pub mod artifact;

pub use artifact::{load_model, shared_model, JsonModel, ModelArtifact, DEFAULT_MODEL_PATH};
