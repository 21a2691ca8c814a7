//! Model artifact adapter: Implementation of `Classifier` backed by a JSON export.
//!
//! The training pipeline exports the fitted estimator as JSON together with
//! the feature names and class codes it was trained on. The artifact is
//! rejected unless its feature names match `FEATURE_NAMES` exactly, which is
//! the contract that keeps the encoded vector and the model in step.
//!
//! # Integrity
//!
//! The SHA-256 fingerprint of the artifact is always computed. If a sidecar
//! `<artifact>.sha256` file exists, its first token must equal that digest.
//!
//! # Caching
//!
//! `shared_model()` keeps the first successfully loaded artifact for the
//! lifetime of the process. Failed loads are not cached.

mod estimator;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, FEATURE_NAMES};
use crate::ports::{Classifier, ModelError};

pub use estimator::{Estimator, StandardScaler, Tree, TreeNode};

/// Artifact schema version understood by this loader.
pub const FORMAT_VERSION: u32 = 1;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/sleep_model.json";

static SHARED_MODEL: OnceLock<Arc<JsonModel>> = OnceLock::new();

/// Serialized model as written by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub feature_names: Vec<String>,
    /// Class code emitted for each estimator output index
    pub classes: Vec<i64>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Check the artifact against the encoder's feature contract.
    ///
    /// # Errors
    /// Returns `ModelError::Corrupt` describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::Corrupt(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        if !self.feature_names.iter().map(String::as_str).eq(FEATURE_NAMES) {
            return Err(ModelError::Corrupt(format!(
                "feature_names {:?} do not match expected order {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }
        if self.classes.is_empty() {
            return Err(ModelError::Corrupt("classes is empty".into()));
        }
        self.estimator
            .validate(self.classes.len())
            .map_err(ModelError::Corrupt)
    }
}

/// Loaded, validated model.
#[derive(Debug)]
pub struct JsonModel {
    artifact: ModelArtifact,
    fingerprint: String,
    source: PathBuf,
}

impl JsonModel {
    /// Build a model from an in-memory artifact.
    ///
    /// With no file behind it, the fingerprint is the SHA-256 of the
    /// artifact's compact JSON serialization.
    ///
    /// # Errors
    /// Returns `ModelError::Corrupt` if the artifact fails validation.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;
        let bytes = serde_json::to_vec(&artifact)
            .map_err(|e| ModelError::Corrupt(e.to_string()))?;
        Ok(Self {
            artifact,
            fingerprint: sha256_hex(&bytes),
            source: PathBuf::from("<memory>"),
        })
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.artifact.name.as_deref()
    }

    #[must_use]
    pub fn estimator_kind(&self) -> &'static str {
        self.artifact.estimator.kind()
    }

    #[must_use]
    pub fn classes(&self) -> &[i64] {
        &self.artifact.classes
    }

    /// Hex SHA-256 of the file bytes for `load_model`, of the compact JSON
    /// serialization for `from_artifact`.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    #[must_use]
    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..self.fingerprint.len().min(12)]
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Classifier for JsonModel {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<i64>, ModelError> {
        batch
            .iter()
            .map(|row| {
                if let Some(i) = row.as_slice().iter().position(|v| !v.is_finite()) {
                    return Err(ModelError::Inference(format!(
                        "feature {} is not a finite number",
                        FEATURE_NAMES[i]
                    )));
                }
                let idx = self.artifact.estimator.predict_index(row.as_slice());
                self.artifact.classes.get(idx).copied().ok_or_else(|| {
                    ModelError::Inference(format!("estimator produced class index {idx}"))
                })
            })
            .collect()
    }
}

/// Read, verify and validate a model artifact.
///
/// # Errors
/// Returns `ModelError::Unreadable` if the artifact (or its digest sidecar)
/// cannot be read, `ModelError::DigestMismatch` if the sidecar disagrees,
/// and `ModelError::Corrupt` if parsing or validation fails.
pub fn load_model(path: &Path) -> Result<JsonModel, ModelError> {
    let bytes = fs::read(path).map_err(|source| ModelError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let fingerprint = sha256_hex(&bytes);

    verify_digest_sidecar(path, &fingerprint)?;

    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).map_err(|e| ModelError::Corrupt(e.to_string()))?;
    artifact.validate()?;

    tracing::info!(
        "Loaded model from {:?} (name={}, estimator={}, classes={}, sha256={})",
        path,
        artifact.name.as_deref().unwrap_or("-"),
        artifact.estimator.kind(),
        artifact.classes.len(),
        &fingerprint[..12]
    );

    Ok(JsonModel {
        artifact,
        fingerprint,
        source: path.to_path_buf(),
    })
}

/// Process-wide model, loaded on first use and reused afterwards.
///
/// `path` only matters for the first successful call.
///
/// # Errors
/// Propagates `load_model` errors while nothing has been cached yet.
pub fn shared_model(path: &Path) -> Result<Arc<JsonModel>, ModelError> {
    if let Some(model) = SHARED_MODEL.get() {
        return Ok(Arc::clone(model));
    }
    let loaded = Arc::new(load_model(path)?);
    Ok(Arc::clone(SHARED_MODEL.get_or_init(|| loaded)))
}

fn digest_sidecar_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".sha256");
    PathBuf::from(s)
}

fn verify_digest_sidecar(path: &Path, actual: &str) -> Result<(), ModelError> {
    let sidecar = digest_sidecar_path(path);
    if !sidecar.exists() {
        tracing::debug!("No digest sidecar at {:?}; skipping integrity check", sidecar);
        return Ok(());
    }

    let content = fs::read_to_string(&sidecar).map_err(|source| ModelError::Unreadable {
        path: sidecar.clone(),
        source,
    })?;
    let expected = content
        .split_whitespace()
        .next()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ModelError::Corrupt(format!("digest sidecar {:?} is empty", sidecar)))?;

    if !constant_time_eq_str(&expected, actual) {
        return Err(ModelError::DigestMismatch {
            expected,
            actual: actual.to_string(),
        });
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BmiCategory, UserProfile};
    use tempfile::tempdir;

    fn stump_artifact() -> ModelArtifact {
        ModelArtifact {
            format_version: FORMAT_VERSION,
            name: Some("stump".into()),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classes: vec![0, 1, 2],
            estimator: Estimator::DecisionTree(Tree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 7,
                        threshold: 0.5,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf {
                        value: vec![10.0, 1.0, 1.0],
                    },
                    TreeNode::Leaf {
                        value: vec![1.0, 1.0, 10.0],
                    },
                ],
            }),
        }
    }

    fn write_artifact(path: &Path, artifact: &ModelArtifact) -> Vec<u8> {
        let bytes = serde_json::to_vec_pretty(artifact).expect("serialize artifact");
        fs::write(path, &bytes).expect("write artifact");
        bytes
    }

    #[test]
    fn test_load_and_predict() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        write_artifact(&path, &stump_artifact());

        let model = load_model(&path).expect("load model");
        assert_eq!(model.name(), Some("stump"));
        assert_eq!(model.estimator_kind(), "decision_tree");
        assert_eq!(model.fingerprint().len(), 64);

        let normal = UserProfile::default().encode();
        let obese = UserProfile {
            bmi_category: BmiCategory::Obese,
            ..UserProfile::default()
        }
        .encode();
        assert_eq!(model.predict(&[normal, obese]).expect("predict"), vec![0, 2]);
    }

    #[test]
    fn test_fingerprint_source() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        let file_bytes = write_artifact(&path, &stump_artifact());

        let loaded = load_model(&path).expect("load model");
        assert_eq!(loaded.fingerprint(), sha256_hex(&file_bytes));

        let in_memory = JsonModel::from_artifact(stump_artifact()).expect("model");
        let compact = serde_json::to_vec(&stump_artifact()).expect("serialize artifact");
        assert_eq!(in_memory.fingerprint(), sha256_hex(&compact));
        // Pretty-printed file and compact serialization hash differently.
        assert_ne!(in_memory.fingerprint(), loaded.fingerprint());
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let temp = tempdir().expect("tempdir");
        let err = load_model(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelError::Unreadable { .. }));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        fs::write(&path, b"\x80\x04\x95 not json").expect("write");
        assert!(matches!(load_model(&path), Err(ModelError::Corrupt(_))));
    }

    #[test]
    fn test_rejects_reordered_features() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        let mut artifact = stump_artifact();
        artifact.feature_names.swap(9, 8);
        write_artifact(&path, &artifact);

        let err = load_model(&path).unwrap_err();
        assert!(err.to_string().contains("feature_names"));
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let mut artifact = stump_artifact();
        artifact.format_version = 2;
        assert!(matches!(
            JsonModel::from_artifact(artifact),
            Err(ModelError::Corrupt(_))
        ));
    }

    #[test]
    fn test_digest_sidecar_match() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        let bytes = write_artifact(&path, &stump_artifact());
        let digest = sha256_hex(&bytes);
        fs::write(
            digest_sidecar_path(&path),
            format!("{}  model.json\n", digest.to_uppercase()),
        )
        .expect("write sidecar");

        let model = load_model(&path).expect("load with sidecar");
        assert_eq!(model.fingerprint(), digest);
    }

    #[test]
    fn test_digest_sidecar_mismatch() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        write_artifact(&path, &stump_artifact());
        fs::write(digest_sidecar_path(&path), "0".repeat(64)).expect("write sidecar");

        assert!(matches!(
            load_model(&path),
            Err(ModelError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_non_finite_row_is_inference_error() {
        let model = JsonModel::from_artifact(stump_artifact()).expect("model");
        let mut row = UserProfile::default().encode();
        row.0[3] = f64::NAN;
        assert!(matches!(
            model.predict(&[row]),
            Err(ModelError::Inference(_))
        ));
    }

    #[test]
    fn test_bundled_model_loads() {
        let model = load_model(Path::new(DEFAULT_MODEL_PATH)).expect("bundled model");
        assert_eq!(model.classes(), &[0, 1, 2]);
        let codes = model
            .predict(&[UserProfile::default().encode()])
            .expect("predict");
        assert_eq!(codes, vec![0]);
    }

    #[test]
    fn test_shared_model_is_cached() {
        // Only this test touches the process-wide cell.
        let missing = Path::new("models/does_not_exist.json");
        assert!(shared_model(missing).is_err());

        let first = shared_model(Path::new(DEFAULT_MODEL_PATH)).expect("first load");
        let second = shared_model(Path::new(DEFAULT_MODEL_PATH)).expect("second load");
        assert!(Arc::ptr_eq(&first, &second));

        let after = shared_model(missing).expect("cached model is reused");
        assert!(Arc::ptr_eq(&first, &after));
    }
}
