pub mod classifier;
pub mod decode;
pub mod labels;
pub mod preprocess;
#[cfg(feature = "torch")]
pub mod torch;

use std::path::Path;
use std::sync::Arc;

pub use classifier::{ClassificationResult, Classifier, InferenceModel};
pub use decode::{DecodeError, decode_image};
pub use labels::{LabelError, LabelSet};
pub use preprocess::{INPUT_SHAPE, preprocess};

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[cfg(feature = "torch")]
    #[error("failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },
    #[cfg(not(feature = "torch"))]
    #[error("no model backend compiled in; rebuild with `--features torch`")]
    BackendDisabled,
    #[error("input tensor has shape {actual:?}, expected {expected:?}")]
    InputShape {
        expected: [usize; 4],
        actual: Vec<usize>,
    },
    #[error("model produced {actual} outputs for {expected} labels")]
    OutputMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite output")]
    NonFinite,
    #[cfg(feature = "torch")]
    #[error("model error: {0}")]
    Model(String),
    #[error("label set: {0}")]
    Labels(#[from] LabelError),
    #[error("inference worker failed: {0}")]
    Worker(String),
}

#[cfg(feature = "torch")]
pub fn load_model(path: &Path) -> Result<Arc<dyn InferenceModel>, InferenceError> {
    Ok(Arc::new(torch::TorchModel::load(path)?))
}

#[cfg(not(feature = "torch"))]
pub fn load_model(path: &Path) -> Result<Arc<dyn InferenceModel>, InferenceError> {
    log::warn!(
        "Skipping model at {}: server built without the torch feature",
        path.display()
    );
    Err(InferenceError::BackendDisabled)
}
