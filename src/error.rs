//! Error types for the demography contract

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the normalizer, the dispatcher and the concrete models.
#[derive(Debug, Error)]
pub enum DemographyError {
    /// A model was built without a name, i.e. the abstract contract was
    /// invoked without a concrete model behind it.
    #[error("virtual method must not be called directly: model name is empty")]
    Unconfigured,

    #[error("expected 4-dimensional tensor input, got {actual} dimensions")]
    InvalidRank { actual: usize },

    #[error("cannot build a batch from an empty image list")]
    EmptyInput,

    #[error("image {index} has shape {actual:?}, expected {expected:?}")]
    MismatchedShapes {
        index: usize,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("{model} returned no rows for a single-image prediction")]
    EmptyOutput { model: String },

    #[error("{model}: {reason}")]
    InvalidInput { model: String, reason: String },

    #[error("model file not found at: {}", .0.display())]
    WeightsNotFound(PathBuf),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure inside the inference capability, passed through unchanged.
    #[error(transparent)]
    Inference(#[from] anyhow::Error),
}

pub type Result<T, E = DemographyError> = std::result::Result<T, E>;
