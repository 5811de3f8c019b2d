//! Error types for the snapclass-core library.

use thiserror::Error;

/// Main error type for the snapclass library.
#[derive(Error, Debug)]
pub enum SnapError {
    /// Classification pipeline error.
    #[error("classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Inference error from the inference layer.
    #[error("inference error: {0}")]
    Inference(#[from] snapclass_inference::InferenceError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to load the model or its label resource.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning an image into a classification.
///
/// Every variant means the inputs were unusable; retrying with the same
/// inputs gives the same failure.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The image or the score vector was absent.
    #[error("input missing: {0}")]
    InputMissing(String),

    /// Image smaller than the sample grid, or scores and labels differ in length.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// No score exceeded zero, so there is no label to report.
    #[error("no class scored above zero")]
    NoPositiveScore,

    /// The encoder was asked for a zero-sized or oversized grid.
    #[error("invalid target size: {0}")]
    InvalidTargetSize(u32),

    /// The inference backend failed.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Result type for the snapclass library.
pub type Result<T> = std::result::Result<T, SnapError>;
