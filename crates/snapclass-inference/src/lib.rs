//! Inference capability boundary for snapclass.
//!
//! The classifier only needs "given an input tensor, obtain a score vector".
//! This crate expresses that as the [`InferenceBackend`] trait and ships two
//! implementations:
//! - `ort` with the XNNPACK execution provider for native platforms
//! - `tract` for WASM/browser environments

mod backend;
mod error;
mod tensor;

pub use backend::InferenceBackend;
pub use error::InferenceError;
pub use tensor::{InputTensor, OutputTensor, TensorType};

#[cfg(feature = "native")]
pub use backend::ort::OrtBackend;

#[cfg(feature = "wasm")]
pub use backend::tract::TractBackend;

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
