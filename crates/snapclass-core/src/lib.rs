//! Core library for snapclass photo classification.
//!
//! This crate provides:
//! - Tensor encoding of decoded photos for a 224x224 RGB classifier
//! - Score-vector reduction to a single label and confidence percentage
//! - Label set loading
//! - The encode → infer → select pipeline over an opaque inference backend
//! - Result messages for presentation layers

pub mod error;
pub mod message;
pub mod models;
pub mod pipeline;

pub use error::{ClassifyError, Result, SnapError};
pub use message::ResultMessage;
pub use models::classification::Classification;
pub use models::config::SnapConfig;
pub use pipeline::{ImageClassifier, LabelSet, TensorEncoder};
#[cfg(feature = "native")]
pub use pipeline::create_classifier_from_dir;
#[cfg(feature = "wasm")]
pub use pipeline::create_classifier_from_bytes;

/// Re-export inference types.
pub use snapclass_inference::{InferenceBackend, InferenceError, InputTensor, OutputTensor};

#[cfg(feature = "native")]
pub use snapclass_inference::OrtBackend;

#[cfg(feature = "wasm")]
pub use snapclass_inference::TractBackend;
