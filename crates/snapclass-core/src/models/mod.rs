//! Data models for snapclass.

pub mod classification;
pub mod config;

pub use classification::Classification;
pub use config::{ClassifierConfig, ModelConfig, OutputConfig, SnapConfig};
