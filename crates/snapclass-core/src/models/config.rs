//! Configuration structures for the classification pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SnapError};
use crate::pipeline::{ResizeFilter, SizePolicy, TensorLayout, MAX_TARGET_SIZE};

/// Main configuration for snapclass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Encoder and classifier configuration.
    pub classifier: ClassifierConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Encoder and classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Side length of the square input grid.
    pub input_size: u32,

    /// What to do with images that are not exactly `input_size` square.
    pub size_policy: SizePolicy,

    /// Resampling filter used by the `resize` policy.
    pub filter: ResizeFilter,

    /// Memory layout of the input tensor.
    pub layout: TensorLayout,

    /// Input name override (defaults to the model's first input).
    pub input_name: Option<String>,

    /// Number of CPU threads for the native backend.
    pub num_threads: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_size: 224,
            size_policy: SizePolicy::Resize,
            filter: ResizeFilter::Triangle,
            layout: TensorLayout::Nhwc,
            input_name: None,
            num_threads: 4,
        }
    }
}

/// Model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Classification model file name.
    pub model: String,

    /// Label file name (one label per line).
    pub labels: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            model: "mobilenet_v2.onnx".to_string(),
            labels: "labels.txt".to_string(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Number of ranked labels to report (1 = winner only).
    pub top_k: usize,

    /// Include the raw winning score next to the percentage.
    pub show_score: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_k: 1,
            show_score: false,
        }
    }
}

impl SnapConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SnapError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SnapError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let size = self.classifier.input_size;
        if size == 0 || size > MAX_TARGET_SIZE {
            return Err(SnapError::Config(format!(
                "classifier.input_size must be in 1..={}, got {}",
                MAX_TARGET_SIZE, size
            )));
        }
        if self.output.top_k == 0 {
            return Err(SnapError::Config("output.top_k must be > 0".to_string()));
        }
        Ok(())
    }

    /// Get full path to a model file.
    pub fn model_path(&self, file_name: &str) -> PathBuf {
        self.models.model_dir.join(file_name)
    }
}
