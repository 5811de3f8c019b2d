//! CLI subcommands.

pub mod batch;
pub mod classify;
pub mod config;
pub mod encode;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::Serialize;
use tracing::debug;

use snapclass_core::pipeline::{rank, select};
use snapclass_core::{
    create_classifier_from_dir, Classification, ClassifyError, ImageClassifier, OrtBackend,
    ResultMessage, SnapConfig, SnapError,
};

/// Image extensions the `image` crate is built to decode here.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff"];

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapclass")
        .join("config.json")
}

/// Load the explicit config file, else the default one, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SnapConfig> {
    if let Some(path) = config_path {
        return Ok(SnapConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(SnapConfig::from_file(&default_path)?)
    } else {
        Ok(SnapConfig::default())
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load the classifier described by `config`, with a hint when files are missing.
pub fn load_classifier(config: &SnapConfig) -> anyhow::Result<Arc<ImageClassifier<OrtBackend>>> {
    match create_classifier_from_dir(config) {
        Ok(classifier) => Ok(Arc::new(classifier)),
        Err(SnapError::ModelLoad(msg)) => anyhow::bail!(
            "Model not found or unreadable: {}\n\n\
             Place {} and {} in {} or pass --model-dir.",
            msg,
            config.models.model,
            config.models.labels,
            config.models.model_dir.display()
        ),
        Err(e) => Err(e.into()),
    }
}

/// Result of classifying one photo, as written to JSON.
#[derive(Debug, Serialize)]
pub struct ClassificationReport {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranking: Vec<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: ResultMessage,
    pub processing_time_ms: u64,
    pub classified_at: DateTime<Utc>,
}

/// Run the model once and derive both the winner and the top `k`.
pub fn classify_ranked(
    classifier: &ImageClassifier<OrtBackend>,
    image: &DynamicImage,
    top_k: usize,
) -> Result<(Classification, Vec<Classification>), ClassifyError> {
    let scores = classifier.scores(image)?;
    let best = select(&scores, classifier.labels())?;
    let ranking = if top_k > 1 {
        rank(&scores, classifier.labels(), top_k)?
    } else {
        Vec::new()
    };
    Ok((best, ranking))
}

/// Classify `image` off the async runtime and package the outcome.
pub async fn classify_to_report(
    classifier: Arc<ImageClassifier<OrtBackend>>,
    file: PathBuf,
    image: DynamicImage,
    top_k: usize,
) -> anyhow::Result<ClassificationReport> {
    let start = std::time::Instant::now();

    let outcome =
        tokio::task::spawn_blocking(move || classify_ranked(&classifier, &image, top_k)).await?;

    let message = ResultMessage::from_outcome(&outcome.as_ref().map(|(best, _)| best.clone()));
    let (classification, ranking, error) = match outcome {
        Ok((best, ranking)) => (Some(best), ranking, None),
        Err(e) => (None, Vec::new(), Some(e.to_string())),
    };

    Ok(ClassificationReport {
        file,
        classification,
        ranking,
        error,
        message,
        processing_time_ms: start.elapsed().as_millis() as u64,
        classified_at: Utc::now(),
    })
}
