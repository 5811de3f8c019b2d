//! Encode → infer → select pipeline.

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::ClassifyError;
use crate::models::classification::Classification;
use crate::models::config::ClassifierConfig;
use snapclass_inference::{InferenceBackend, InputTensor};

use super::encoder::TensorEncoder;
use super::labels::LabelSet;
use super::selector;

/// Image classifier over an opaque inference backend.
pub struct ImageClassifier<B: InferenceBackend> {
    backend: B,
    encoder: TensorEncoder,
    labels: LabelSet,
    input_name: Option<String>,
}

impl<B: InferenceBackend> ImageClassifier<B> {
    /// Create a classifier with the default 224x224 encoder.
    pub fn new(backend: B, labels: LabelSet) -> Self {
        Self {
            backend,
            encoder: TensorEncoder::default(),
            labels,
            input_name: None,
        }
    }

    /// Create a classifier from the classifier configuration.
    pub fn from_config(backend: B, labels: LabelSet, config: &ClassifierConfig) -> Self {
        Self {
            backend,
            encoder: TensorEncoder::from_config(config),
            labels,
            input_name: config.input_name.clone(),
        }
    }

    /// Set the tensor encoder.
    pub fn with_encoder(mut self, encoder: TensorEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Feed the tensor under `name` instead of the model's first input.
    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn encoder(&self) -> &TensorEncoder {
        &self.encoder
    }

    /// Encode the image and run the model, returning the raw score vector.
    pub fn scores(&self, image: &DynamicImage) -> Result<Vec<f32>, ClassifyError> {
        let tensor = self.encoder.encode(image)?;
        let input = InputTensor::Float32(tensor.into_dyn());

        let input_name = self
            .input_name
            .as_deref()
            .or_else(|| self.backend.input_names().first().map(String::as_str))
            .unwrap_or("input");

        let outputs = self
            .backend
            .run(&[(input_name, input)])
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        let (output_name, output) = outputs
            .into_iter()
            .next()
            .ok_or_else(|| ClassifyError::InputMissing("score vector".to_string()))?;

        debug!(
            "Model output '{}' has shape {:?} ({:?})",
            output_name,
            output.shape(),
            output.dtype()
        );

        Ok(output.to_scores())
    }

    /// Classify an image.
    pub fn classify(&self, image: &DynamicImage) -> Result<Classification, ClassifyError> {
        let scores = self.scores(image)?;
        let result = selector::select(&scores, &self.labels)?;

        info!("Classified as {}", result);
        Ok(result)
    }

    /// Classify an image that may be absent.
    pub fn classify_optional(
        &self,
        image: Option<&DynamicImage>,
    ) -> Result<Classification, ClassifyError> {
        let image = image.ok_or_else(|| ClassifyError::InputMissing("image".to_string()))?;
        self.classify(image)
    }

    /// The `k` best labels for an image, best first.
    pub fn rank(&self, image: &DynamicImage, k: usize) -> Result<Vec<Classification>, ClassifyError> {
        let scores = self.scores(image)?;
        selector::rank(&scores, &self.labels, k)
    }

    /// Classify several images; each one succeeds or fails on its own.
    pub fn classify_batch(
        &self,
        images: &[DynamicImage],
    ) -> Vec<Result<Classification, ClassifyError>> {
        images.iter().map(|img| self.classify(img)).collect()
    }
}

/// Create a classifier from a model directory laid out per [`crate::SnapConfig`].
#[cfg(feature = "native")]
pub fn create_classifier_from_dir(
    config: &crate::SnapConfig,
) -> crate::Result<ImageClassifier<snapclass_inference::OrtBackend>> {
    use crate::error::SnapError;
    use snapclass_inference::OrtBackend;

    let model_path = config.model_path(&config.models.model);
    let labels_path = config.model_path(&config.models.labels);

    if !model_path.exists() {
        return Err(SnapError::ModelLoad(format!(
            "model not found at {}",
            model_path.display()
        )));
    }

    let bytes = std::fs::read(&model_path)?;
    let backend = OrtBackend::with_threads(&bytes, config.classifier.num_threads)?;
    let labels = LabelSet::from_file(&labels_path)?;

    debug!(
        "Loaded model {} with {} labels",
        model_path.display(),
        labels.len()
    );

    Ok(ImageClassifier::from_config(backend, labels, &config.classifier))
}

/// Create a classifier from in-memory model bytes and label text.
#[cfg(feature = "wasm")]
pub fn create_classifier_from_bytes(
    model: &[u8],
    labels: &str,
    config: &ClassifierConfig,
) -> crate::Result<ImageClassifier<snapclass_inference::TractBackend>> {
    use snapclass_inference::TractBackend;

    let encoder = TensorEncoder::from_config(config);
    let backend = TractBackend::from_bytes_with_shape(model, &encoder.shape())?;
    let labels: LabelSet = labels.lines().collect();

    Ok(ImageClassifier::from_config(backend, labels, config))
}
