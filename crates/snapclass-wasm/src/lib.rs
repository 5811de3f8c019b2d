//! WASM bindings for snapclass photo classification.
//!
//! This crate provides WebAssembly bindings for use in browsers: canvas
//! pixels go through the same encoder and label selection as the native CLI.

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;
use web_sys::ImageData;

use snapclass_core::models::config::ClassifierConfig;
use snapclass_core::pipeline::{self, image_from_rgba, LabelSet, TensorEncoder};
use snapclass_core::{create_classifier_from_bytes, ImageClassifier, ResultMessage, TractBackend};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn encode_pixels(data: Vec<u8>, width: u32, height: u32, size: u32) -> Result<Vec<f32>, JsValue> {
    let image = image_from_rgba(data, width, height).map_err(js_err)?;
    let tensor = TensorEncoder::new(size).encode(&image).map_err(js_err)?;
    Ok(tensor.iter().copied().collect())
}

/// Encode a raw RGBA buffer into a flat `size * size * 3` input tensor.
#[wasm_bindgen]
pub fn encode_rgba(data: &[u8], width: u32, height: u32, size: u32) -> Result<Float32Array, JsValue> {
    let values = encode_pixels(data.to_vec(), width, height, size)?;
    Ok(Float32Array::from(values.as_slice()))
}

/// Encode canvas `ImageData` into a flat `size * size * 3` input tensor.
#[wasm_bindgen]
pub fn encode_image_data(image: &ImageData, size: u32) -> Result<Float32Array, JsValue> {
    let values = encode_pixels(image.data().0, image.width(), image.height(), size)?;
    Ok(Float32Array::from(values.as_slice()))
}

/// Pick the best label for a score vector.
///
/// Returns `{ label, confidence, score, index }` or throws when the lengths
/// differ or no score is positive.
#[wasm_bindgen]
pub fn select_label(scores: &[f32], labels: Vec<String>) -> Result<JsValue, JsValue> {
    let labels: LabelSet = labels.into_iter().collect();
    let result = pipeline::select(scores, &labels).map_err(js_err)?;

    serde_wasm_bindgen::to_value(&result).map_err(js_err)
}

/// Classifier class for browser use.
#[wasm_bindgen]
pub struct Classifier {
    inner: ImageClassifier<TractBackend>,
}

#[wasm_bindgen]
impl Classifier {
    /// Create a classifier from ONNX model bytes and label text.
    ///
    /// `config_json` optionally overrides the classifier section of the
    /// configuration (e.g. `{"input_size": 192, "layout": "nchw"}`).
    #[wasm_bindgen(constructor)]
    pub fn new(model: &[u8], labels: &str, config_json: Option<String>) -> Result<Classifier, JsValue> {
        let config: ClassifierConfig = match config_json {
            Some(json) => serde_json::from_str(&json).map_err(js_err)?,
            None => ClassifierConfig::default(),
        };

        let inner = create_classifier_from_bytes(model, labels, &config).map_err(js_err)?;
        Ok(Self { inner })
    }

    /// Number of labels the model distinguishes.
    #[wasm_bindgen(getter)]
    pub fn label_count(&self) -> usize {
        self.inner.labels().len()
    }

    /// Classify canvas pixels; throws on failure.
    #[wasm_bindgen]
    pub fn classify(&self, image: &ImageData) -> Result<JsValue, JsValue> {
        let img = image_from_rgba(image.data().0, image.width(), image.height()).map_err(js_err)?;
        let result = self.inner.classify(&img).map_err(js_err)?;

        serde_wasm_bindgen::to_value(&result).map_err(js_err)
    }

    /// The `k` best labels for canvas pixels.
    #[wasm_bindgen]
    pub fn rank(&self, image: &ImageData, k: usize) -> Result<JsValue, JsValue> {
        let img = image_from_rgba(image.data().0, image.width(), image.height()).map_err(js_err)?;
        let ranked = self.inner.rank(&img, k).map_err(js_err)?;

        serde_wasm_bindgen::to_value(&ranked).map_err(js_err)
    }

    /// Classify canvas pixels and return `{ title, body, success }`.
    ///
    /// Never throws for classification failures; the body then reads
    /// "Classification unavailable: ...".
    #[wasm_bindgen]
    pub fn message(&self, image: &ImageData) -> Result<JsValue, JsValue> {
        let outcome = image_from_rgba(image.data().0, image.width(), image.height())
            .and_then(|img| self.inner.classify(&img));

        if let Err(e) = &outcome {
            web_sys::console::warn_1(&js_err(e));
        }

        serde_wasm_bindgen::to_value(&ResultMessage::from_outcome(&outcome)).map_err(js_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_length() {
        let rgba = vec![255u8; 4 * 4 * 4];
        let values = encode_pixels(rgba, 4, 4, 4).unwrap();
        assert_eq!(values.len(), 4 * 4 * 3);
        assert!(values.iter().all(|v| *v == 1.0));
    }

    #[wasm_bindgen_test]
    fn test_encode_bad_buffer() {
        assert!(encode_pixels(vec![0u8; 5], 4, 4, 2).is_err());
    }

    #[wasm_bindgen_test]
    fn test_select_label() {
        let labels = vec!["cat".to_string(), "dog".to_string(), "bird".to_string()];
        assert!(select_label(&[0.1, 0.9, 0.3], labels.clone()).is_ok());
        assert!(select_label(&[0.0, 0.0, 0.0], labels).is_err());
    }

    #[wasm_bindgen_test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
