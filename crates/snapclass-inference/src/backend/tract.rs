//! Tract backend for cross-platform ONNX inference.

use ndarray::{ArrayD, IxDyn};
use tract_onnx::prelude::*;
use tracing::debug;

use crate::error::InferenceError;
use crate::tensor::{InputTensor, OutputTensor};
use crate::{InferenceBackend, Result};

type RunnableModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Backend using Tract for cross-platform ONNX inference.
pub struct TractBackend {
    model: RunnableModel,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl TractBackend {
    /// Load a model from bytes with specified input shape.
    pub fn from_bytes_with_shape(bytes: &[u8], input_shape: &[usize]) -> Result<Self> {
        debug!("Loading classification model with Tract from {} bytes", bytes.len());

        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(bytes))
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to load model: {}", e)))?;

        Self::prepare(model, input_shape)
    }

    fn prepare(mut model: InferenceModel, input_shape: &[usize]) -> Result<Self> {
        // Pin the input fact so dynamic batch/spatial dims become concrete
        model
            .set_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set input shape: {}", e)))?;

        let input_names = node_names(&model, model.input_outlets(), "input");
        let output_names = node_names(&model, model.output_outlets(), "output");

        let model = model
            .into_typed()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to type model: {}", e)))?
            .into_optimized()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to optimize: {}", e)))?
            .into_runnable()
            .map_err(|e| InferenceError::SessionCreate(e.to_string()))?;

        debug!("Model inputs: {:?}", input_names);
        debug!("Model outputs: {:?}", output_names);

        Ok(Self {
            model,
            input_names,
            output_names,
        })
    }
}

fn node_names(
    model: &InferenceModel,
    outlets: TractResult<&[OutletId]>,
    fallback: &str,
) -> Vec<String> {
    match outlets {
        Ok(outlets) => outlets
            .iter()
            .map(|o| model.node(o.node).name.clone())
            .collect(),
        Err(_) => vec![fallback.to_string()],
    }
}

fn convert_input(tensor: &InputTensor) -> Result<TValue> {
    let value = match tensor {
        InputTensor::Float32(arr) => tract_ndarray::ArrayD::from_shape_vec(
            tract_ndarray::IxDyn(arr.shape()),
            arr.iter().copied().collect(),
        )
        .map(|a| a.into_tvalue()),
    };

    value.map_err(|e| InferenceError::InvalidInput(e.to_string()))
}

fn to_array<T: Copy>(shape: &[usize], data: impl Iterator<Item = T>) -> Result<ArrayD<T>> {
    ArrayD::from_shape_vec(IxDyn(shape), data.collect())
        .map_err(|e| InferenceError::OutputExtraction(e.to_string()))
}

impl InferenceBackend for TractBackend {
    fn run(&self, inputs: &[(&str, InputTensor)]) -> Result<Vec<(String, OutputTensor)>> {
        // Tract feeds inputs positionally
        let tract_inputs: TVec<TValue> = inputs
            .iter()
            .map(|(_, tensor)| convert_input(tensor))
            .collect::<Result<TVec<_>>>()?;

        let outputs = self
            .model
            .run(tract_inputs)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let mut results = Vec::with_capacity(outputs.len());

        for (idx, output) in outputs.iter().enumerate() {
            let name = self
                .output_names
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("output_{}", idx));

            let tensor = if let Ok(arr) = output.to_array_view::<f32>() {
                OutputTensor::Float32(to_array(arr.shape(), arr.iter().copied())?)
            } else if let Ok(arr) = output.to_array_view::<u8>() {
                OutputTensor::Uint8(to_array(arr.shape(), arr.iter().copied())?)
            } else {
                return Err(InferenceError::OutputExtraction(format!(
                    "unsupported output type for '{}'",
                    name
                )));
            };

            results.push((name, tensor));
        }

        Ok(results)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}
