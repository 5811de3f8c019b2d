//! Tensor types for inference input/output.

use ndarray::ArrayD;

/// Element types a classification model may produce.
///
/// Float heads return `f32`; quantized ones return `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorType {
    Float32,
    Uint8,
}

/// Input tensor for inference.
#[derive(Debug, Clone)]
pub enum InputTensor {
    Float32(ArrayD<f32>),
}

impl InputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            InputTensor::Float32(arr) => arr.shape(),
        }
    }
}

/// Output tensor from inference.
#[derive(Debug, Clone)]
pub enum OutputTensor {
    Float32(ArrayD<f32>),
    Uint8(ArrayD<u8>),
}

impl OutputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            OutputTensor::Float32(arr) => arr.shape(),
            OutputTensor::Uint8(arr) => arr.shape(),
        }
    }

    /// Get the data type of the tensor.
    pub fn dtype(&self) -> TensorType {
        match self {
            OutputTensor::Float32(_) => TensorType::Float32,
            OutputTensor::Uint8(_) => TensorType::Uint8,
        }
    }

    /// Flatten the tensor into a score vector in logical (row-major) order.
    ///
    /// Quantized outputs are dequantized as `q / 255`, which is how uint8
    /// softmax heads encode probabilities.
    pub fn to_scores(&self) -> Vec<f32> {
        match self {
            OutputTensor::Float32(arr) => arr.iter().copied().collect(),
            OutputTensor::Uint8(arr) => arr.iter().map(|&q| q as f32 / 255.0).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_input_shape() {
        let arr = ArrayD::<f32>::zeros(IxDyn(&[1, 2, 2, 3]));
        let tensor = InputTensor::Float32(arr);
        assert_eq!(tensor.shape(), &[1, 2, 2, 3]);
    }

    #[test]
    fn test_output_scores_flatten_batch_dim() {
        let arr = ArrayD::from_shape_vec(IxDyn(&[1, 3]), vec![0.1f32, 0.9, 0.3]).unwrap();
        let output = OutputTensor::Float32(arr);
        assert_eq!(output.dtype(), TensorType::Float32);
        assert_eq!(output.to_scores(), vec![0.1, 0.9, 0.3]);
    }

    #[test]
    fn test_quantized_scores() {
        let arr = ArrayD::from_shape_vec(IxDyn(&[1, 2]), vec![0u8, 255]).unwrap();
        let output = OutputTensor::Uint8(arr);
        assert_eq!(output.shape(), &[1, 2]);
        assert_eq!(output.dtype(), TensorType::Uint8);
        assert_eq!(output.to_scores(), vec![0.0, 1.0]);
    }
}
