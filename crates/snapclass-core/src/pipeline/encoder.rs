//! Image to input-tensor encoding.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ClassifyError;
use crate::models::config::ClassifierConfig;

/// How the encoder treats images that are not exactly the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePolicy {
    /// Resample the whole image to the target grid.
    #[default]
    Resize,
    /// Never resample. Smaller images are rejected, larger ones are sampled
    /// over their top-left `target x target` window.
    Strict,
}

/// Resampling filter used by [`SizePolicy::Resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Memory layout of the encoded tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorLayout {
    /// `[1, size, size, 3]`, R,G,B interleaved per pixel.
    #[default]
    Nhwc,
    /// `[1, 3, size, size]`, one plane per channel.
    Nchw,
}

/// Largest grid side the encoder accepts.
pub const MAX_TARGET_SIZE: u32 = 4096;

/// Normalize one 8-bit channel value to `[-127/128, 1.0]`.
#[inline]
pub fn normalize(raw: u8) -> f32 {
    (raw as f32 - 127.0) / 128.0
}

/// Encodes decoded images into the classifier's input tensor.
#[derive(Debug, Clone)]
pub struct TensorEncoder {
    target_size: u32,
    size_policy: SizePolicy,
    filter: ResizeFilter,
    layout: TensorLayout,
}

impl TensorEncoder {
    /// Create an encoder for a `target_size x target_size` grid.
    pub fn new(target_size: u32) -> Self {
        Self {
            target_size,
            size_policy: SizePolicy::default(),
            filter: ResizeFilter::default(),
            layout: TensorLayout::default(),
        }
    }

    /// Create an encoder from the classifier configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.input_size)
            .with_size_policy(config.size_policy)
            .with_filter(config.filter)
            .with_layout(config.layout)
    }

    /// Set the size policy.
    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = policy;
        self
    }

    /// Set the resampling filter.
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the tensor layout.
    pub fn with_layout(mut self, layout: TensorLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Shape of the tensors this encoder produces.
    pub fn shape(&self) -> [usize; 4] {
        let s = self.target_size as usize;
        match self.layout {
            TensorLayout::Nhwc => [1, s, s, 3],
            TensorLayout::Nchw => [1, 3, s, s],
        }
    }

    /// Encode an image into a normalized `f32` tensor.
    ///
    /// The pixel grid is walked row-major and every channel becomes
    /// `(raw - 127) / 128`.
    pub fn encode(&self, image: &DynamicImage) -> Result<Array4<f32>, ClassifyError> {
        if self.target_size == 0 || self.target_size > MAX_TARGET_SIZE {
            return Err(ClassifyError::InvalidTargetSize(self.target_size));
        }

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ClassifyError::InputMissing(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let rgb = self.sample_grid(image)?;
        let s = self.target_size as usize;

        let tensor = match self.layout {
            TensorLayout::Nhwc => Array4::from_shape_fn((1, s, s, 3), |(_, y, x, c)| {
                normalize(rgb.get_pixel(x as u32, y as u32)[c])
            }),
            TensorLayout::Nchw => Array4::from_shape_fn((1, 3, s, s), |(_, c, y, x)| {
                normalize(rgb.get_pixel(x as u32, y as u32)[c])
            }),
        };

        trace!("Encoded tensor with shape {:?}", tensor.shape());
        Ok(tensor)
    }

    /// Bring the image to exactly `target x target` RGB pixels.
    fn sample_grid(&self, image: &DynamicImage) -> Result<RgbImage, ClassifyError> {
        let size = self.target_size;
        let (width, height) = image.dimensions();

        if (width, height) == (size, size) {
            return Ok(image.to_rgb8());
        }

        match self.size_policy {
            SizePolicy::Resize => {
                debug!("Resizing {}x{} image to {}x{}", width, height, size, size);
                Ok(image.resize_exact(size, size, self.filter.into()).to_rgb8())
            }
            SizePolicy::Strict => {
                if width < size || height < size {
                    return Err(ClassifyError::DimensionMismatch(format!(
                        "image is {}x{}, need at least {}x{}",
                        width, height, size, size
                    )));
                }
                debug!("Sampling top-left {}x{} of {}x{} image", size, size, width, height);
                Ok(image.crop_imm(0, 0, size, size).to_rgb8())
            }
        }
    }
}

impl Default for TensorEncoder {
    fn default() -> Self {
        Self::new(224)
    }
}

/// Encode an optional image with the default policy.
///
/// An absent image fails with [`ClassifyError::InputMissing`]; it is never
/// turned into a zero-filled tensor.
pub fn encode(image: Option<&DynamicImage>, target_size: u32) -> Result<Array4<f32>, ClassifyError> {
    let image = image.ok_or_else(|| ClassifyError::InputMissing("image".to_string()))?;
    TensorEncoder::new(target_size).encode(image)
}

/// Flatten a tensor into native-endian 32-bit floats, in logical order.
pub fn tensor_to_ne_bytes(tensor: &Array4<f32>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(tensor.len() * 4);
    for value in tensor.iter() {
        bytes.extend_from_slice(&value.to_ne_bytes());
    }
    bytes
}

/// Wrap a raw RGBA buffer (e.g. canvas `ImageData`) as an image.
pub fn image_from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<DynamicImage, ClassifyError> {
    if data.is_empty() || width == 0 || height == 0 {
        return Err(ClassifyError::InputMissing("pixel buffer".to_string()));
    }

    // from_raw only rejects short buffers; a longer one would be read with the wrong stride.
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(ClassifyError::DimensionMismatch(format!(
            "RGBA buffer has {} bytes, {}x{} needs {}",
            data.len(),
            width,
            height,
            expected
        )));
    }

    RgbaImage::from_raw(width, height, data)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| ClassifyError::DimensionMismatch(format!("{}x{} RGBA buffer", width, height)))
}
