//! Classification pipeline: tensor encoding, inference and label selection.

mod classifier;
mod encoder;
mod labels;
mod selector;

pub use classifier::ImageClassifier;
pub use encoder::{
    encode, image_from_rgba, normalize, MAX_TARGET_SIZE, tensor_to_ne_bytes, ResizeFilter, SizePolicy,
    TensorEncoder, TensorLayout,
};
pub use labels::LabelSet;
pub use selector::{rank, scan, select, Selection};

#[cfg(feature = "native")]
pub use classifier::create_classifier_from_dir;

#[cfg(feature = "wasm")]
pub use classifier::create_classifier_from_bytes;
