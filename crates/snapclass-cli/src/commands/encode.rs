//! Encode command - dump the model input buffer for a photo.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use snapclass_core::pipeline::{tensor_to_ne_bytes, SizePolicy, TensorLayout};
use snapclass_core::TensorEncoder;

use super::load_config;

/// Arguments for the encode command.
#[derive(Args)]
pub struct EncodeArgs {
    /// Input photo
    #[arg(required = true)]
    input: PathBuf,

    /// Output file for the native-endian f32 buffer
    #[arg(short, long, required = true)]
    output: PathBuf,

    /// Side length of the square input grid (overrides config)
    #[arg(short, long)]
    size: Option<u32>,

    /// Reject photos that are not already large enough instead of resizing
    #[arg(long)]
    strict: bool,

    /// Tensor layout (overrides config)
    #[arg(short, long, value_enum)]
    layout: Option<LayoutArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LayoutArg {
    /// [1, size, size, 3]
    Nhwc,
    /// [1, 3, size, size]
    Nchw,
}

impl From<LayoutArg> for TensorLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Nhwc => TensorLayout::Nhwc,
            LayoutArg::Nchw => TensorLayout::Nchw,
        }
    }
}

pub async fn run(args: EncodeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(size) = args.size {
        config.classifier.input_size = size;
    }
    if args.strict {
        config.classifier.size_policy = SizePolicy::Strict;
    }
    if let Some(layout) = args.layout {
        config.classifier.layout = layout.into();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let image = image::open(&args.input)?;
    let encoder = TensorEncoder::from_config(&config.classifier);
    let tensor = encoder.encode(&image)?;
    let bytes = tensor_to_ne_bytes(&tensor);

    fs::write(&args.output, &bytes)?;

    info!("Encoded {} into shape {:?}", args.input.display(), tensor.shape());
    println!(
        "{} Wrote {} floats {:?} to {}",
        style("✓").green(),
        tensor.len(),
        tensor.shape(),
        args.output.display()
    );

    Ok(())
}
