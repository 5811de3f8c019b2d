//! Classify command - label a single photo.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::{classify_to_report, is_supported_image, load_classifier, load_config, ClassificationReport};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input photo
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Also list the K best labels
    #[arg(short = 'k', long)]
    top: Option<usize>,

    /// Show the raw winning score
    #[arg(long)]
    show_score: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text result message
    Text,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.model_dir {
        config.models.model_dir = dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported_image(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Classifying file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );

    pb.set_message("Loading image...");
    let image = image::open(&args.input)?;

    pb.set_message("Loading model...");
    let classifier = load_classifier(&config)?;

    pb.set_message("Classifying...");
    let top_k = args.top.unwrap_or(config.output.top_k).max(1);
    let report = classify_to_report(classifier, args.input.clone(), image, top_k).await?;

    pb.finish_and_clear();

    let show_score = args.show_score || config.output.show_score;
    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => format_text(&report, show_score),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if !report.message.success {
        std::process::exit(1);
    }

    Ok(())
}

fn format_text(report: &ClassificationReport, show_score: bool) -> String {
    let mut output = report.message.body.clone();

    if let Some(classification) = &report.classification {
        if show_score {
            output.push_str(&format!(" (score {:.6})", classification.score));
        }
    }

    for (i, entry) in report.ranking.iter().enumerate() {
        output.push_str(&format!("\n  {}. {}", i + 1, entry));
    }

    output
}
