//! Batch classification command for multiple photos.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use super::{
    classify_to_report, is_supported_image, load_classifier, load_config, ClassificationReport,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file JSON reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.model_dir {
        config.models.model_dir = dir.clone();
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to classify",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let classifier = load_classifier(&config)?;
    let top_k = config.output.top_k.max(1);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut reports: Vec<ClassificationReport> = Vec::with_capacity(files.len());
    let mut report_names = HashSet::new();

    for path in files {
        let image = match image::open(&path) {
            Ok(image) => image,
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
                reports.push(unreadable_report(path, e.to_string()));
                pb.inc(1);
                continue;
            }
            Err(e) => {
                pb.abandon();
                anyhow::bail!("Failed to open {}: {}", path.display(), e);
            }
        };

        let report = classify_to_report(classifier.clone(), path.clone(), image, top_k).await?;

        if let Some(err) = &report.error {
            if !args.continue_on_error {
                pb.abandon();
                anyhow::bail!("Failed to classify {}: {}", path.display(), err);
            }
            error!("Failed to classify {}: {}", path.display(), err);
        } else {
            debug!("{}: {}", path.display(), report.message);
        }

        if let Some(ref output_dir) = args.output_dir {
            let output_path = output_dir.join(report_file_name(&path, &mut report_names));
            fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
        }

        reports.push(report);
        pb.inc(1);
    }

    pb.finish_and_clear();

    for report in &reports {
        let marker = if report.message.success {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("{} {}: {}", marker, report.file.display(), report.message);
    }

    if args.summary {
        let summary_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let summary_path = summary_dir.join("summary.csv");
        write_summary(&reports, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let succeeded = reports.iter().filter(|r| r.message.success).count();
    println!(
        "{} Classified {}/{} files in {:.1}s",
        style("ℹ").blue(),
        succeeded,
        reports.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// JSON report name for `path`, unique among the names already in `used`.
///
/// The extension is kept (`a.png` -> `a_png.json`) and same-named files from
/// different directories get a numeric suffix.
fn report_file_name(path: &Path, used: &mut HashSet<String>) -> String {
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("photo")
        .replace('.', "_");

    let mut name = format!("{}.json", base);
    let mut n = 2;
    while !used.insert(name.clone()) {
        name = format!("{}-{}.json", base, n);
        n += 1;
    }
    name
}

fn unreadable_report(file: PathBuf, reason: String) -> ClassificationReport {
    let message = snapclass_core::ResultMessage::unavailable(&reason);
    ClassificationReport {
        file,
        classification: None,
        ranking: Vec::new(),
        error: Some(reason),
        message,
        processing_time_ms: 0,
        classified_at: chrono::Utc::now(),
    }
}

fn write_summary(reports: &[ClassificationReport], path: &Path) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "label",
        "confidence",
        "score",
        "error",
        "processing_time_ms",
    ])?;

    for report in reports {
        let (label, confidence, score) = match &report.classification {
            Some(c) => (c.label.clone(), c.confidence.to_string(), c.score.to_string()),
            None => (String::new(), String::new(), String::new()),
        };

        wtr.write_record([
            report.file.display().to_string(),
            label,
            confidence,
            score,
            report.error.clone().unwrap_or_default(),
            report.processing_time_ms.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snapclass_core::{Classification, ResultMessage};

    fn success_report(file: &str) -> ClassificationReport {
        let best = Classification::new("dog", 1, 0.9);
        ClassificationReport {
            file: PathBuf::from(file),
            message: ResultMessage::classified(&best),
            classification: Some(best),
            ranking: Vec::new(),
            error: None,
            processing_time_ms: 12,
            classified_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let reports = vec![
            success_report("photos/dog.jpg"),
            unreadable_report(PathBuf::from("photos/broken.png"), "bad header".to_string()),
        ];
        write_summary(&reports, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec!["file", "label", "confidence", "score", "error", "processing_time_ms"]
        );

        let rows: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["photos/dog.jpg", "dog", "90", "0.9", "", "12"]);
        assert_eq!(rows[1], vec!["photos/broken.png", "", "", "", "bad header", "0"]);
    }

    #[test]
    fn test_unreadable_report() {
        let report = unreadable_report(PathBuf::from("x.png"), "truncated".to_string());
        assert!(report.classification.is_none());
        assert!(!report.message.success);
        assert_eq!(report.message.body, "Classification unavailable: truncated");
        assert_eq!(report.error.as_deref(), Some("truncated"));
    }

    #[test]
    fn test_report_file_names_unique() {
        let mut used = HashSet::new();
        assert_eq!(report_file_name(Path::new("a/cat.png"), &mut used), "cat_png.json");
        assert_eq!(report_file_name(Path::new("a/cat.jpg"), &mut used), "cat_jpg.json");
        assert_eq!(report_file_name(Path::new("b/cat.png"), &mut used), "cat_png-2.json");
        assert_eq!(report_file_name(Path::new("c/cat.png"), &mut used), "cat_png-3.json");
    }
}
