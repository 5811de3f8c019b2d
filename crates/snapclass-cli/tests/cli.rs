use std::path::Path;

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

fn snapclass(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("snapclass").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home);
    cmd
}

fn write_photo(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]))
        .save(path)
        .unwrap();
}

#[test]
fn help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    snapclass(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("encode"));
}

#[test]
fn classify_missing_file_fails() {
    let home = tempfile::tempdir().unwrap();
    snapclass(home.path())
        .args(["classify", "does-not-exist.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn classify_without_model_fails_with_hint() {
    let home = tempfile::tempdir().unwrap();
    let photo = home.path().join("photo.png");
    write_photo(&photo, 32, 32);

    snapclass(home.path())
        .arg("classify")
        .arg(&photo)
        .arg("--model-dir")
        .arg(home.path().join("models"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("mobilenet_v2.onnx"));
}

#[test]
fn encode_writes_native_endian_buffer() {
    let home = tempfile::tempdir().unwrap();
    let photo = home.path().join("photo.png");
    let out = home.path().join("tensor.bin");
    write_photo(&photo, 10, 7);

    snapclass(home.path())
        .arg("encode")
        .arg(&photo)
        .args(["--size", "4", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("48 floats"));

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.len(), 4 * 4 * 3 * 4);

    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn encode_strict_rejects_small_photo() {
    let home = tempfile::tempdir().unwrap();
    let photo = home.path().join("small.png");
    write_photo(&photo, 3, 3);

    snapclass(home.path())
        .arg("encode")
        .arg(&photo)
        .args(["--size", "8", "--strict", "--output"])
        .arg(home.path().join("tensor.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("dimension mismatch"));
}

#[test]
fn config_init_and_get() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("config.json");

    snapclass(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    snapclass(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "classifier.input_size"])
        .assert()
        .success()
        .stdout(predicate::str::contains("224"));

    snapclass(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn batch_without_supported_files_fails() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("notes.txt"), "not a photo").unwrap();
    let pattern = home.path().join("*").display().to_string();

    snapclass(home.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}
