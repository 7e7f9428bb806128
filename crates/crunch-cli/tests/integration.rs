//! Integration tests for crunch-cli.
//!
//! Tests run the `crunch` binary against temporary WAV and preset files.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to get the path to the `crunch` binary built by cargo.
fn crunch_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_crunch"))
}

fn write_sine(path: &Path, channels: u16, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let s = (i as f32 * 0.05).sin() * 0.8;
        for _ in 0..channels {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn read_all(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader
        .into_samples::<f32>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (spec, samples)
}

// ---------------------------------------------------------------------------
// `crunch params`
// ---------------------------------------------------------------------------

#[test]
fn cli_params_lists_parameters_and_types() {
    let output = crunch_bin().arg("params").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in [
        "drive",
        "tone",
        "output",
        "mix",
        "depth",
        "attack",
        "oversample",
        "overdrive",
        "distortion",
        "fuzz",
        "saturation",
    ] {
        assert!(stdout.contains(name), "params listing should contain '{name}'");
    }
}

// ---------------------------------------------------------------------------
// `crunch presets`
// ---------------------------------------------------------------------------

#[test]
fn cli_presets_lists_factory() {
    let output = crunch_bin().args(["presets", "list"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in crunch_config::FACTORY_PRESET_NAMES {
        assert!(stdout.contains(name), "missing factory preset '{name}'");
    }
}

#[test]
fn cli_presets_save_show_delete() {
    let dir = TempDir::new().unwrap();
    let preset_dir = dir.path().join("presets");
    let preset_dir_arg = preset_dir.to_str().unwrap();

    let output = crunch_bin()
        .args(["presets", "save", "My Fuzz", "--type", "fuzz"])
        .args(["--param", "drive=0.9", "--oversample"])
        .args(["--preset-dir", preset_dir_arg])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(preset_dir.join("My_Fuzz.json").is_file());

    let output = crunch_bin()
        .args(["presets", "show", "My Fuzz", "--preset-dir", preset_dir_arg])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Type: fuzz"));
    assert!(stdout.contains("drive   0.9000"));
    assert!(stdout.contains("Oversample: on"));

    // Saving again without --force is refused.
    let output = crunch_bin()
        .args(["presets", "save", "My Fuzz", "--preset-dir", preset_dir_arg])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let output = crunch_bin()
        .args(["presets", "delete", "My Fuzz", "--preset-dir", preset_dir_arg])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(!preset_dir.join("My_Fuzz.json").exists());
}

#[test]
fn cli_presets_factory_is_read_only() {
    let dir = TempDir::new().unwrap();
    let output = crunch_bin()
        .args(["presets", "delete", "Clean Boost"])
        .args(["--preset-dir", dir.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `crunch process`
// ---------------------------------------------------------------------------

#[test]
fn cli_process_keeps_length_and_channels() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_sine(&input, 2, 3000);

    let output = crunch_bin()
        .arg("process")
        .arg(&input)
        .arg(&output_path)
        .args(["--type", "distortion", "--param", "drive=0.7"])
        .args(["--block-size", "256"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let (spec, samples) = read_all(&output_path);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(samples.len(), 6000);
    assert!(samples.iter().all(|s| s.is_finite()));
    assert!(samples.iter().any(|&s| s != 0.0));
}

#[test]
fn cli_process_oversampled_with_preset() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_sine(&input, 1, 1000);

    let output = crunch_bin()
        .arg("process")
        .arg(&input)
        .arg(&output_path)
        .args(["--preset", "fuzzy math", "--oversample"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Latency compensated: 8 samples"));

    let (_, samples) = read_all(&output_path);
    assert_eq!(samples.len(), 1000);
    assert!(samples.iter().all(|s| s.is_finite()));
}

#[test]
fn cli_process_rejects_unknown_parameter() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_sine(&input, 1, 100);

    let output = crunch_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--param", "volume=1"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
