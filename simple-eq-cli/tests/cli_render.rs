use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_stereo_tone(path: &Path, frames: usize) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for n in 0..frames {
        let phase = std::f32::consts::TAU * 440.0 * n as f32 / 44_100.0;
        let sample = (phase.sin() * 0.5 * i16::MAX as f32) as i16;
        writer.write_sample(sample).expect("left");
        writer.write_sample(sample).expect("right");
    }
    writer.finalize().expect("finalize");
}

#[test]
fn render_keeps_length_and_format() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_stereo_tone(&input, 5_000);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("simple-eq"));
    cmd.arg("render")
        .arg(&input)
        .arg(&output)
        .args(["--block-size", "256", "--low-cut-freq", "100", "--low-cut-slope", "48"])
        .assert()
        .success();

    let reader = hound::WavReader::open(&output).expect("open output");
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().sample_rate, 44_100);
    assert_eq!(reader.duration(), 5_000);
}

#[test]
fn render_rejects_missing_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("simple-eq"));
    cmd.arg("render")
        .arg(dir.path().join("missing.wav"))
        .arg(dir.path().join("out.wav"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("wav error"));
}
