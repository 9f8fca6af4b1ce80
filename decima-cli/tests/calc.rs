use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::Result;
use assert_cmd::prelude::*;
use tempfile::tempdir;

fn config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("config")
}

fn decima(args: &[&str]) -> Output {
    let binary = assert_cmd::cargo::cargo_bin!("decima");
    let mut cmd = Command::new(binary);
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config-dir").arg(config_dir());
    cmd.args(args);
    cmd.output().expect("failed to run decima")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn lists_registered_tags() {
    let output = decima(&["tags"]);
    assert!(output.status.success());
    let tags: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(tags.len(), 13);
    assert!(tags.contains(&"stoch_rsi".to_string()));
    assert!(tags.contains(&"hma".to_string()));
}

#[test]
fn evaluates_an_exact_window() {
    let output = decima(&["calc", r#"{"name":"sma","length":3}"#, "--prices", "30,31,32"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "31");
}

#[test]
fn rejects_a_window_of_the_wrong_size() {
    let output = decima(&["calc", r#"{"name":"sma","length":3}"#, "--prices", "1,2,3,4"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid data size"));
}

#[test]
fn tail_mode_uses_the_most_recent_points() {
    let output = decima(&[
        "calc",
        r#"{"name":"wma","length":3}"#,
        "--prices",
        "420,420,420,30,30,32",
        "--tail",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "31");
}

#[test]
fn series_mode_prints_every_position() {
    let output = decima(&[
        "calc",
        r#"{"name":"sma","length":2}"#,
        "--prices",
        "1,3,5,7",
        "--series",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "2\n4\n6");
}

#[test]
fn inspects_configured_presets() -> Result<()> {
    let output = decima(&["inspect", "preset:classic_macd"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(report["count"], 51);
    assert_eq!(report["indicator"]["source2"]["length"], 26);
    Ok(())
}

#[test]
fn prints_every_band_from_a_price_file() -> Result<()> {
    let temp = tempdir()?;
    let prices = temp.path().join("closes.txt");
    fs::write(&prices, "# closes\n10\n11\n12\n13\n14\n")?;
    let indicator = temp.path().join("bb.json");
    fs::write(
        &indicator,
        r#"{"name":"bb","band":"upper","std_dev":"2","ma":{"name":"sma","length":5}}"#,
    )?;

    let output = decima(&[
        "calc",
        &format!("@{}", indicator.display()),
        "--input",
        prices.to_str().unwrap(),
        "--all",
        "--scale",
        "4",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let bands: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(bands["middle"], "12");
    assert_eq!(bands["upper"], "14.8284");
    assert_eq!(bands["lower"], "9.1716");
    Ok(())
}

#[test]
fn unknown_tags_fail_cleanly() {
    let output = decima(&["inspect", r#"{"name":"vwap","length":3}"#]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown indicator 'vwap'"));
}
