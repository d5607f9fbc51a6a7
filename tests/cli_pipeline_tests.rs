// Integration tests for the expstat command line
// Each test builds an experiment tree in a temp dir and drives the binary over it

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_run(dir: &Path, name: &str, value: f64) {
    fs::create_dir_all(dir).unwrap();
    let text = format!(
        "Best: {}\nWorst: {}\nMedian: {}\nAvg: {}\nStd. Dev.: {}\n",
        value - 1.0,
        value + 1.0,
        value,
        value,
        0.5
    );
    fs::write(dir.join(name), text).unwrap();
}

/// `instances` instance dirs under `root`, each holding `runs` records of `value(index)`
fn build_tree(root: &Path, instances: usize, runs: usize, value: impl Fn(usize) -> f64) {
    for index in 1..=instances {
        let dir = root.join(format!("instance_{}", index));
        for run in 0..runs {
            write_run(&dir, &format!("run_{:02}.txt", run), value(index));
        }
    }
}

fn expstat() -> Command {
    Command::cargo_bin("expstat").unwrap()
}

// ============================================================================
// Aggregate + reduce
// ============================================================================

#[test]
fn test_aggregate_constant_runs() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 30, 5, |_| 10.0);

    expstat()
        .arg("aggregate")
        .arg("--root")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("instance_1: 5 runs, average=10.0"))
        .stdout(predicate::str::contains("Aggregated 30/30 instances"));

    let summary = fs::read_to_string(tmp.path().join("instance_7/new_stats.txt")).unwrap();
    assert!(summary.contains("average=10.0"));
    assert!(summary.contains("count=5"));
}

#[test]
fn test_reduce_after_aggregate() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 30, 5, |_| 10.0);

    expstat()
        .args(["aggregate", "--root"])
        .arg(tmp.path())
        .assert()
        .success();

    expstat()
        .args(["reduce", "--root"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("average=10.0\n"))
        .stdout(predicate::str::contains("best=9.0\n"))
        .stdout(predicate::str::contains("count=5.0\n"));
}

#[test]
fn test_aggregate_twice_is_stable() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 3, 4, |i| i as f64 * 1.5);

    for _ in 0..2 {
        expstat()
            .args(["aggregate", "-n", "3", "--root"])
            .arg(tmp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("instance_2: 4 runs, average=3.0"));
    }
}

#[test]
fn test_reduce_missing_summary_fails() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 2, 3, |_| 1.0);

    expstat()
        .args(["reduce", "-n", "2", "--root"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed (1)"))
        .stdout(predicate::str::contains("new_stats.txt"));
}

#[test]
fn test_aggregate_empty_instance_reports_failure() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 2, 3, |_| 1.0);
    fs::create_dir_all(tmp.path().join("instance_3")).unwrap();

    expstat()
        .args(["aggregate", "-n", "3", "--root"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Aggregated 2/3 instances"))
        .stdout(predicate::str::contains("instance_3"));

    // The healthy instances still got their summaries
    assert!(tmp.path().join("instance_1/new_stats.txt").exists());
    assert!(tmp.path().join("instance_2/new_stats.txt").exists());
}

#[test]
fn test_aggregate_malformed_record_fails() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 1, 2, |_| 1.0);
    fs::write(
        tmp.path().join("instance_1/run_99.txt"),
        "Best: 1\nWorst: oops\nMedian: 1\nAvg: 1\nStd. Dev.: 0\n",
    )
    .unwrap();

    expstat()
        .args(["aggregate", "-n", "1", "--root"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("run_99.txt"));
}

#[test]
fn test_aggregate_json_output() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 2, 3, |i| i as f64);

    let output = expstat()
        .args(["aggregate", "-n", "2", "--format", "json", "--root"])
        .arg(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["results"].as_array().unwrap().len(), 2);
    assert_eq!(value["results"][1]["unit"], "instance_2");
    assert_eq!(value["results"][1]["result"]["average"], 2.0);
    assert_eq!(value["results"][1]["result"]["count"], 3);
    assert!(value["failures"].as_array().unwrap().is_empty());
}

// ============================================================================
// Normality
// ============================================================================

#[test]
fn test_normality_constant_series_not_normal() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 30, 5, |_| 10.0);

    expstat()
        .args(["aggregate", "--root"])
        .arg(tmp.path())
        .assert()
        .success();

    expstat()
        .args(["normality", "--root"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("n=30"))
        .stdout(predicate::str::contains("not normal"));
}

#[test]
fn test_normality_json_pvalue() {
    let tmp = TempDir::new().unwrap();
    build_tree(tmp.path(), 30, 5, |_| 10.0);

    expstat()
        .args(["aggregate", "--root"])
        .arg(tmp.path())
        .assert()
        .success();

    let output = expstat()
        .args(["normality", "--format", "json", "--root"])
        .arg(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pvalue = value["results"][0]["result"]["test"]["pvalue"].as_f64().unwrap();
    assert!(pvalue < 1e-10);
}

// ============================================================================
// Compare
// ============================================================================

fn build_configurations(root: &Path, names: &[&str], instances: usize) {
    for (offset, name) in names.iter().enumerate() {
        build_tree(&root.join(name), instances, 2, |i| (offset * 100 + i) as f64);
    }
    for name in names {
        let mut cmd = expstat();
        cmd.args(["aggregate", "-c", name, "-n"])
            .arg(instances.to_string())
            .arg("--root")
            .arg(root);
        cmd.assert().success();
    }
}

#[test]
fn test_compare_four_configurations() {
    let tmp = TempDir::new().unwrap();
    let names = ["cfg_a", "cfg_b", "cfg_c", "cfg_d"];
    build_configurations(tmp.path(), &names, 6);

    let output = expstat()
        .args(["compare", "-n", "6", "--root"])
        .arg(tmp.path())
        .args(["-c", "cfg_a", "-c", "cfg_b", "-c", "cfg_c", "-c", "cfg_d"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches(" vs ").count(), 6);
    assert!(stdout.contains("cfg_a vs cfg_b"));
    assert!(stdout.contains("cfg_c vs cfg_d"));
    // cfg_a is shifted below every other configuration
    assert!(stdout.contains("cfg_a is significantly smaller"));
}

#[test]
fn test_compare_discovers_configurations() {
    let tmp = TempDir::new().unwrap();
    build_configurations(tmp.path(), &["low", "high"], 5);
    fs::create_dir_all(tmp.path().join("notes")).unwrap();

    expstat()
        .args(["compare", "-n", "5", "--root"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("high vs low"))
        .stdout(predicate::str::contains("low is significantly smaller"));
}

#[test]
fn test_compare_json_reports_missing_configuration() {
    let tmp = TempDir::new().unwrap();
    build_configurations(tmp.path(), &["cfg_a", "cfg_b"], 4);

    let output = expstat()
        .args(["compare", "-n", "4", "--format", "json", "--root"])
        .arg(tmp.path())
        .args(["-c", "cfg_a", "-c", "cfg_b", "-c", "cfg_missing"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["results"].as_array().unwrap().len(), 1);
    assert_eq!(value["load_failures"][0]["unit"], "cfg_missing");
}

// ============================================================================
// Configuration file
// ============================================================================

#[test]
fn test_config_file_drives_layout() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    for index in 1..=4 {
        write_run(&data.join(format!("execution_{}", index)), "a.txt", 2.0);
    }

    let config_path = tmp.path().join("expstat.toml");
    fs::write(
        &config_path,
        format!(
            "root = {:?}\ninstance_prefix = \"execution\"\ninstance_count = 4\n",
            data.display().to_string()
        ),
    )
    .unwrap();

    expstat()
        .arg("--config")
        .arg(&config_path)
        .arg("aggregate")
        .assert()
        .success()
        .stdout(predicate::str::contains("execution_4: 1 runs, average=2.0"));
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("bad.toml");
    fs::write(&config_path, "instance_count = 0\n").unwrap();

    expstat()
        .arg("--config")
        .arg(&config_path)
        .arg("reduce")
        .assert()
        .failure()
        .stderr(predicate::str::contains("instance_count must be >= 1"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    expstat().assert().failure();
}
