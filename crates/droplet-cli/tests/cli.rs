//! Exit codes and outputs of the binaries.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use droplet_test_utils::fixtures::{params_file_text, quick_run_params};

fn bin(name: &str) -> Command {
    let path = match name {
        "drop-impact" => env!("CARGO_BIN_EXE_drop-impact"),
        "get-facet" => env!("CARGO_BIN_EXE_get-facet"),
        "get-footprint" => env!("CARGO_BIN_EXE_get-footprint"),
        "footprint-series" => env!("CARGO_BIN_EXE_footprint-series"),
        other => panic!("unknown binary {other}"),
    };
    Command::new(path)
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Run the quick case into `dir/results` and return the results path.
fn simulate(dir: &Path) -> std::path::PathBuf {
    let results = dir.join("results");
    let file = dir.join("case.params");
    fs::write(&file, params_file_text(&quick_run_params(&results))).unwrap();
    let out = bin("drop-impact")
        .args(["--log-level", "warn"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", stderr(&out));
    results
}

#[test]
fn too_few_arguments_print_usage_and_fail() {
    let out = bin("drop-impact").args(["10", "4.0"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage:"));
}

#[test]
fn help_exits_cleanly() {
    for name in ["drop-impact", "get-facet", "get-footprint", "footprint-series"] {
        let out = bin(name).arg("--help").output().unwrap();
        assert_eq!(out.status.code(), Some(0), "{name}");
    }
}

#[test]
fn invalid_parameters_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    let mut params = quick_run_params(&results);
    params.ldomain = 1.5;
    let file = dir.path().join("bad.params");
    fs::write(&file, params_file_text(&params)).unwrap();

    let out = bin("drop-impact").arg(&file).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Ldomain"), "{}", stderr(&out));
    assert!(!results.exists());
}

#[test]
fn run_then_post_process() {
    let dir = tempfile::tempdir().unwrap();
    let results = simulate(dir.path());
    assert!(results.join("log").exists());
    let snapshot = results.join("intermediate/snapshot-0.0300");
    assert!(snapshot.exists());

    let out = bin("get-facet").arg(&snapshot).output().unwrap();
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stderr(&out);
    let first = text.lines().next().unwrap();
    assert_eq!(first.split(' ').count(), 2, "{first}");
    assert!(text.contains("\n\n"));

    let out = bin("get-footprint")
        .arg(&snapshot)
        .arg("2")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", stderr(&out));
    let line = stderr(&out);
    let (t, y) = line.trim().split_once(',').unwrap();
    assert_eq!(t, "0.03");
    assert!(y.parse::<f64>().unwrap() > 0.0);

    let out = bin("footprint-series")
        .args(["--log-level", "warn", "--snapshots", "4", "--jobs", "2"])
        .arg("--case")
        .arg(&results)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", stderr(&out));
    let csv = fs::read_to_string(results.join("rFootvsTime_0.0010.csv")).unwrap();
    assert_eq!(csv.lines().count(), 5, "{csv}");
}

#[test]
fn footprint_rejects_bad_cutoff_and_missing_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let out = bin("get-footprint")
        .arg(dir.path().join("none"))
        .arg("-1")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("xCutoff must be positive"));

    let out = bin("get-footprint")
        .arg(dir.path().join("none"))
        .arg("0.5")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));

    let out = bin("get-facet").output().unwrap();
    assert_eq!(out.status.code(), Some(1));
}
