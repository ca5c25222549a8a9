//! runs the kmlabel binary on generated files

use std::fmt::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

fn tmp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("kmlabel-cli-{}-{}", std::process::id(), name));
    path
}

// 40 training rows alternating between a group around 2. (label 0) and a group around 8. (label 1)
fn write_training(name: &str) -> PathBuf {
    let mut content = String::new();
    for i in 0..40 {
        let label = i % 2;
        let center = if label == 0 { 2. } else { 8. };
        let shift = (i % 5) as f64 * 0.1;
        for _ in 0..6 {
            write!(content, "{} ", center + shift).unwrap();
        }
        writeln!(content, "{}", label).unwrap();
    }
    let path = tmp_path(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn write_file(name: &str, content: &str) -> PathBuf {
    let path = tmp_path(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run_kmlabel(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kmlabel"))
        .args(args)
        .output()
        .unwrap()
}

const TEST_ROWS: &str = "2 2 2 2 2 2\n8 8 8 8 8 8\n1.5 2 2.5 2 2 2\n7 9 8 8 8 8.5\n";
const EXPECTED: &str = "0\n1\n0\n1\n\n";

#[test]
fn classifies_and_evaluates() {
    let train = write_training("train.txt");
    let test = write_file("test.txt", TEST_ROWS);
    let reference = write_file("reference.txt", EXPECTED);
    let output = tmp_path("output.txt");
    let centroids = tmp_path("centroids.csv");
    //
    let out = run_kmlabel(&[
        "--train",
        train.to_str().unwrap(),
        "--test",
        test.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--nbcluster",
        "2",
        "--centroids",
        centroids.to_str().unwrap(),
        "--reference",
        reference.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), EXPECTED);
    let stdout = String::from_utf8_lossy(&out.stdout);
    // centroids are printed at each iteration by default
    assert!(stdout.contains("-------------------"));
    assert!(stdout.contains("converged : true"));
    assert!(stdout.contains("accuracy against reference : 1.000e0"));
    // one csv record by centroid, label first
    let dump = std::fs::read_to_string(&centroids).unwrap();
    let records: Vec<&str> = dump.lines().collect();
    assert_eq!(records.len(), 2);
    assert!(records[0].starts_with("0,"));
    assert!(records[1].starts_with("1,"));
}

#[test]
fn options_map_to_parameters() {
    let train = write_training("train_opts.txt");
    let test = write_file("test_opts.txt", TEST_ROWS);
    let output = tmp_path("output_opts.txt");
    let out = run_kmlabel(&[
        "--train",
        train.to_str().unwrap(),
        "--test",
        test.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "-k",
        "4",
        "--tolerance",
        "1e-9",
        "--maxiter",
        "50",
        "--empty",
        "fail",
        "--quiet",
    ]);
    assert!(out.status.success());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), EXPECTED);
    assert!(!String::from_utf8_lossy(&out.stdout).contains("-------------------"));
    // --maxiter 1 stops before convergence but still writes labels
    let out = run_kmlabel(&[
        "--train",
        train.to_str().unwrap(),
        "--test",
        test.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "-k",
        "2",
        "--maxiter",
        "1",
        "--quiet",
    ]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("converged : false"));
}

#[test]
fn empty_cluster_policy_from_command_line() {
    // first two rows identical, second centroid gets no member at first iteration
    let train = write_file(
        "train_degenerate.txt",
        "0 0 0 0 0 0 0\n0 0 0 0 0 0 0\n10 10 10 10 10 10 1\n",
    );
    let test = write_file("test_degenerate.txt", "9 9 9 9 9 9\n1 1 1 1 1 1\n");
    let output = tmp_path("output_degenerate.txt");
    let base = [
        "--train",
        train.to_str().unwrap(),
        "--test",
        test.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "-k",
        "2",
        "--quiet",
    ];
    let out = run_kmlabel(&base);
    assert!(out.status.success());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "1\n0\n\n");
    //
    let mut failing = base.to_vec();
    failing.extend_from_slice(&["--empty", "fail"]);
    let out = run_kmlabel(&failing);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("empty cluster"));
}

#[test]
fn bad_input_exits_with_1() {
    let train = write_training("train_bad.txt");
    let test = write_file("test_bad.txt", TEST_ROWS);
    let output = tmp_path("output_bad.txt");
    for k in ["0", "41"] {
        let out = run_kmlabel(&[
            "--train",
            train.to_str().unwrap(),
            "--test",
            test.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--nbcluster",
            k,
        ]);
        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stderr).contains("invalid parameter"));
    }
    // a nan in the test table is refused at load
    let nan_test = write_file("test_nan.txt", "2 2 nan 2 2 2\n");
    let out = run_kmlabel(&[
        "--train",
        train.to_str().unwrap(),
        "--test",
        nan_test.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--nbcluster",
        "2",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not a finite number"));
}
