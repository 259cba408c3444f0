use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_candle-augment"))
}

#[test]
fn cli_writes_separate_output() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("candles.csv");
    let output = dir.path().join("augmented.csv");
    let contents = "timestamp,open,high,low,close\n0,100,111,95,110\n60000,110,125,105,121\n";
    fs::write(&input, contents).expect("write input");

    let status = binary()
        .args(["--input", input.to_str().expect("input path")])
        .args(["--output", output.to_str().expect("output path")])
        .arg("--add-time-utc")
        .status()
        .expect("run candle-augment");

    assert!(status.success(), "candle-augment exited with {status}");
    assert_eq!(fs::read_to_string(&input).expect("read input"), contents);
    assert_eq!(
        fs::read_to_string(&output).expect("read output"),
        "timestamp,open,high,low,close,percentage,lower_wick_pct,time_utc\n\
         0,100,111,95,110,10.00000000,5.00000000,1970-01-01T00:00:00+00:00\n\
         60000,110,125,105,121,10.00000000,4.54545455,1970-01-01T00:01:00+00:00\n"
    );
}

#[test]
fn cli_rewrites_in_place_with_synthetic_time() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("candles.csv");
    fs::write(&input, "open,close\n1,2\n2,3\n").expect("write input");

    let status = binary()
        .args(["--input", input.to_str().expect("input path")])
        .arg("--add-time-utc")
        .args(["--start-time-utc", "2024-01-01T00:00:00Z"])
        .args(["--step-seconds", "900"])
        .status()
        .expect("run candle-augment");

    assert!(status.success(), "candle-augment exited with {status}");
    assert_eq!(
        fs::read_to_string(&input).expect("read rewritten"),
        "open,close,percentage,lower_wick_pct,time_utc\n\
         1,2,100.00000000,,2024-01-01T00:00:00+00:00\n\
         2,3,50.00000000,,2024-01-01T00:15:00+00:00\n"
    );
}

#[test]
fn cli_rejects_bad_start_time() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("candles.csv");
    let contents = "open,close\n1,2\n";
    fs::write(&input, contents).expect("write input");

    let status = binary()
        .args(["--input", input.to_str().expect("input path")])
        .arg("--add-time-utc")
        .args(["--start-time-utc", "not a time"])
        .status()
        .expect("run candle-augment");

    assert!(!status.success());
    assert_eq!(fs::read_to_string(&input).expect("read input"), contents);
}

#[test]
fn cli_fails_on_headerless_input() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("empty.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "").expect("write input");

    let status = binary()
        .args(["--input", input.to_str().expect("input path")])
        .args(["--output", output.to_str().expect("output path")])
        .status()
        .expect("run candle-augment");

    assert!(!status.success());
    assert!(!output.exists());
}
