use assert_cmd::cargo::cargo_bin_cmd;
use serde::Deserialize;
use std::{error::Error, fs, path::PathBuf};
use tempfile::tempdir;

#[derive(Deserialize)]
struct BatchLine {
    record: String,
    code: Option<i32>,
    #[serde(default)]
    error: Option<String>,
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("test_data")
        .join(name)
}

#[test]
fn batch_reports_every_record() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::copy(fixture("normal_sinus.csv"), dir.path().join("a_normal.csv"))?;
    fs::copy(fixture("fibrillation.json"), dir.path().join("b_fib.json"))?;
    fs::write(dir.path().join("c_broken.csv"), "r,p\nnot,numbers\n")?;
    fs::copy(fixture("single_beat.csv"), dir.path().join("d_short.csv"))?;
    fs::write(dir.path().join("readme.txt"), "skipped")?;

    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(["diagnose-batch", "--dir", dir.path().to_str().expect("utf8 path")]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let lines: Vec<BatchLine> = String::from_utf8(out)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    let records: Vec<&str> = lines.iter().map(|l| l.record.as_str()).collect();
    assert_eq!(records, vec!["a_normal", "b_fib", "c_broken", "d_short"]);
    assert_eq!(lines[0].code, Some(0));
    assert_eq!(lines[1].code, Some(-5));
    assert_eq!(lines[2].code, None);
    assert_eq!(lines[2].error.as_deref(), Some("fiducial_computation"));
    assert_eq!(lines[3].error.as_deref(), Some("insufficient_data"));
    Ok(())
}

#[test]
fn empty_directory_prints_nothing() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let mut cmd = cargo_bin_cmd!("pqrst");
    cmd.args(["diagnose-batch", "--dir", dir.path().to_str().expect("utf8 path")]);
    let out = cmd.assert().success().get_output().stdout.clone();
    assert!(out.is_empty());
    Ok(())
}
