use std::process::Command;

mod common;

#[test]
fn test_generate_then_simulate() {
    let dir = tempfile::tempdir().unwrap();
    let settings = common::copy_sample_data(dir.path());

    for command in ["generate", "simulate"] {
        let status = Command::new(env!("CARGO_BIN_EXE_conveyor-transport"))
            .arg("--settings")
            .arg(&settings)
            .arg(command)
            .status()
            .unwrap();
        assert!(status.success(), "'{command}' failed");
    }

    for file in ["line-init.csv", "line-result.csv", "split-init.csv", "split-result.csv"] {
        assert!(dir.path().join("out").join(file).exists(), "missing {file}");
    }
}

#[test]
fn test_missing_settings() {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_conveyor-transport"))
        .arg("--settings")
        .arg(dir.path().join("missing.yaml"))
        .arg("simulate")
        .status()
        .unwrap();
    assert!(!status.success());
}
