use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn seascape(config_dir: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_seascape"));
    command
        .env("SEASCAPE_CONFIG_DIR", config_dir)
        .env_remove("SEASCAPE_CONFIG")
        .env_remove("RUST_LOG");
    command
}

#[test]
fn defaults_print_emits_parseable_toml() {
    let root = TempDir::new().unwrap();

    let output = seascape(root.path())
        .args(["defaults", "print"])
        .output()
        .expect("failed to run seascape defaults print");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("version = 1"));
    assert!(stdout.contains("[sea]"));
    assert!(stdout.contains("[march]"));

    let parsed = seaconfig::OceanConfig::from_toml_str(&stdout).unwrap();
    assert_eq!(parsed, seaconfig::OceanConfig::default());
}

#[test]
fn defaults_where_reports_missing_file() {
    let root = TempDir::new().unwrap();

    let output = seascape(root.path())
        .args(["defaults", "where"])
        .output()
        .expect("failed to run seascape defaults where");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("config.toml"));
    assert!(stdout.contains("(not present)"));
}

#[test]
fn still_export_writes_png_of_requested_size() {
    let root = TempDir::new().unwrap();
    let target = root.path().join("frames/still.png");

    let output = seascape(root.path())
        .args(["--size", "24x16", "--still-time", "2", "--still-export"])
        .arg(&target)
        .output()
        .expect("failed to run seascape still export");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim_end().ends_with("still.png"));

    let image = image::open(&target).unwrap();
    assert_eq!((image.width(), image.height()), (24, 16));
}

#[test]
fn invalid_user_config_fails_startup() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("config.toml"), "version = 2\n").unwrap();
    let target = root.path().join("still.png");

    let status = seascape(root.path())
        .args(["--size", "8x8", "--still-export"])
        .arg(&target)
        .status()
        .expect("failed to run seascape");

    assert!(!status.success());
    assert!(!target.exists());
}
