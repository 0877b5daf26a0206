//! CLI end-to-end tests
//!
//! Tests for the mediaprobe command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the mediaprobe binary
#[allow(deprecated)]
fn mediaprobe_cmd() -> Command {
    Command::cargo_bin("mediaprobe").unwrap()
}

/// Write a config file pointing at `ffprobe` into `dir`.
fn write_config(dir: &Path, ffprobe: &Path, extra: &str) -> PathBuf {
    let path = dir.join("mediaprobe.toml");
    fs::write(
        &path,
        format!(
            "[tools]\nffprobe_path = {:?}\n\n{extra}",
            ffprobe.display().to_string()
        ),
    )
    .unwrap();
    path
}

#[cfg(unix)]
fn fake_ffprobe(dir: &Path, json: &str) -> PathBuf {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffprobe");
    {
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "#!/bin/sh\ncat <<'JSON'\n{json}\nJSON").unwrap();
        f.sync_all().unwrap();
    }
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
fn av_setup() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let ffprobe = fake_ffprobe(
        dir.path(),
        r#"{"streams": [
            {"codec_name": "h264", "codec_type": "video", "width": 1920, "height": 1080},
            {"codec_name": "aac", "codec_type": "audio"}
        ]}"#,
    );
    let config = write_config(dir.path(), &ffprobe, "");
    (dir, config)
}

#[test]
#[serial]
fn test_cli_no_args_shows_help() {
    let mut cmd = mediaprobe_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
#[serial]
fn test_cli_help_flag() {
    let mut cmd = mediaprobe_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediaprobe"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
#[serial]
fn test_cli_version_flag() {
    let mut cmd = mediaprobe_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediaprobe"));
}

#[test]
#[serial]
fn test_cli_version_command() {
    let mut cmd = mediaprobe_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
#[serial]
fn test_cli_inspect_help() {
    let mut cmd = mediaprobe_cmd();
    cmd.args(["inspect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inspect a local file or network source"))
        .stdout(predicate::str::contains("--count-images"));
}

#[test]
#[serial]
fn test_cli_check_tools_command() {
    let mut cmd = mediaprobe_cmd();
    cmd.arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffprobe"));
}

#[test]
#[serial]
fn test_cli_validate_default() {
    let mut cmd = mediaprobe_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeout: 10s"));
}

#[test]
#[serial]
fn test_cli_validate_rejects_zero_timeout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[probe]\ntimeout_secs = 0\n").unwrap();

    let mut cmd = mediaprobe_cmd();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
#[serial]
fn test_cli_inspect_missing_tool() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("no-ffprobe"), "");

    let mut cmd = mediaprobe_cmd();
    cmd.env("PATH", dir.path())
        .arg("--config")
        .arg(&config)
        .args(["inspect", "/videos/a.mp4"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("ffprobe not found"));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_cli_inspect_video_json() {
    let (_dir, config) = av_setup();

    let output = mediaprobe_cmd()
        .arg("--config")
        .arg(&config)
        .args(["inspect", "/videos/a.mp4", "--video", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["locator"], "/videos/a.mp4");
    assert_eq!(json["result"]["kind"], "video_present");
    assert_eq!(json["result"]["width"], 1920);
    assert_eq!(json["result"]["height"], 1080);
    assert_eq!(json["result"]["header_applied"], false);
}

#[cfg(unix)]
#[test]
#[serial]
fn test_cli_inspect_network_headers_text() {
    let (_dir, config) = av_setup();

    let mut cmd = mediaprobe_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args([
            "inspect",
            "https://example.com/a.m3u8",
            "--audio",
            "-H",
            "Referer: https://example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: audio"))
        .stdout(predicate::str::contains("Headers applied: yes"));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_cli_inspect_requirement_failure_exit_code() {
    let dir = tempdir().unwrap();
    let ffprobe = fake_ffprobe(
        dir.path(),
        r#"{"streams": [{"codec_name": "flac", "codec_type": "audio"}]}"#,
    );
    let config = write_config(dir.path(), &ffprobe, "");

    let mut cmd = mediaprobe_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["inspect", "/music/a.flac", "--video"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no video source found: /music/a.flac"));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_cli_inspect_rejects_bad_header() {
    let (_dir, config) = av_setup();

    let mut cmd = mediaprobe_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["inspect", "https://example.com/a.mp4", "-H", "nocolon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid header"));
}
