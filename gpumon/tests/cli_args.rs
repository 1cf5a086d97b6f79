//! CLI tests for the gpumon binary: help, dry-run resolution, and a headless run.
mod common;

use assert_cmd::prelude::*;
use std::io::Write;
use std::process::{Command, Stdio};

fn run_gpumon(xdg: &std::path::Path, args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_gpumon"))
        .env("XDG_CONFIG_HOME", xdg)
        .args(args)
        .output()
        .expect("run gpumon");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

#[test]
fn test_help_mentions_flags() {
    let td = tempfile::tempdir().unwrap();
    let (ok, text) = run_gpumon(td.path(), &["--help"]);
    assert!(ok);
    assert!(
        text.contains("Usage:")
            && text.contains("--script")
            && text.contains("-s")
            && text.contains("--prometheus")
            && text.contains("--headless"),
        "help text missing expected flags\n{text}"
    );
}

#[test]
fn test_dry_run_uses_settings_file() {
    let td = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(td.path().join("gpumon")).unwrap();
    std::fs::write(
        td.path().join("gpumon").join("settings.json"),
        r#"{"enablePrometheus": true, "alertTemp": 80, "script": "/srv/agent/metrics.py"}"#,
    )
    .unwrap();
    let (ok, text) = run_gpumon(td.path(), &["--dry-run"]);
    assert!(ok, "{text}");
    assert!(
        text.contains("collector: python3 /srv/agent/metrics.py --prometheus"),
        "{text}"
    );
    assert!(text.contains("thresholds: gpu 90 vram 90 temp 80"), "{text}");
}

#[test]
fn test_dry_run_flags_override() {
    let td = tempfile::tempdir().unwrap();
    let (ok, text) = run_gpumon(
        td.path(),
        &["--python=pypy3", "-s", "/tmp/m.py", "--dry-run"],
    );
    assert!(ok, "{text}");
    assert!(text.contains("collector: pypy3 /tmp/m.py\n"), "{text}");
}

#[test]
fn test_unknown_flag_prints_usage() {
    let td = tempfile::tempdir().unwrap();
    let (_ok, text) = run_gpumon(td.path(), &["--bogus"]);
    assert!(text.contains("Unknown flag '--bogus'"), "{text}");
}

#[cfg(unix)]
#[test]
fn test_headless_round_trip() {
    let td = tempfile::tempdir().unwrap();
    let script = td.path().join("collector.sh");
    std::fs::write(
        &script,
        format!(
            "sleep 1\nprintf '%s\\n' '{}'\nprintf '%s\\n' '{}'\n",
            common::GPU_91,
            common::NO_GPU
        ),
    )
    .unwrap();

    let mut child = Command::cargo_bin("gpumon")
        .expect("binary exists")
        .env("XDG_CONFIG_HOME", td.path())
        .args(["--headless", "--python", "sh", "--script"])
        .arg(&script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gpumon");
    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, r#"{{"type":"selectGpu","value":2}}"#).unwrap();
    }
    let out = child.wait_with_output().expect("gpumon finished");
    assert!(out.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 6, "{lines:?}");
    assert_eq!(lines[0]["status"], "GPU: --%");
    assert_eq!(lines[1]["status"], "GPU: 91%");
    assert_eq!(lines[2]["payload"]["metrics"][0]["gpu"], 91.0);
    assert_eq!(lines[2]["selectedGpu"], 2);
    assert_eq!(lines[2]["thresholds"]["gpu"], 90.0);
    assert_eq!(lines[3]["status"], "GPU: n/a");
    assert_eq!(lines[4]["payload"]["metrics"], serde_json::json!([]));
    assert_eq!(lines[5]["ended"], 0);

    let state = std::fs::read_to_string(td.path().join("gpumon").join("state.json")).unwrap();
    assert!(state.contains("\"selectedGpu\": 2"), "{state}");
}
