use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn repo_stats() -> Command {
    let mut cmd = Command::cargo_bin("repo-stats").unwrap();
    cmd.env_remove("GITHUB_TOKEN").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_repository_options() {
    let out = repo_stats()
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("--owner"));
    assert!(text.contains("--ignore-dir"));
}

#[test]
fn missing_env_file_fails_without_output() {
    let dir = tempdir().unwrap();

    let output = repo_stats()
        .current_dir(dir.path())
        .args(["--owner", "octo", "--repo", "demo", "--quiet"])
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(".env"), "stderr: {stderr}");
}

#[test]
fn env_file_without_token_is_rejected() {
    let dir = tempdir().unwrap();
    let env = dir.path().join("custom.env");
    fs::write(&env, "OTHER=1\n").unwrap();

    let output = repo_stats()
        .current_dir(dir.path())
        .args(["--owner", "octo", "--repo", "demo", "--env-file"])
        .arg(&env)
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("GITHUB_TOKEN"));
}

#[test]
fn unreachable_api_exits_non_zero_before_reporting() {
    let dir = tempdir().unwrap();

    let output = repo_stats()
        .current_dir(dir.path())
        .args([
            "--owner",
            "octo",
            "--repo",
            "demo",
            "--token",
            "t",
            "--quiet",
            "--api-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("connect"));
}

#[test]
fn empty_prompt_answer_is_a_config_error() {
    let dir = tempdir().unwrap();

    repo_stats()
        .current_dir(dir.path())
        .args(["--token", "t"])
        .assert()
        .failure();
}
