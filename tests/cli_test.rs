//! Integration tests for the rigup binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// The binary with no identity leaking in from the environment.
fn rigup() -> Command {
    let mut cmd = Command::new(cargo_bin("rigup"));
    for var in [
        "RIGUP_NAME",
        "RIGUP_EMAIL",
        "RIGUP_PYTHON_VERSION",
        "RIGUP_PROFILE",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_DESCRIPTION")))
        .stdout(predicate::str::contains("--dry-run"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_unknown_flag_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .arg("--frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--frobnicate"))
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn cli_bad_python_version_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .args([
            "--non-interactive",
            "--dry-run",
            "--name",
            "Test User",
            "--email",
            "test@example.com",
            "--python-version",
            "3.12",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid Python version"));
    Ok(())
}

#[test]
fn cli_non_interactive_requires_name() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .args(["--non-interactive", "--email", "test@example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing name"))
        .stdout(predicate::str::contains("Summary").not());
    Ok(())
}

#[test]
fn cli_rejects_invalid_email() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .args([
            "--non-interactive",
            "--name",
            "Test User",
            "--email",
            "test.example.com",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid email address"));
    Ok(())
}

#[test]
fn cli_identity_from_env() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .env("RIGUP_NAME", "Test User")
        .env("RIGUP_EMAIL", "test@example.com")
        .args(["--non-interactive", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"));
    Ok(())
}

#[test]
fn cli_dry_run_skips_every_step() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .args([
            "--non-interactive",
            "--dry-run",
            "--name",
            "Test User",
            "--email",
            "test@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 succeeded"))
        .stdout(predicate::str::contains("17 skipped"))
        .stdout(predicate::str::contains("Manual follow-up:"));
    Ok(())
}

#[test]
fn cli_missing_profile_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .args([
            "--non-interactive",
            "--dry-run",
            "--name",
            "Test User",
            "--email",
            "test@example.com",
            "--profile",
            "/nonexistent/rigup.yml",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Profile not found"));
    Ok(())
}

#[test]
fn cli_profile_file_is_used() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let profile = temp.path().join("rigup.yml");
    fs::write(&profile, "work_tools: true\ndock_apps: []\n")?;

    rigup()
        .args(["steps", "--profile"])
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("work_tools"))
        .stdout(predicate::str::is_match(r"dock .*disabled")?);
    Ok(())
}

#[test]
fn cli_steps_lists_plan_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let output = rigup().arg("steps").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output)?;

    let macos = text.find("macos").ok_or("macos missing")?;
    let homebrew = text.find("homebrew").ok_or("homebrew missing")?;
    let dock = text.rfind("dock").ok_or("dock missing")?;
    assert!(macos < homebrew && homebrew < dock);
    assert!(text.contains("required"));
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rigup"));
    Ok(())
}

#[cfg(not(target_os = "macos"))]
#[test]
fn cli_unsupported_os_halts() -> Result<(), Box<dyn std::error::Error>> {
    rigup()
        .args([
            "--non-interactive",
            "--name",
            "Test User",
            "--email",
            "test@example.com",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Run halted: required step 'macos' failed"));
    Ok(())
}
