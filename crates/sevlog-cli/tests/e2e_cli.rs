//! E2E tests for the sevlog CLI.
//!
//! These tests spawn the actual binary and verify:
//! - Exit codes
//! - stdout/stderr routing
//! - Config file and environment handling

use std::io::Write as _;
use std::process::{Command, Output};

/// Path to the compiled binary.
fn get_binary_path() -> String {
    env!("CARGO_BIN_EXE_sevlog").to_string()
}

/// Run the CLI with color disabled and a clean sevlog environment.
fn run_cli(args: &[&str]) -> Output {
    run_cli_with_env(args, &[])
}

fn run_cli_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(get_binary_path());
    command
        .args(args)
        .args(["--color", "never"])
        .env_remove("SEVLOG_MAX_LEVEL")
        .env_remove("SEVLOG_DEFAULT_LEVEL")
        .env_remove("SEVLOG_COLOR");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("Failed to execute CLI binary")
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// Help
// =============================================================================

#[test]
fn e2e_cli_help_lists_commands() {
    let output = Command::new(get_binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute CLI binary");
    assert!(output.status.success());
    let stdout = stdout_str(&output);
    for command in ["log", "render", "levels"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
}

// =============================================================================
// Render
// =============================================================================

#[test]
fn e2e_render_json_value() {
    let output = run_cli(&["render", "info", "message", r#"{"a": 1}"#]);
    assert!(output.status.success());
    assert_eq!(
        stdout_str(&output),
        "info:     message\ninfo:     {\ninfo:       \"a\": 1\ninfo:     }\n"
    );
    assert!(stderr_str(&output).is_empty());
}

#[test]
fn e2e_render_below_threshold_prints_nothing() {
    let output = run_cli(&["render", "debug", "hidden"]);
    assert!(output.status.success());
    assert!(stdout_str(&output).is_empty());
}

#[test]
fn e2e_render_with_truncate() {
    let output = run_cli(&["render", "info", "abcdefghijklmnopqrstuvwxyz", "--truncate", "10"]);
    assert!(output.status.success());
    assert_eq!(stdout_str(&output), "info:     abcd...xyz\n");
}

#[test]
fn e2e_render_raw_keeps_strings() {
    let output = run_cli(&["render", "info", "--raw", "[1,2]"]);
    assert!(output.status.success());
    assert_eq!(stdout_str(&output), "info:     [1,2]\n");
}

// =============================================================================
// Log
// =============================================================================

#[test]
fn e2e_log_routes_errors_to_stderr() {
    let output = run_cli(&["log", "error", "boom"]);
    assert!(output.status.success());
    assert_eq!(stderr_str(&output), "error:    boom\n");
    assert!(stdout_str(&output).is_empty());
}

#[test]
fn e2e_log_routes_info_to_stdout() {
    let output = run_cli(&["log", "notice", "hello"]);
    assert!(output.status.success());
    assert_eq!(stdout_str(&output), "notice:   hello\n");
    assert!(stderr_str(&output).is_empty());
}

#[test]
fn e2e_log_threshold_from_env() {
    let output = run_cli_with_env(&["log", "debug", "visible"], &[("SEVLOG_MAX_LEVEL", "debug")]);
    assert!(output.status.success());
    assert_eq!(stdout_str(&output), "debug:    visible\n");
}

#[test]
fn e2e_flag_overrides_env() {
    let output = run_cli_with_env(
        &["log", "info", "quiet", "--max-level", "error"],
        &[("SEVLOG_MAX_LEVEL", "debug")],
    );
    assert!(output.status.success());
    assert!(stdout_str(&output).is_empty());
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn e2e_unknown_level_fails() {
    let output = run_cli(&["log", "fatal", "x"]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).starts_with("Error: invalid level: \"fatal\""));
}

#[test]
fn e2e_unknown_max_level_fails() {
    let output = run_cli(&["render", "info", "x", "--max-level", "loud"]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("Error:"));
}

#[test]
fn e2e_missing_levels_file_fails() {
    let output = run_cli(&["levels", "--levels", "/nonexistent/levels.toml"]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("invalid levels configuration"));
}

// =============================================================================
// Levels
// =============================================================================

#[test]
fn e2e_levels_lists_syslog() {
    let output = run_cli(&["levels"]);
    assert!(output.status.success());
    let stdout = stdout_str(&output);
    assert_eq!(stdout.lines().count(), 9);
    assert!(stdout.contains("info         6  info     default, threshold"));
}

#[test]
fn e2e_levels_from_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[levels.fatal]
value = 0
channel = "error"

[levels.chatty]
value = 1
channel = "debug"
isDefault = true
"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let output = run_cli(&["levels", "--levels", path]);
    assert!(output.status.success());
    let lines: Vec<String> = stdout_str(&output).lines().map(String::from).collect();
    assert_eq!(
        lines,
        [
            "NAME    VALUE  CHANNEL  FLAGS",
            "fatal       0  error",
            "chatty      1  debug    default, threshold",
        ]
    );

    let output = run_cli(&["log", "chatty", "hi", "--levels", path]);
    assert_eq!(stdout_str(&output), "chatty:  hi\n");
}

// =============================================================================
// Color environment
// =============================================================================

/// Run with `--color` left at `auto` so the color variables decide.
fn run_cli_auto_color(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(get_binary_path());
    command
        .args(args)
        .env_remove("SEVLOG_COLOR")
        .env_remove("SEVLOG_FORCE_COLOR")
        .env_remove("SEVLOG_PLAIN")
        .env_remove("NO_COLOR")
        .env_remove("CI");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("Failed to execute CLI binary")
}

#[test]
fn e2e_plain_env_keeps_output_unstyled() {
    let output = run_cli_auto_color(&["log", "error", "boom"], &[("SEVLOG_PLAIN", "1")]);
    assert!(output.status.success());
    assert_eq!(stderr_str(&output), "error:    boom\n");
}

#[test]
fn e2e_force_color_wins_over_plain_env() {
    let output = run_cli_auto_color(
        &["log", "error", "boom"],
        &[("SEVLOG_PLAIN", "1"), ("SEVLOG_FORCE_COLOR", "1")],
    );
    assert!(output.status.success());
    let stderr = stderr_str(&output);
    assert!(stderr.contains("\u{1b}["), "expected styled output, got {stderr:?}");
    assert!(stderr.contains("error:    boom"));
}
