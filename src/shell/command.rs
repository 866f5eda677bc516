//! Shell command execution.

use crate::error::{RigupError, Result};
use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Best diagnostic line for a failed command: last stderr line, else last stdout line.
    pub fn diagnostic(&self) -> String {
        let pick = |s: &str| {
            s.lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string())
        };
        pick(&self.stderr)
            .or_else(|| pick(&self.stdout))
            .unwrap_or_else(|| format!("exit code {:?}", self.exit_code))
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

impl CommandOptions {
    /// Options that capture both output streams.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }
}

/// Execute a program with explicit arguments (no shell parsing).
pub fn execute_program(
    program: &str,
    args: &[&str],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let start = Instant::now();
    let shown = display_command(program, args);
    tracing::debug!("Executing: {}", shown);

    let mut cmd = Command::new(program);
    cmd.args(args);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", program, e);
        RigupError::CommandFailed {
            command: shown.clone(),
            code: None,
        }
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        tracing::debug!("{} exited with {:?}", shown, output.status.code());
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

fn display_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_program_captures_stdout() {
        let result =
            execute_program("/bin/sh", &["-c", "echo hello"], &CommandOptions::captured()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_program_reports_exit_code() {
        let result =
            execute_program("/bin/sh", &["-c", "exit 3"], &CommandOptions::captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_program_with_env() {
        let mut options = CommandOptions::captured();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = execute_program("/bin/sh", &["-c", "echo $MY_VAR"], &options).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn execute_program_passes_args_verbatim() {
        let result =
            execute_program("/bin/echo", &["a b", "$HOME"], &CommandOptions::captured()).unwrap();
        assert!(result.stdout.contains("a b $HOME"));
    }

    #[test]
    fn execute_program_missing_binary_is_error() {
        let result = execute_program(
            "/definitely/not/a/binary",
            &[],
            &CommandOptions::captured(),
        );
        assert!(matches!(result, Err(RigupError::CommandFailed { .. })));
    }

    #[test]
    fn diagnostic_prefers_last_stderr_line() {
        let result = CommandResult::failure(
            Some(1),
            "out\n".into(),
            "first\nError: boom\n\n".into(),
            Duration::ZERO,
        );
        assert_eq!(result.diagnostic(), "Error: boom");
    }

    #[test]
    fn diagnostic_falls_back_to_exit_code() {
        let result = CommandResult::failure(Some(7), String::new(), String::new(), Duration::ZERO);
        assert!(result.diagnostic().contains("7"));
    }
}
