//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{RigupError, Result};
use crate::runner::RunReport;

use super::summary::render_summary;
use super::theme::RigupTheme;
use super::{parse_bool, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `RIGUP_PROMPT_<KEY>` environment variables
/// or the prompt's default; a prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("RIGUP_PROMPT_"))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("RIGUP_PROMPT_{}", prompt.key.to_uppercase());
        let answer = self
            .env_overrides
            .get(&env_key)
            .or(prompt.default.as_ref())
            .cloned();

        match (answer, &prompt.prompt_type) {
            (Some(value), PromptType::Confirm) => Ok(PromptResult::Bool(parse_bool(&value))),
            (Some(value), PromptType::Input) => Ok(PromptResult::String(value)),
            (None, _) => Err(RigupError::Prompt {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (no default value)",
                    prompt.key
                ),
            }),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner {
            show: self.mode.shows_spinners(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.mode.shows_status() {
            println!("[{}/{}]", current, total);
        }
    }

    fn show_run_summary(&mut self, report: &RunReport) {
        if !self.mode.shows_status() && report.completed() {
            return;
        }
        for line in render_summary(report, &RigupTheme::plain()) {
            println!("{}", line);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints its final line only (for non-interactive mode).
struct NoopSpinner {
    show: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("  {}", RigupTheme::plain().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if self.show {
            println!("  {}", RigupTheme::plain().format_error(msg));
        }
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.show {
            println!("  {}", RigupTheme::plain().format_skipped(msg));
        }
    }
}
