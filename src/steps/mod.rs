//! Provisioning steps.
//!
//! A step is a named, idempotent unit of work:
//!
//! - [`Step::check`] reports whether the machine is already in the wanted
//!   state. It only sees a read-only [`Host`], so it cannot change anything.
//! - [`Step::describe`] says what [`Step::apply`] would do (used by dry runs).
//! - [`Step::apply`] does the work.
//!
//! The built-in macOS steps live in [`catalog`]; [`Plan`] holds an ordered,
//! validated list of them.

pub mod catalog;
pub mod check;
pub mod plan;

pub use catalog::catalogue;
pub use check::CheckResult;
pub use plan::Plan;

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::shell::CommandResult;
use crate::ui::UserInterface;

/// Everything an action may touch.
pub struct StepContext<'a> {
    pub config: &'a RunConfig,
    pub host: &'a mut dyn Host,
    pub ui: &'a mut dyn UserInterface,
}

/// What a successful action reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Attempts used (more than one only for retried operations).
    pub attempts: u32,
    /// Short note for the summary, e.g. "installed 3 formulae".
    pub note: Option<String>,
}

impl Applied {
    /// Succeeded on the first attempt.
    pub fn once() -> Self {
        Self {
            attempts: 1,
            note: None,
        }
    }

    /// Succeeded after `attempts` attempts.
    pub fn after(attempts: u32) -> Self {
        Self {
            attempts,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A provisioning step.
pub trait Step {
    /// Unique name within a plan.
    fn name(&self) -> &'static str;

    /// Human-readable title.
    fn title(&self) -> &'static str;

    /// Whether a failure halts the run.
    fn required(&self) -> bool {
        false
    }

    /// Steps that must run before this one.
    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the step applies to this configuration.
    fn enabled(&self, _config: &RunConfig) -> bool {
        true
    }

    /// Whether the wanted state already exists.
    fn check(&self, config: &RunConfig, host: &dyn Host) -> CheckResult;

    /// What [`apply`](Step::apply) would do.
    fn describe(&self, config: &RunConfig) -> String;

    /// Bring the machine to the wanted state.
    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied>;
}

/// Run a command and turn a non-zero exit into a step failure.
pub(crate) fn run_ok(
    host: &mut dyn Host,
    step: &str,
    program: &str,
    args: &[&str],
    env: &[(&str, &str)],
) -> Result<CommandResult> {
    let result = host.run(program, args, env)?;
    if result.success {
        Ok(result)
    } else {
        Err(RigupError::step(
            step,
            format!("`{} {}` failed: {}", program, args.join(" "), result.diagnostic()),
        ))
    }
}
