//! Xcode Command Line Tools.
//!
//! The installer is a GUI dialog, so interactive runs wait for the operator
//! to confirm it finished.

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::check::query_stdout;
use crate::steps::{Applied, CheckResult, Step, StepContext};
use crate::ui::Prompt;

/// Xcode Command Line Tools.
///
/// `xcode-select --install` only opens Apple's GUI installer, so the step
/// waits for the operator in interactive runs and re-checks afterwards.
#[derive(Debug, Default)]
pub struct XcodeTools;

fn installed(host: &dyn Host) -> Option<String> {
    query_stdout(host, "xcode-select", &["-p"]).filter(|p| !p.is_empty())
}

impl Step for XcodeTools {
    fn name(&self) -> &'static str {
        "xcode_tools"
    }

    fn title(&self) -> &'static str {
        "Xcode Command Line Tools"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["macos"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        match installed(host) {
            Some(path) => CheckResult::complete(format!("Command Line Tools at {}", path)),
            None => CheckResult::incomplete(
                "Command Line Tools not installed",
                "`xcode-select -p` failed",
            ),
        }
    }

    fn describe(&self, _config: &RunConfig) -> String {
        "run `xcode-select --install` and wait for the installer".to_string()
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let started = ctx.host.run("xcode-select", &["--install"], &[])?;
        if !started.success {
            tracing::debug!("xcode-select --install: {}", started.diagnostic());
        }

        if ctx.ui.is_interactive() && !ctx.config.non_interactive {
            ctx.ui.message(
                "A macOS dialog is installing the Command Line Tools. Finish it before continuing.",
            );
            ctx.ui.prompt(&Prompt::confirm(
                "xcode_tools_done",
                "Has the Command Line Tools installer finished?",
                true,
            ))?;
        }

        if installed(&*ctx.host).is_some() {
            Ok(Applied::once())
        } else {
            Err(RigupError::step(
                self.name(),
                "Command Line Tools are not installed yet; finish the installer and re-run rigup",
            ))
        }
    }
}
