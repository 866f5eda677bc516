//! The Claude Code CLI, installed through npm.

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::check::command_on_path;
use crate::steps::{run_ok, Applied, CheckResult, Step, StepContext};

pub const PACKAGE: &str = "@anthropic-ai/claude-code";

/// The Claude Code CLI, installed globally with npm.
#[derive(Debug, Default)]
pub struct ClaudeCli;

impl Step for ClaudeCli {
    fn name(&self) -> &'static str {
        "claude_cli"
    }

    fn title(&self) -> &'static str {
        "Claude Code CLI"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["brew_formulae"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        command_on_path(host, "claude")
    }

    fn describe(&self, _config: &RunConfig) -> String {
        format!("npm install -g {}", PACKAGE)
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        if !ctx.host.command_exists("npm") {
            return Err(RigupError::step(
                self.name(),
                "npm is not installed (node comes from the brew_formulae step)",
            ));
        }
        run_ok(ctx.host, self.name(), "npm", &["install", "-g", PACKAGE], &[])?;
        Ok(Applied::once())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockEffect, MockHost};
    use crate::steps::catalog::testing::{apply, config};

    #[test]
    fn installs_with_npm() {
        let mut host = MockHost::macos()
            .with_command("npm")
            .simulate("npm install -g", vec![MockEffect::AddCommand("claude".into())]);
        assert!(!ClaudeCli.check(&config(), &host).complete);

        apply(&ClaudeCli, &config(), &mut host).unwrap();
        assert_eq!(
            host.runs(),
            &["npm install -g @anthropic-ai/claude-code".to_string()]
        );
        assert!(ClaudeCli.check(&config(), &host).complete);
    }

    #[test]
    fn requires_npm() {
        let mut host = MockHost::macos();
        let err = apply(&ClaudeCli, &config(), &mut host).unwrap_err();
        assert!(err.to_string().contains("npm is not installed"));
    }
}
