//! The host operating system gate.

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::{Applied, CheckResult, Step, StepContext};

/// Refuses to provision anything but macOS.
#[derive(Debug, Default)]
pub struct MacOs;

impl Step for MacOs {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn title(&self) -> &'static str {
        "Check operating system"
    }

    fn required(&self) -> bool {
        true
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        let os = host.os();
        if os == "macos" {
            CheckResult::complete(format!("macOS on {}", host.arch()))
        } else {
            CheckResult::incomplete(
                format!("running on {}", os),
                "rigup only provisions macOS",
            )
        }
    }

    fn describe(&self, _config: &RunConfig) -> String {
        "verify the machine runs macOS".to_string()
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        Err(RigupError::UnsupportedOs { os: ctx.host.os() })
    }
}
