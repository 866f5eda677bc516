//! Global git identity and defaults.

use crate::config::RunConfig;
use crate::error::Result;
use crate::host::Host;
use crate::steps::check::query_stdout;
use crate::steps::{run_ok, Applied, CheckResult, Step, StepContext};

/// Global git settings besides identity, applied alongside it.
const DEFAULTS: &[(&str, &str)] = &[("init.defaultBranch", "main"), ("pull.rebase", "false")];

/// Global git identity (and a few defaults).
#[derive(Debug, Default)]
pub struct GitIdentity;

fn wanted(config: &RunConfig) -> Vec<(&str, &str)> {
    let mut settings = vec![
        ("user.name", config.identity.name.as_str()),
        ("user.email", config.identity.email.as_str()),
    ];
    settings.extend_from_slice(DEFAULTS);
    settings
}

impl Step for GitIdentity {
    fn name(&self) -> &'static str {
        "git_identity"
    }

    fn title(&self) -> &'static str {
        "Git identity"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["xcode_tools"]
    }

    fn check(&self, config: &RunConfig, host: &dyn Host) -> CheckResult {
        let differing: Vec<&str> = wanted(config)
            .into_iter()
            .filter(|(key, value)| {
                query_stdout(host, "git", &["config", "--global", *key]).as_deref() != Some(*value)
            })
            .map(|(key, _)| key)
            .collect();

        if differing.is_empty() {
            CheckResult::complete(format!(
                "{} <{}>",
                config.identity.name, config.identity.email
            ))
        } else {
            CheckResult::incomplete("git global config differs", differing.join(", "))
        }
    }

    fn describe(&self, config: &RunConfig) -> String {
        format!(
            "git config --global user.name \"{}\" and user.email {}",
            config.identity.name, config.identity.email
        )
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        for (key, value) in wanted(ctx.config) {
            run_ok(ctx.host, self.name(), "git", &["config", "--global", key, value], &[])?;
        }
        Ok(Applied::once())
    }
}
