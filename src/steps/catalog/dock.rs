//! Dock layout through dockutil.

use std::path::Path;

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::check::query_succeeds;
use crate::steps::{Applied, CheckResult, Step, StepContext};

/// Pins the profile's applications to the Dock with `dockutil`.
#[derive(Debug, Default)]
pub struct Dock;

/// Dock label for an application bundle path (`/Applications/iTerm.app` -> `iTerm`).
fn label(app: &str) -> &str {
    Path::new(app)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(app)
}

fn missing_apps<'c>(config: &'c RunConfig, host: &dyn Host) -> Vec<&'c str> {
    config
        .profile
        .dock_apps
        .iter()
        .map(String::as_str)
        .filter(|app| !query_succeeds(host, "dockutil", &["--find", label(app)]))
        .collect()
}

impl Step for Dock {
    fn name(&self) -> &'static str {
        "dock"
    }

    fn title(&self) -> &'static str {
        "Dock"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["brew_formulae", "brew_casks"]
    }

    fn enabled(&self, config: &RunConfig) -> bool {
        !config.profile.dock_apps.is_empty()
    }

    fn check(&self, config: &RunConfig, host: &dyn Host) -> CheckResult {
        if !host.command_exists("dockutil") {
            return CheckResult::incomplete("dockutil not found", "dockutil is not on PATH");
        }
        let missing = missing_apps(config, host);
        if missing.is_empty() {
            CheckResult::complete(format!("{} apps in the Dock", config.profile.dock_apps.len()))
        } else {
            let labels: Vec<&str> = missing.iter().map(|app| label(app)).collect();
            CheckResult::incomplete(
                format!("{} apps not in the Dock", missing.len()),
                labels.join(", "),
            )
        }
    }

    fn describe(&self, config: &RunConfig) -> String {
        let labels: Vec<&str> = config.profile.dock_apps.iter().map(|a| label(a)).collect();
        format!("dockutil --add {} and restart the Dock", labels.join(", "))
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        if !ctx.host.command_exists("dockutil") {
            return Err(RigupError::step(
                self.name(),
                "dockutil is not installed (it comes from the brew_formulae step)",
            ));
        }

        let missing = missing_apps(ctx.config, &*ctx.host);
        let mut failed = Vec::new();
        let mut added = 0;
        for app in &missing {
            let result = ctx.host.run("dockutil", &["--no-restart", "--add", *app], &[])?;
            if result.success {
                added += 1;
            } else {
                tracing::warn!("dockutil could not add {}: {}", app, result.diagnostic());
                failed.push(label(app));
            }
        }

        if added > 0 {
            let restart = ctx.host.run("killall", &["Dock"], &[])?;
            if !restart.success {
                tracing::debug!("killall Dock: {}", restart.diagnostic());
            }
        }

        if !failed.is_empty() {
            return Err(RigupError::step(
                self.name(),
                format!("could not add {}", failed.join(", ")),
            ));
        }
        Ok(Applied::once().with_note(format!("added {} apps", added)))
    }
}
