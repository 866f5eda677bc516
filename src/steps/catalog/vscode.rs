//! VS Code settings and extensions.
//!
//! Settings are merged key by key into the existing `settings.json`; keys
//! the profile does not mention are left alone.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::{Applied, CheckResult, Step, StepContext};

/// The `code` launcher inside the app bundle, used before it is on `PATH`.
const BUNDLED_CLI: &str = "/Applications/Visual Studio Code.app/Contents/Resources/app/bin/code";

fn settings_path(host: &dyn Host) -> PathBuf {
    host.home_dir()
        .join("Library/Application Support/Code/User/settings.json")
}

/// Parse `settings.json`; a missing or empty file is an empty object.
fn read_settings(host: &dyn Host, path: &Path) -> std::result::Result<Map<String, Value>, String> {
    let Some(content) = host.read_file(path) else {
        return Ok(Map::new());
    };
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("settings.json is not a JSON object".to_string()),
        Err(e) => Err(format!("settings.json is not valid JSON: {}", e)),
    }
}

/// Merges the profile's editor settings into VS Code's user settings,
/// keeping every key the operator set that the profile does not mention.
#[derive(Debug, Default)]
pub struct VscodeSettings;

impl Step for VscodeSettings {
    fn name(&self) -> &'static str {
        "vscode_settings"
    }

    fn title(&self) -> &'static str {
        "VS Code settings"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["brew_casks"]
    }

    fn check(&self, config: &RunConfig, host: &dyn Host) -> CheckResult {
        let path = settings_path(host);
        let current = match read_settings(host, &path) {
            Ok(map) => map,
            Err(message) => return CheckResult::incomplete("settings.json unreadable", message),
        };

        let differing: Vec<&str> = config
            .profile
            .vscode_settings
            .iter()
            .filter(|(key, value)| current.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.as_str())
            .collect();

        if differing.is_empty() {
            CheckResult::complete(format!(
                "{} settings already applied",
                config.profile.vscode_settings.len()
            ))
        } else {
            CheckResult::incomplete(
                format!("{} settings differ", differing.len()),
                differing.join(", "),
            )
        }
    }

    fn describe(&self, config: &RunConfig) -> String {
        format!(
            "merge {} settings into ~/Library/Application Support/Code/User/settings.json",
            config.profile.vscode_settings.len()
        )
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let path = settings_path(&*ctx.host);
        let mut settings = read_settings(&*ctx.host, &path)
            .map_err(|message| RigupError::step(self.name(), message))?;

        for (key, value) in &ctx.config.profile.vscode_settings {
            settings.insert(key.clone(), value.clone());
        }

        let mut rendered = serde_json::to_string_pretty(&Value::Object(settings))
            .map_err(|e| RigupError::Other(e.into()))?;
        rendered.push('\n');
        ctx.host.write_file(&path, &rendered)?;
        Ok(Applied::once())
    }
}

/// Installs the profile's VS Code extensions.
#[derive(Debug, Default)]
pub struct VscodeExtensions;

fn code_cli(host: &dyn Host) -> Option<String> {
    if host.command_exists("code") {
        Some("code".to_string())
    } else if host.path_exists(Path::new(BUNDLED_CLI)) {
        Some(BUNDLED_CLI.to_string())
    } else {
        None
    }
}

fn missing_extensions<'c>(config: &'c RunConfig, host: &dyn Host, cli: &str) -> Vec<&'c str> {
    let installed: BTreeSet<String> = host
        .query(cli, &["--list-extensions"])
        .ok()
        .filter(|r| r.success)
        .map(|r| r.stdout.lines().map(|l| l.trim().to_lowercase()).collect())
        .unwrap_or_default();

    config
        .profile
        .vscode_extensions
        .iter()
        .filter(|ext| !installed.contains(&ext.to_lowercase()))
        .map(String::as_str)
        .collect()
}

impl Step for VscodeExtensions {
    fn name(&self) -> &'static str {
        "vscode_extensions"
    }

    fn title(&self) -> &'static str {
        "VS Code extensions"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["brew_casks"]
    }

    fn check(&self, config: &RunConfig, host: &dyn Host) -> CheckResult {
        let wanted = config.profile.vscode_extensions.len();
        let Some(cli) = code_cli(host) else {
            return CheckResult::incomplete("code CLI not found", "VS Code is not installed");
        };
        let missing = missing_extensions(config, host, &cli);
        if missing.is_empty() {
            CheckResult::complete(format!("all {} extensions installed", wanted))
        } else {
            CheckResult::incomplete(
                format!("{} of {} extensions missing", missing.len(), wanted),
                missing.join(", "),
            )
        }
    }

    fn describe(&self, config: &RunConfig) -> String {
        format!(
            "code --install-extension {}",
            config.profile.vscode_extensions.join(" ")
        )
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let Some(cli) = code_cli(&*ctx.host) else {
            return Err(RigupError::step(
                self.name(),
                "VS Code command line launcher not found",
            ));
        };

        let missing = missing_extensions(ctx.config, &*ctx.host, &cli);
        let mut failed = Vec::new();
        for ext in &missing {
            let result = ctx.host.run(&cli, &["--install-extension", *ext], &[])?;
            if !result.success {
                tracing::warn!("Failed to install extension {}: {}", ext, result.diagnostic());
                failed.push(*ext);
            }
        }

        if !failed.is_empty() {
            return Err(RigupError::step(
                self.name(),
                format!("failed to install {}", failed.join(", ")),
            ));
        }
        Ok(Applied::once().with_note(format!("installed {} extensions", missing.len())))
    }
}
