//! Python through pyenv.

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::check::query_stdout;
use crate::steps::{run_ok, Applied, CheckResult, Step, StepContext};

/// Installs the configured Python through pyenv and makes it global.
#[derive(Debug, Default)]
pub struct Python;

impl Step for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn title(&self) -> &'static str {
        "Python (pyenv)"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["brew_formulae", "shell_profile"]
    }

    fn check(&self, config: &RunConfig, host: &dyn Host) -> CheckResult {
        match query_stdout(host, "pyenv", &["version-name"]) {
            Some(current) if current == config.python_version => {
                CheckResult::complete(format!("pyenv global is {}", current))
            }
            Some(current) => CheckResult::incomplete(
                format!("pyenv global is {}", current),
                format!("wanted {}", config.python_version),
            ),
            None => CheckResult::incomplete("pyenv has no global version", "pyenv missing or unset"),
        }
    }

    fn describe(&self, config: &RunConfig) -> String {
        format!(
            "pyenv install -s {v} && pyenv global {v}",
            v = config.python_version
        )
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        if !ctx.host.command_exists("pyenv") {
            return Err(RigupError::step(
                self.name(),
                "pyenv is not installed (it comes from the brew_formulae step)",
            ));
        }
        let version = ctx.config.python_version.as_str();

        run_ok(ctx.host, self.name(), "pyenv", &["install", "-s", version], &[])?;
        run_ok(ctx.host, self.name(), "pyenv", &["global", version], &[])?;

        let shims = ctx.host.home_dir().join(".pyenv/shims");
        ctx.host.prepend_path(&shims);
        Ok(Applied::once().with_note(format!("Python {}", version)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockEffect, MockHost};
    use crate::steps::catalog::testing::{apply, config};

    #[test]
    fn satisfied_only_for_matching_version() {
        let host = MockHost::macos()
            .with_command("pyenv")
            .with_query("pyenv version-name", "3.11.9\n");
        let check = Python.check(&config().with_python_version("3.12.7"), &host);
        assert!(!check.complete);
        assert_eq!(check.details.as_deref(), Some("wanted 3.12.7"));

        assert!(Python.check(&config().with_python_version("3.11.9"), &host).complete);
    }

    #[test]
    fn installs_and_sets_global() {
        let config = config().with_python_version("3.12.7");
        let mut host = MockHost::macos().with_command("pyenv").simulate(
            "pyenv global 3.12.7",
            vec![MockEffect::SetQuery {
                command: "pyenv version-name".into(),
                stdout: "3.12.7\n".into(),
            }],
        );

        apply(&Python, &config, &mut host).unwrap();
        assert_eq!(
            host.runs(),
            &[
                "pyenv install -s 3.12.7".to_string(),
                "pyenv global 3.12.7".to_string()
            ]
        );
        assert!(Python.check(&config, &host).complete);
    }

    #[test]
    fn fails_without_pyenv() {
        let mut host = MockHost::macos();
        let err = apply(&Python, &config(), &mut host).unwrap_err();
        assert!(err.to_string().contains("pyenv is not installed"));
        assert!(host.effects().is_empty());
    }
}
