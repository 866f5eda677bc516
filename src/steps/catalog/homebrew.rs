//! Homebrew bootstrap.

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::{brew_prefix, Host};
use crate::runner::RetryPolicy;
use crate::steps::{run_ok, Applied, CheckResult, Step, StepContext};

pub const INSTALL_URL: &str = "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Installs Homebrew and puts it on `PATH`.
///
/// The download and the installer run together under [`RetryPolicy`]:
/// a failed attempt fetches a fresh copy of the script.
#[derive(Debug, Default)]
pub struct Homebrew {
    retry: RetryPolicy,
}

impl Homebrew {
    pub fn with_retry(retry: RetryPolicy) -> Self {
        Self { retry }
    }
}

impl Step for Homebrew {
    fn name(&self) -> &'static str {
        "homebrew"
    }

    fn title(&self) -> &'static str {
        "Homebrew"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["xcode_tools"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        if host.command_exists("brew") {
            CheckResult::complete("brew on PATH")
        } else {
            let bin = brew_prefix(host).join("bin/brew");
            CheckResult::incomplete("brew not found", format!("expected at {}", bin.display()))
        }
    }

    fn describe(&self, _config: &RunConfig) -> String {
        format!("download {} and run it with NONINTERACTIVE=1", INSTALL_URL)
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let prefix = brew_prefix(&*ctx.host);
        let bin = prefix.join("bin");
        let name = self.name();

        let attempts = if ctx.host.path_exists(&bin.join("brew")) {
            tracing::info!("Homebrew already installed at {}, fixing PATH", prefix.display());
            1
        } else {
            let timeout = self.retry.network_timeout;
            tracing::debug!(
                "Installing Homebrew; giving up after {} attempts (at most {:?})",
                self.retry.max_attempts,
                self.retry.worst_case()
            );
            let (_, attempts) = self.retry.run("Homebrew install", &mut *ctx.host, |host, _| {
                let script = host.fetch(INSTALL_URL, timeout)?;
                run_ok(
                    host,
                    name,
                    "/bin/bash",
                    &["-c", script.as_str()],
                    &[("NONINTERACTIVE", "1")],
                )
            })?;
            attempts
        };

        ctx.host.prepend_path(&bin);
        if !ctx.host.command_exists("brew") {
            return Err(RigupError::step(
                name,
                format!("installer finished but brew is not in {}", bin.display()),
            ));
        }
        Ok(Applied::after(attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockEffect, MockHost};
    use crate::steps::catalog::testing::{apply, config};
    use std::time::Duration;

    fn installs_brew() -> MockHost {
        MockHost::macos().simulate(
            "/bin/bash -c",
            vec![MockEffect::WriteFile("/opt/homebrew/bin/brew".into(), String::new())],
        )
    }

    #[test]
    fn installs_and_prepends_path() {
        let mut host = installs_brew();
        let applied = apply(&Homebrew::default(), &config(), &mut host).unwrap();

        assert_eq!(applied.attempts, 1);
        assert_eq!(host.fetches(), &[INSTALL_URL.to_string()]);
        assert_eq!(host.path()[0], std::path::PathBuf::from("/opt/homebrew/bin"));
        assert!(Homebrew::default().check(&config(), &host).complete);
    }

    #[test]
    fn retries_flaky_download() {
        let mut host = installs_brew()
            .queue_fetch(Err("connection reset"))
            .queue_fetch(Err("timed out"));
        let applied = apply(&Homebrew::default(), &config(), &mut host).unwrap();

        assert_eq!(applied.attempts, 3);
        assert_eq!(
            host.sleeps(),
            &[Duration::from_secs(5), Duration::from_secs(10)]
        );
    }

    #[test]
    fn gives_up_after_three_attempts() {
        let mut host = MockHost::macos().fail_run("/bin/bash -c", 3, "curl: (6) Could not resolve host");
        let err = apply(&Homebrew::default(), &config(), &mut host).unwrap_err();

        assert!(matches!(err, RigupError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(host.run_count("/bin/bash -c"), 3);
        assert_eq!(host.sleeps().len(), 2);
    }

    #[test]
    fn existing_install_only_fixes_path() {
        let mut host = MockHost::macos()
            .with_arch("x86_64")
            .with_file("/usr/local/bin/brew", "");
        apply(&Homebrew::default(), &config(), &mut host).unwrap();

        assert!(host.fetches().is_empty());
        assert_eq!(host.path()[0], std::path::PathBuf::from("/usr/local/bin"));
    }
}
