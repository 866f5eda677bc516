//! Oh My Zsh, installed unattended.

use std::time::Duration;

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::check::path_exists;
use crate::steps::{run_ok, Applied, CheckResult, Step, StepContext};

pub const INSTALL_URL: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Oh My Zsh, installed unattended so it neither starts a shell nor
/// replaces an existing `~/.zshrc`.
#[derive(Debug, Default)]
pub struct OhMyZsh;

impl Step for OhMyZsh {
    fn name(&self) -> &'static str {
        "oh_my_zsh"
    }

    fn title(&self) -> &'static str {
        "Oh My Zsh"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["xcode_tools"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        path_exists(host, &host.home_dir().join(".oh-my-zsh"))
    }

    fn describe(&self, _config: &RunConfig) -> String {
        format!("run the Oh My Zsh installer from {} unattended", INSTALL_URL)
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let script = ctx.host.fetch(INSTALL_URL, FETCH_TIMEOUT)?;
        run_ok(
            ctx.host,
            self.name(),
            "sh",
            &["-c", script.as_str(), "", "--unattended"],
            &[("RUNZSH", "no"), ("CHSH", "no"), ("KEEP_ZSHRC", "yes")],
        )?;

        let dir = ctx.host.home_dir().join(".oh-my-zsh");
        if !ctx.host.path_exists(&dir) {
            return Err(RigupError::step(
                self.name(),
                format!("installer finished but {} is missing", dir.display()),
            ));
        }
        Ok(Applied::once())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockEffect, MockHost};
    use crate::steps::catalog::testing::{apply, config};

    #[test]
    fn installs_when_missing() {
        let mut host = MockHost::macos().simulate(
            "sh -c",
            vec![MockEffect::WriteFile(
                "/Users/dev/.oh-my-zsh/oh-my-zsh.sh".into(),
                String::new(),
            )],
        );
        assert!(!OhMyZsh.check(&config(), &host).complete);

        apply(&OhMyZsh, &config(), &mut host).unwrap();
        assert_eq!(host.fetches(), &[INSTALL_URL.to_string()]);
        assert!(host.runs()[0].ends_with(" --unattended"));
        assert!(OhMyZsh.check(&config(), &host).complete);
    }

    #[test]
    fn installer_failure_is_reported() {
        let mut host = MockHost::macos().fail_run("sh -c", 1, "git clone failed");
        let err = apply(&OhMyZsh, &config(), &mut host).unwrap_err();
        assert!(err.to_string().contains("git clone failed"));
    }
}
