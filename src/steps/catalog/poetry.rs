//! Poetry, installed with the pyenv Python.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::{run_ok, Applied, CheckResult, Step, StepContext};

pub const INSTALL_URL: &str = "https://install.python-poetry.org";

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Poetry, installed with the official installer into `~/.local/bin`.
#[derive(Debug, Default)]
pub struct Poetry;

fn local_bin(host: &dyn Host) -> PathBuf {
    host.home_dir().join(".local/bin")
}

/// The pyenv-managed interpreter, falling back to the system `python3`.
fn interpreter(host: &dyn Host) -> String {
    let shim = host.home_dir().join(".pyenv/shims/python3");
    if host.path_exists(&shim) {
        shim.to_string_lossy().into_owned()
    } else {
        "python3".to_string()
    }
}

impl Step for Poetry {
    fn name(&self) -> &'static str {
        "poetry"
    }

    fn title(&self) -> &'static str {
        "Poetry"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["python"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        let installed = local_bin(host).join("poetry");
        if host.command_exists("poetry") {
            CheckResult::complete("poetry on PATH")
        } else if host.path_exists(&installed) {
            CheckResult::complete(format!("{} exists", installed.display()))
        } else {
            CheckResult::incomplete("poetry not found", format!("expected at {}", installed.display()))
        }
    }

    fn describe(&self, _config: &RunConfig) -> String {
        format!("run the Poetry installer from {} with the pyenv Python", INSTALL_URL)
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let script = ctx.host.fetch(INSTALL_URL, FETCH_TIMEOUT)?;
        let python = interpreter(&*ctx.host);
        run_ok(ctx.host, self.name(), &python, &["-c", script.as_str()], &[])?;

        let bin = local_bin(&*ctx.host);
        ctx.host.prepend_path(&bin);
        if !ctx.host.command_exists("poetry") {
            return Err(RigupError::step(
                self.name(),
                format!("installer finished but poetry is not in {}", bin.display()),
            ));
        }
        Ok(Applied::once())
    }
}
