//! SSH key and client config.

use std::path::PathBuf;

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::check::path_exists;
use crate::steps::{run_ok, Applied, CheckResult, Step, StepContext};

use super::marker::MarkerBlock;

fn key_path(host: &dyn Host) -> PathBuf {
    host.home_dir().join(".ssh/id_ed25519")
}

fn config_path(host: &dyn Host) -> PathBuf {
    host.home_dir().join(".ssh/config")
}

/// An ed25519 key for the operator, with the public half copied to the
/// clipboard for pasting into GitHub.
#[derive(Debug, Default)]
pub struct SshKey;

impl Step for SshKey {
    fn name(&self) -> &'static str {
        "ssh_key"
    }

    fn title(&self) -> &'static str {
        "SSH key"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["macos"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        path_exists(host, &key_path(host))
    }

    fn describe(&self, config: &RunConfig) -> String {
        format!(
            "ssh-keygen -t ed25519 -C {} -f ~/.ssh/id_ed25519 and copy the public key to the clipboard",
            config.identity.email
        )
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let key = key_path(&*ctx.host);
        let key_str = key.to_string_lossy().into_owned();
        if let Some(dir) = key.parent() {
            ctx.host.create_dir_all(dir)?;
        }

        run_ok(
            ctx.host,
            self.name(),
            "ssh-keygen",
            &[
                "-t",
                "ed25519",
                "-C",
                ctx.config.identity.email.as_str(),
                "-f",
                key_str.as_str(),
                "-N",
                "",
            ],
            &[],
        )?;

        let public = key.with_extension("pub");
        let Some(public_key) = ctx.host.read_file(&public) else {
            return Err(RigupError::step(
                self.name(),
                format!("ssh-keygen did not create {}", public.display()),
            ));
        };

        match ctx.host.set_clipboard(public_key.trim()) {
            Ok(()) => {
                ctx.ui.success("Public key copied to clipboard");
                Ok(Applied::once().with_note("public key copied to clipboard"))
            }
            Err(e) => {
                tracing::warn!("Could not copy public key: {}", e);
                ctx.ui.warning(&format!("Copy {} to GitHub manually", public.display()));
                Ok(Applied::once())
            }
        }
    }
}

/// A `Host *` stanza that loads the key into the agent and keychain.
#[derive(Debug, Default)]
pub struct SshConfig;

fn stanza() -> MarkerBlock {
    MarkerBlock::new(
        "Host *\n  AddKeysToAgent yes\n  UseKeychain yes\n  IdentityFile ~/.ssh/id_ed25519",
    )
}

impl Step for SshConfig {
    fn name(&self) -> &'static str {
        "ssh_config"
    }

    fn title(&self) -> &'static str {
        "SSH config"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["ssh_key"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        let path = config_path(host);
        if MarkerBlock::is_present(host, &path) {
            CheckResult::complete(format!("rigup stanza in {}", path.display()))
        } else {
            CheckResult::incomplete(
                format!("no rigup stanza in {}", path.display()),
                "keys are not added to the agent automatically",
            )
        }
    }

    fn describe(&self, _config: &RunConfig) -> String {
        "append a Host * stanza (AddKeysToAgent, UseKeychain, IdentityFile) to ~/.ssh/config"
            .to_string()
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let path = config_path(&*ctx.host);
        stanza().append_once(ctx.host, &path)?;
        Ok(Applied::once())
    }
}
