//! The rigup block in `~/.zshrc`.

use std::path::PathBuf;

use crate::config::RunConfig;
use crate::error::Result;
use crate::host::{brew_prefix, Host};
use crate::steps::{Applied, CheckResult, Step, StepContext};

use super::marker::MarkerBlock;

/// Appends Homebrew, pyenv and Poetry setup to `~/.zshrc`.
#[derive(Debug, Default)]
pub struct ShellProfile;

fn zshrc(host: &dyn Host) -> PathBuf {
    host.home_dir().join(".zshrc")
}

fn block(host: &dyn Host) -> MarkerBlock {
    let brew = brew_prefix(host).join("bin/brew");
    MarkerBlock::new(format!(
        r#"eval "$({} shellenv)"
export PYENV_ROOT="$HOME/.pyenv"
[[ -d $PYENV_ROOT/bin ]] && export PATH="$PYENV_ROOT/bin:$PATH"
eval "$(pyenv init -)"
export PATH="$HOME/.local/bin:$PATH""#,
        brew.display()
    ))
}

impl Step for ShellProfile {
    fn name(&self) -> &'static str {
        "shell_profile"
    }

    fn title(&self) -> &'static str {
        "Shell profile"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["oh_my_zsh"]
    }

    fn check(&self, _config: &RunConfig, host: &dyn Host) -> CheckResult {
        let path = zshrc(host);
        if MarkerBlock::is_present(host, &path) {
            CheckResult::complete(format!("rigup block in {}", path.display()))
        } else {
            CheckResult::incomplete(
                format!("no rigup block in {}", path.display()),
                "Homebrew, pyenv and Poetry are not set up for new shells",
            )
        }
    }

    fn describe(&self, _config: &RunConfig) -> String {
        "append Homebrew, pyenv and Poetry PATH setup to ~/.zshrc".to_string()
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let path = zshrc(&*ctx.host);
        let block = block(&*ctx.host);
        block.append_once(ctx.host, &path)?;
        Ok(Applied::once())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::steps::catalog::marker::BEGIN;
    use crate::steps::catalog::testing::{apply, config};
    use std::path::Path;

    #[test]
    fn appends_block_after_existing_content() {
        let mut host = MockHost::macos().with_file("/Users/dev/.zshrc", "alias ll='ls -l'\n");
        apply(&ShellProfile, &config(), &mut host).unwrap();

        let content = host.read_file(Path::new("/Users/dev/.zshrc")).unwrap();
        assert!(content.starts_with("alias ll='ls -l'\n"));
        assert!(content.contains("/opt/homebrew/bin/brew shellenv"));
        assert!(content.contains("pyenv init"));
        assert!(ShellProfile.check(&config(), &host).complete);
    }

    #[test]
    fn running_twice_leaves_one_block() {
        let mut host = MockHost::macos();
        apply(&ShellProfile, &config(), &mut host).unwrap();
        apply(&ShellProfile, &config(), &mut host).unwrap();

        let content = host.read_file(Path::new("/Users/dev/.zshrc")).unwrap();
        assert_eq!(content.matches(BEGIN).count(), 1);
    }
}
