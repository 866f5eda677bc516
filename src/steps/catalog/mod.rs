//! The built-in macOS workstation steps.
//!
//! [`catalogue`] returns them in execution order; every `depends_on`
//! entry names a step earlier in the list.

mod brew;
mod claude;
mod dock;
mod git;
mod homebrew;
mod macos;
pub mod marker;
mod oh_my_zsh;
mod poetry;
mod python;
mod shell_profile;
mod ssh;
mod vscode;
mod xcode;

pub use brew::{BrewPackages, PackageSet};
pub use claude::ClaudeCli;
pub use dock::Dock;
pub use git::GitIdentity;
pub use homebrew::Homebrew;
pub use macos::MacOs;
pub use oh_my_zsh::OhMyZsh;
pub use poetry::Poetry;
pub use python::Python;
pub use shell_profile::ShellProfile;
pub use ssh::{SshConfig, SshKey};
pub use vscode::{VscodeExtensions, VscodeSettings};
pub use xcode::XcodeTools;

use super::Step;

/// Every built-in step, in execution order.
pub fn catalogue() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(MacOs),
        Box::new(XcodeTools),
        Box::new(Homebrew::default()),
        Box::new(BrewPackages::formulae()),
        Box::new(BrewPackages::casks()),
        Box::new(BrewPackages::work_casks()),
        Box::new(OhMyZsh),
        Box::new(ShellProfile),
        Box::new(Python),
        Box::new(Poetry),
        Box::new(GitIdentity),
        Box::new(SshKey),
        Box::new(SshConfig),
        Box::new(VscodeSettings),
        Box::new(VscodeExtensions),
        Box::new(ClaudeCli),
        Box::new(Dock),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::{Identity, RunConfig};
    use crate::error::Result;
    use crate::host::MockHost;
    use crate::steps::{Applied, Step, StepContext};
    use crate::ui::MockUI;

    pub fn config() -> RunConfig {
        RunConfig::new(Identity::new("Test User", "test@example.com"))
    }

    pub fn apply_with_ui(
        step: &dyn Step,
        config: &RunConfig,
        host: &mut MockHost,
        ui: &mut MockUI,
    ) -> Result<Applied> {
        let mut ctx = StepContext { config, host, ui };
        step.apply(&mut ctx)
    }

    pub fn apply(step: &dyn Step, config: &RunConfig, host: &mut MockHost) -> Result<Applied> {
        apply_with_ui(step, config, host, &mut MockUI::new())
    }
}
