//! Homebrew formulae and casks from the profile.
//!
//! Packages are installed one at a time; a failed package does not stop the
//! others, but fails the step.

use crate::config::RunConfig;
use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::steps::check::query_succeeds;
use crate::steps::{Applied, CheckResult, Step, StepContext};

/// Which profile list a [`BrewPackages`] step installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSet {
    Formulae,
    Casks,
    WorkCasks,
}

impl PackageSet {
    fn packages(self, config: &RunConfig) -> &[String] {
        match self {
            Self::Formulae => &config.profile.formulae,
            Self::Casks => &config.profile.casks,
            Self::WorkCasks => &config.profile.work_casks,
        }
    }

    fn flag(self) -> &'static str {
        match self {
            Self::Formulae => "--formula",
            Self::Casks | Self::WorkCasks => "--cask",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Formulae => "formulae",
            Self::Casks | Self::WorkCasks => "casks",
        }
    }
}

/// Installs the missing packages of one profile list, one at a time.
///
/// A package that fails to install does not stop the others; the step
/// fails at the end naming every package that did not install.
#[derive(Debug)]
pub struct BrewPackages {
    set: PackageSet,
}

impl BrewPackages {
    pub fn formulae() -> Self {
        Self {
            set: PackageSet::Formulae,
        }
    }

    pub fn casks() -> Self {
        Self {
            set: PackageSet::Casks,
        }
    }

    pub fn work_casks() -> Self {
        Self {
            set: PackageSet::WorkCasks,
        }
    }

    fn missing<'c>(&self, config: &'c RunConfig, host: &dyn Host) -> Vec<&'c str> {
        self.set
            .packages(config)
            .iter()
            .map(String::as_str)
            .filter(|pkg| !query_succeeds(host, "brew", &["list", self.set.flag(), *pkg]))
            .collect()
    }
}

impl Step for BrewPackages {
    fn name(&self) -> &'static str {
        match self.set {
            PackageSet::Formulae => "brew_formulae",
            PackageSet::Casks => "brew_casks",
            PackageSet::WorkCasks => "work_tools",
        }
    }

    fn title(&self) -> &'static str {
        match self.set {
            PackageSet::Formulae => "Homebrew formulae",
            PackageSet::Casks => "Applications",
            PackageSet::WorkCasks => "Work applications",
        }
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["homebrew"]
    }

    fn enabled(&self, config: &RunConfig) -> bool {
        self.set != PackageSet::WorkCasks || config.work_tools
    }

    fn check(&self, config: &RunConfig, host: &dyn Host) -> CheckResult {
        let wanted = self.set.packages(config).len();
        let missing = self.missing(config, host);
        if missing.is_empty() {
            CheckResult::complete(format!("all {} {} installed", wanted, self.set.noun()))
        } else {
            CheckResult::incomplete(
                format!("{} of {} {} missing", missing.len(), wanted, self.set.noun()),
                missing.join(", "),
            )
        }
    }

    fn describe(&self, config: &RunConfig) -> String {
        let packages = self.set.packages(config);
        format!(
            "brew install {}{}",
            if self.set == PackageSet::Formulae { "" } else { "--cask " },
            packages.join(" ")
        )
    }

    fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
        let missing = self.missing(ctx.config, &*ctx.host);
        let mut failed = Vec::new();

        for pkg in &missing {
            let mut args = vec!["install"];
            if self.set != PackageSet::Formulae {
                args.push("--cask");
            }
            args.push(*pkg);

            tracing::info!("brew {}", args.join(" "));
            let result = ctx.host.run("brew", &args, &[])?;
            if !result.success {
                tracing::warn!("Failed to install {}: {}", pkg, result.diagnostic());
                ctx.ui.warning(&format!("{} did not install: {}", pkg, result.diagnostic()));
                failed.push(*pkg);
            }
        }

        if !failed.is_empty() {
            return Err(RigupError::step(
                self.name(),
                format!("failed to install {}", failed.join(", ")),
            ));
        }
        Ok(Applied::once().with_note(format!("installed {} {}", missing.len(), self.set.noun())))
    }
}
