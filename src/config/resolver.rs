//! Turn flags, prompt answers and the profile into a [`RunConfig`].

use crate::error::{RigupError, Result};
use crate::host::Host;
use crate::ui::{Prompt, UserInterface};

use super::validate::{validate_email, validate_name, validate_python_version};
use super::{Identity, Profile, RunConfig};

/// Times an interactive prompt is re-asked after invalid input.
const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Values given on the command line (or through `RIGUP_*` variables).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub name: Option<String>,
    pub email: Option<String>,
    pub python_version: Option<String>,
    /// `Some(true)` for `--work-tools`, `Some(false)` for `--no-work-tools`.
    pub work_tools: Option<bool>,
    pub dry_run: bool,
    pub non_interactive: bool,
}

/// What the operator decided before any step ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Run with this configuration.
    Proceed(RunConfig),
    /// The operator declined the final confirmation.
    Cancelled,
}

/// Resolves a [`RunConfig`] with flag > prompt > profile > default precedence.
#[derive(Debug)]
pub struct ConfigResolver {
    overrides: Overrides,
    profile: Profile,
}

impl ConfigResolver {
    pub fn new(overrides: Overrides, profile: Profile) -> Self {
        Self { overrides, profile }
    }

    /// Resolve the configuration, prompting when the UI is interactive.
    pub fn resolve(self, ui: &mut dyn UserInterface, host: &dyn Host) -> Result<Resolution> {
        let interactive = !self.overrides.non_interactive && ui.is_interactive();
        tracing::debug!(interactive, "Resolving run configuration");

        if interactive {
            self.resolve_interactive(ui, host)
        } else {
            self.resolve_flags_only().map(Resolution::Proceed)
        }
    }

    fn resolve_flags_only(self) -> Result<RunConfig> {
        let name = match &self.overrides.name {
            Some(name) => validate_name(name)?,
            None => return Err(RigupError::MissingIdentity { field: "name" }),
        };
        let email = match &self.overrides.email {
            Some(email) => validate_email(email)?,
            None => return Err(RigupError::MissingIdentity { field: "email" }),
        };
        let python_version = validate_python_version(
            self.overrides
                .python_version
                .as_deref()
                .unwrap_or(&self.profile.python_version),
        )?;
        let work_tools = self.overrides.work_tools.unwrap_or(self.profile.work_tools);

        Ok(RunConfig {
            identity: Identity::new(name, email),
            python_version,
            work_tools,
            dry_run: self.overrides.dry_run,
            non_interactive: true,
            profile: self.profile,
        })
    }

    fn resolve_interactive(
        self,
        ui: &mut dyn UserInterface,
        host: &dyn Host,
    ) -> Result<Resolution> {
        let name = match &self.overrides.name {
            Some(name) => validate_name(name)?,
            None => ask_valid(
                ui,
                "name",
                "Full name (for git and SSH)",
                git_global(host, "user.name"),
                validate_name,
            )?,
        };
        let email = match &self.overrides.email {
            Some(email) => validate_email(email)?,
            None => ask_valid(
                ui,
                "email",
                "Email address",
                git_global(host, "user.email"),
                validate_email,
            )?,
        };
        let python_version = match &self.overrides.python_version {
            Some(version) => validate_python_version(version)?,
            None => ask_valid(
                ui,
                "python_version",
                "Python version to install",
                Some(self.profile.python_version.clone()),
                validate_python_version,
            )?,
        };
        let work_tools = match self.overrides.work_tools {
            Some(flag) => flag,
            None => ui
                .prompt(&Prompt::confirm(
                    "work_tools",
                    "Install work tools (Slack, Zoom, 1Password)?",
                    self.profile.work_tools,
                ))?
                .as_bool(),
        };
        let dry_run = self.overrides.dry_run
            || ui
                .prompt(&Prompt::confirm(
                    "dry_run",
                    "Dry run (show what would change without changing anything)?",
                    false,
                ))?
                .as_bool();

        ui.message("");
        ui.message(&format!("  Name:           {}", name));
        ui.message(&format!("  Email:          {}", email));
        ui.message(&format!("  Python:         {}", python_version));
        ui.message(&format!("  Work tools:     {}", yes_no(work_tools)));
        ui.message(&format!("  Dry run:        {}", yes_no(dry_run)));
        ui.message("");

        let proceed = ui
            .prompt(&Prompt::confirm("proceed", "Proceed?", true))?
            .as_bool();
        if !proceed {
            tracing::info!("Operator cancelled before the first step");
            return Ok(Resolution::Cancelled);
        }

        Ok(Resolution::Proceed(RunConfig {
            identity: Identity::new(name, email),
            python_version,
            work_tools,
            dry_run,
            non_interactive: false,
            profile: self.profile,
        }))
    }
}

/// Ask until `validate` accepts the answer, warning on each rejection.
fn ask_valid(
    ui: &mut dyn UserInterface,
    key: &str,
    question: &str,
    default: Option<String>,
    validate: fn(&str) -> Result<String>,
) -> Result<String> {
    let prompt = Prompt::input(key, question, default);
    let mut attempt = 1;
    loop {
        let answer = ui.prompt(&prompt)?.as_string();
        match validate(&answer) {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= MAX_PROMPT_ATTEMPTS => return Err(e),
            Err(e) => {
                ui.warning(&format!("{}. Please try again.", e));
                attempt += 1;
            }
        }
    }
}

/// A non-empty value from `git config --global <key>`.
fn git_global(host: &dyn Host, key: &str) -> Option<String> {
    let result = host.query("git", &["config", "--global", key]).ok()?;
    if !result.success {
        return None;
    }
    let value = result.stdout.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
