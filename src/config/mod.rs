//! Run configuration.
//!
//! A [`RunConfig`] is resolved once before any step runs and is never
//! mutated afterwards. Values come from, in order of precedence:
//!
//! 1. Command-line flags (and their `RIGUP_*` environment variables)
//! 2. Interactive prompt answers
//! 3. The profile file passed with `--profile`
//! 4. Built-in defaults ([`Profile::default`])

pub mod profile;
pub mod resolver;
pub mod validate;

pub use profile::{Profile, DEFAULT_PYTHON_VERSION};
pub use resolver::{ConfigResolver, Overrides, Resolution};
pub use validate::{is_valid_email, validate_email, validate_name, validate_python_version};

/// Operator identity stamped into git config and SSH key comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Create an identity without validating it.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Who the machine is being set up for.
    pub identity: Identity,
    /// Python version installed through pyenv.
    pub python_version: String,
    /// Install work-only applications.
    pub work_tools: bool,
    /// Report what would happen without changing anything.
    pub dry_run: bool,
    /// Never prompt.
    pub non_interactive: bool,
    /// Package lists and editor settings.
    pub profile: Profile,
}

impl RunConfig {
    /// A configuration with built-in defaults for everything but identity.
    pub fn new(identity: Identity) -> Self {
        let profile = Profile::default();
        Self {
            identity,
            python_version: profile.python_version.clone(),
            work_tools: profile.work_tools,
            dry_run: false,
            non_interactive: false,
            profile,
        }
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set whether work tools are installed.
    pub fn with_work_tools(mut self, work_tools: bool) -> Self {
        self.work_tools = work_tools;
        self
    }

    /// Set non-interactive mode.
    pub fn with_non_interactive(mut self, non_interactive: bool) -> Self {
        self.non_interactive = non_interactive;
        self
    }

    /// Set the Python version.
    pub fn with_python_version(mut self, version: impl Into<String>) -> Self {
        self.python_version = version.into();
        self
    }

    /// Replace the profile.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_profile_defaults() {
        let config = RunConfig::new(Identity::new("Ada", "ada@example.com"));
        assert_eq!(config.python_version, DEFAULT_PYTHON_VERSION);
        assert!(!config.work_tools);
        assert!(!config.dry_run);
        assert!(!config.non_interactive);
    }

    #[test]
    fn builders_set_fields() {
        let config = RunConfig::new(Identity::new("Ada", "ada@example.com"))
            .with_dry_run(true)
            .with_work_tools(true)
            .with_non_interactive(true)
            .with_python_version("3.11.9");
        assert!(config.dry_run);
        assert!(config.work_tools);
        assert!(config.non_interactive);
        assert_eq!(config.python_version, "3.11.9");
    }
}
