//! CLI argument definitions.
//!
//! The run options live on [`Cli`] itself (flattened from [`RunArgs`] and
//! marked global), so `rigup --dry-run` and `rigup run --dry-run` mean the
//! same thing.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;

/// rigup - provision a macOS developer workstation.
#[derive(Debug, Parser)]
#[command(name = "rigup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    /// Show verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision this machine (default if no command specified)
    Run,

    /// List the provisioning steps in execution order
    Steps,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options that shape a provisioning run.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Full name for git and the SSH key comment
    #[arg(long, env = "RIGUP_NAME", global = true)]
    pub name: Option<String>,

    /// Email for git and the SSH key comment
    #[arg(long, env = "RIGUP_EMAIL", global = true)]
    pub email: Option<String>,

    /// Python version to install with pyenv
    #[arg(long, env = "RIGUP_PYTHON_VERSION", value_name = "X.Y.Z", global = true)]
    pub python_version: Option<String>,

    /// Install work applications (Slack, Zoom, 1Password)
    #[arg(long, global = true, conflicts_with = "no_work_tools")]
    pub work_tools: bool,

    /// Do not install work applications
    #[arg(long, global = true)]
    pub no_work_tools: bool,

    /// Show what would change without changing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Never prompt; --name and --email become required
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// YAML profile with package lists and editor settings
    #[arg(long, env = "RIGUP_PROFILE", value_name = "PATH", global = true)]
    pub profile: Option<PathBuf>,
}

impl RunArgs {
    /// `Some` only when one of the work-tools flags was given.
    pub fn work_tools_flag(&self) -> Option<bool> {
        if self.work_tools {
            Some(true)
        } else if self.no_work_tools {
            Some(false)
        } else {
            None
        }
    }

    /// The values these flags pin for config resolution.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            name: self.name.clone(),
            email: self.email.clone(),
            python_version: self.python_version.clone(),
            work_tools: self.work_tools_flag(),
            dry_run: self.dry_run,
            non_interactive: self.non_interactive,
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
