//! rigup - provision a macOS developer workstation.
//!
//! rigup runs an ordered list of named, idempotent steps (Homebrew,
//! packages, shell profile, Python, git and SSH identity, editor setup,
//! Dock) and ends with a report and a list of manual follow-ups. A step
//! that fails is recorded and the run moves on, unless the step is
//! required.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Run configuration, profiles and validation
//! - [`error`] - Error types and result aliases
//! - [`host`] - The machine being provisioned (real or mocked)
//! - [`runner`] - The provisioning state machine, retries and the report
//! - [`shell`] - Process execution
//! - [`steps`] - The step contract and the built-in catalogue
//! - [`ui`] - Prompts, spinners and terminal output
//!
//! # Example
//!
//! ```
//! use rigup::config::{Identity, RunConfig};
//! use rigup::host::MockHost;
//! use rigup::runner::ProvisionRunner;
//! use rigup::steps::Plan;
//! use rigup::ui::MockUI;
//!
//! let plan = Plan::standard().unwrap();
//! let config = RunConfig::new(Identity::new("Ada", "ada@example.com")).with_dry_run(true);
//! let mut host = MockHost::macos();
//!
//! let report = ProvisionRunner::new(&plan, &config).run(&mut host, &mut MockUI::new());
//! assert_eq!(report.counts().skipped, plan.len());
//! assert!(host.effects().is_empty());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{Result, RigupError};
