//! The machine being provisioned.
//!
//! Every step reaches the outside world through [`Host`]: processes,
//! files, downloads, `PATH`, the clipboard and sleeping. Read-only probes
//! take `&self` so idempotency checks cannot cause side effects; anything
//! that changes the machine takes `&mut self`.
//!
//! - [`SystemHost`] - the real machine
//! - [`MockHost`] - an in-memory machine that records every side effect

pub mod mock;
pub mod system;

pub use mock::{MockEffect, MockHost};
pub use system::SystemHost;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::shell::CommandResult;

/// Access to the machine being provisioned.
pub trait Host {
    /// Operating system name (`macos`, `linux`, ...).
    fn os(&self) -> String;

    /// CPU architecture (`aarch64`, `x86_64`, ...).
    fn arch(&self) -> String;

    /// The operator's home directory.
    fn home_dir(&self) -> PathBuf;

    /// Whether `name` resolves on the current `PATH`.
    fn command_exists(&self, name: &str) -> bool;

    /// Whether a file or directory exists.
    fn path_exists(&self, path: &Path) -> bool;

    /// Read a text file, `None` if it does not exist or cannot be read.
    fn read_file(&self, path: &Path) -> Option<String>;

    /// Run a read-only probe (e.g. `brew list --formula git`).
    ///
    /// Probes must not change the machine.
    fn query(&self, program: &str, args: &[&str]) -> Result<CommandResult>;

    /// Run a command that changes the machine.
    fn run(&mut self, program: &str, args: &[&str], env: &[(&str, &str)])
        -> Result<CommandResult>;

    /// Download a text resource.
    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<String>;

    /// Write a file, creating parent directories.
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()>;

    /// Append to a file, creating it if missing.
    fn append_file(&mut self, path: &Path, contents: &str) -> Result<()>;

    /// Create a directory and its parents.
    fn create_dir_all(&mut self, path: &Path) -> Result<()>;

    /// Replace the clipboard contents.
    fn set_clipboard(&mut self, text: &str) -> Result<()>;

    /// Put `dir` at the front of `PATH` for this process and its children.
    fn prepend_path(&mut self, dir: &Path);

    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Homebrew prefix for the host architecture.
pub fn brew_prefix(host: &dyn Host) -> PathBuf {
    if host.arch() == "aarch64" {
        PathBuf::from("/opt/homebrew")
    } else {
        PathBuf::from("/usr/local")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brew_prefix_follows_arch() {
        let arm = MockHost::macos();
        assert_eq!(brew_prefix(&arm), PathBuf::from("/opt/homebrew"));

        let intel = MockHost::macos().with_arch("x86_64");
        assert_eq!(brew_prefix(&intel), PathBuf::from("/usr/local"));
    }
}
