//! Delimited blocks appended to operator-owned files.
//!
//! The opening marker is what makes the append idempotent: once a file
//! contains it, the block is never written again.

use std::path::Path;

use crate::error::Result;
use crate::host::Host;

pub const BEGIN: &str = "# >>> rigup >>>";
pub const END: &str = "# <<< rigup <<<";

/// A block of lines wrapped in rigup markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerBlock {
    body: String,
}

impl MarkerBlock {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Whether `path` already contains a rigup block.
    pub fn is_present(host: &dyn Host, path: &Path) -> bool {
        host.read_file(path)
            .map(|content| content.lines().any(|l| l.trim() == BEGIN))
            .unwrap_or(false)
    }

    /// The block as appended, with a separating blank line.
    pub fn render(&self) -> String {
        format!("\n{}\n{}\n{}\n", BEGIN, self.body.trim_end(), END)
    }

    /// Append the block unless one is already there. Returns whether it wrote.
    pub fn append_once(&self, host: &mut dyn Host, path: &Path) -> Result<bool> {
        if Self::is_present(&*host, path) {
            return Ok(false);
        }
        host.append_file(path, &self.render())?;
        Ok(true)
    }
}
