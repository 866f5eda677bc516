//! Idempotency check results and the probes steps build them from.

use std::path::Path;

use crate::host::Host;

/// Result of a step's idempotency check.
///
/// `description` is user-visible: it appears as the noop detail in the
/// summary and in dry-run skip reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Whether the wanted state already exists.
    pub complete: bool,

    /// What was checked.
    pub description: String,

    /// Why the check failed, if it did.
    pub details: Option<String>,
}

impl CheckResult {
    /// The wanted state exists.
    pub fn complete(description: impl Into<String>) -> Self {
        Self {
            complete: true,
            description: description.into(),
            details: None,
        }
    }

    /// The wanted state is missing.
    pub fn incomplete(description: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            complete: false,
            description: description.into(),
            details: Some(details.into()),
        }
    }
}

/// `name` resolves on the host's `PATH`.
pub fn command_on_path(host: &dyn Host, name: &str) -> CheckResult {
    if host.command_exists(name) {
        CheckResult::complete(format!("{} on PATH", name))
    } else {
        CheckResult::incomplete(format!("{} not found", name), format!("`{}` is not on PATH", name))
    }
}

/// A file or directory exists.
pub fn path_exists(host: &dyn Host, path: &Path) -> CheckResult {
    if host.path_exists(path) {
        CheckResult::complete(format!("{} exists", path.display()))
    } else {
        CheckResult::incomplete(
            format!("{} missing", path.display()),
            format!("Expected at: {}", path.display()),
        )
    }
}

/// Trimmed stdout of a probe that exited zero.
pub fn query_stdout(host: &dyn Host, program: &str, args: &[&str]) -> Option<String> {
    host.query(program, args)
        .ok()
        .filter(|r| r.success)
        .map(|r| r.stdout.trim().to_string())
}

/// A probe exits zero.
pub fn query_succeeds(host: &dyn Host, program: &str, args: &[&str]) -> bool {
    host.query(program, args).map(|r| r.success).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;

    #[test]
    fn command_on_path_reports_both_ways() {
        let host = MockHost::macos();
        assert!(command_on_path(&host, "git").complete);

        let missing = command_on_path(&host, "brew");
        assert!(!missing.complete);
        assert_eq!(missing.description, "brew not found");
        assert!(missing.details.is_some());
    }

    #[test]
    fn path_exists_checks_host_files() {
        let host = MockHost::macos().with_file("/Users/dev/.ssh/id_ed25519", "key");
        assert!(path_exists(&host, Path::new("/Users/dev/.ssh/id_ed25519")).complete);
        assert!(!path_exists(&host, Path::new("/Users/dev/.ssh/id_rsa")).complete);
    }

    #[test]
    fn query_helpers_require_success() {
        let host = MockHost::macos().with_query("xcode-select -p", "/Library/Developer/CommandLineTools\n");
        assert_eq!(
            query_stdout(&host, "xcode-select", &["-p"]).as_deref(),
            Some("/Library/Developer/CommandLineTools")
        );
        assert!(query_succeeds(&host, "xcode-select", &["-p"]));
        assert!(!query_succeeds(&host, "git", &["config", "--global", "user.name"]));
        assert!(query_stdout(&host, "brew", &["--version"]).is_none());
    }
}
