//! Manual follow-up actions.
//!
//! Some setup cannot be automated (preference panes, application
//! sign-ins). The list is static text keyed only on which optional tool
//! sets were enabled, never on step outcomes.

const ALWAYS: &[&str] = &[
    "Open a new terminal (or run `exec zsh`) to load the updated shell profile",
    "Add the SSH public key on your clipboard to GitHub: https://github.com/settings/keys",
    "Grant your terminal Full Disk Access in System Settings > Privacy & Security",
    "Sign in to VS Code Settings Sync",
    "Start Docker Desktop once and accept its license agreement",
    "Run `claude` once to sign in to the Claude Code CLI",
    "Sign in to the App Store and iCloud if you skipped them during macOS setup",
];

const WORK_TOOLS: &[&str] = &[
    "Sign in to Slack and join your team workspaces",
    "Sign in to Zoom and allow Screen Recording in System Settings > Privacy & Security",
    "Sign in to 1Password and enable the browser extension",
];

/// Follow-up actions for a run.
pub fn follow_ups(work_tools: bool) -> Vec<&'static str> {
    let mut items = ALWAYS.to_vec();
    if work_tools {
        items.extend_from_slice(WORK_TOOLS);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_tools_add_sign_ins() {
        let base = follow_ups(false);
        let with_work = follow_ups(true);
        assert_eq!(with_work.len(), base.len() + WORK_TOOLS.len());
        assert!(with_work.iter().any(|s| s.contains("Slack")));
        assert!(!base.iter().any(|s| s.contains("Slack")));
    }

    #[test]
    fn base_list_mentions_ssh_key() {
        assert!(follow_ups(false).iter().any(|s| s.contains("SSH")));
    }
}
