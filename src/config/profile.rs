//! Provisioning profiles.
//!
//! A profile is the data half of a run: which packages, extensions and
//! Dock entries to install. The built-in profile is [`Profile::default`];
//! a YAML file passed with `--profile` replaces any field it sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{RigupError, Result};

/// Recommended Python version installed through pyenv.
pub const DEFAULT_PYTHON_VERSION: &str = "3.12.7";

/// Package lists and editor settings for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// Python version installed when no flag or prompt answer overrides it.
    pub python_version: String,

    /// Whether work tools are installed by default.
    pub work_tools: bool,

    /// Homebrew formulae.
    pub formulae: Vec<String>,

    /// Homebrew casks installed on every machine.
    pub casks: Vec<String>,

    /// Homebrew casks installed only with `--work-tools`.
    pub work_casks: Vec<String>,

    /// VS Code extension identifiers.
    pub vscode_extensions: Vec<String>,

    /// VS Code user settings merged into `settings.json`.
    pub vscode_settings: BTreeMap<String, serde_json::Value>,

    /// Application bundles pinned to the Dock, in order.
    pub dock_apps: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();

        let vscode_settings = [
            ("editor.formatOnSave", serde_json::json!(true)),
            ("editor.rulers", serde_json::json!([88])),
            ("files.trimTrailingWhitespace", serde_json::json!(true)),
            ("files.insertFinalNewline", serde_json::json!(true)),
            (
                "python.defaultInterpreterPath",
                serde_json::json!("~/.pyenv/shims/python"),
            ),
            ("terminal.integrated.defaultProfile.osx", serde_json::json!("zsh")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            work_tools: false,
            formulae: strings(&[
                "git", "gh", "jq", "wget", "tree", "node", "pyenv", "dockutil",
            ]),
            casks: strings(&["visual-studio-code", "iterm2", "rectangle", "docker"]),
            work_casks: strings(&["slack", "zoom", "1password"]),
            vscode_extensions: strings(&[
                "ms-python.python",
                "ms-python.vscode-pylance",
                "charliermarsh.ruff",
                "eamodio.gitlens",
                "editorconfig.editorconfig",
            ]),
            vscode_settings,
            dock_apps: strings(&[
                "/Applications/iTerm.app",
                "/Applications/Visual Studio Code.app",
                "/Applications/Safari.app",
            ]),
        }
    }
}

impl Profile {
    /// Load a profile from a YAML file.
    ///
    /// Missing fields fall back to the built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RigupError::ProfileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| RigupError::ProfileParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse a profile from YAML text.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load from `path` if given, else the built-in profile.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_profile_uses_recommended_python() {
        let profile = Profile::default();
        assert_eq!(profile.python_version, DEFAULT_PYTHON_VERSION);
        assert!(!profile.work_tools);
        assert!(profile.formulae.contains(&"pyenv".to_string()));
        assert!(profile.formulae.contains(&"dockutil".to_string()));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let profile = Profile::parse("formulae: [ripgrep]\nwork_tools: true\n").unwrap();
        assert_eq!(profile.formulae, vec!["ripgrep".to_string()]);
        assert!(profile.work_tools);
        assert_eq!(profile.casks, Profile::default().casks);
    }

    #[test]
    fn yaml_settings_become_json_values() {
        let yaml = r#"
vscode_settings:
  editor.tabSize: 2
  workbench.colorTheme: "Solarized Dark"
"#;
        let profile = Profile::parse(yaml).unwrap();
        assert_eq!(
            profile.vscode_settings["editor.tabSize"],
            serde_json::json!(2)
        );
        assert_eq!(profile.vscode_settings.len(), 2);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(Profile::parse("brews: [git]\n").is_err());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Profile::parse("\n").unwrap(), Profile::default());
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = Profile::load(&temp.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, RigupError::ProfileNotFound { .. }));
    }

    #[test]
    fn load_invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "formulae: [unclosed").unwrap();

        let err = Profile::load(&path).unwrap_err();
        assert!(matches!(err, RigupError::ProfileParse { .. }));
        assert!(err.to_string().contains("bad.yml"));
    }

    #[test]
    fn load_or_default_without_path() {
        assert_eq!(Profile::load_or_default(None).unwrap(), Profile::default());
    }
}
