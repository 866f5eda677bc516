//! The real machine.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{RigupError, Result};
use crate::shell::{execute_program, os_name, CommandOptions, CommandResult};

use super::Host;

/// [`Host`] backed by the local machine.
///
/// Keeps its own copy of `PATH` so directories added by earlier steps
/// (Homebrew, pyenv shims, `~/.local/bin`) are visible to later ones.
#[derive(Debug)]
pub struct SystemHost {
    path: Vec<PathBuf>,
    home: PathBuf,
}

impl SystemHost {
    /// Create a host from the current process environment.
    pub fn new() -> Self {
        let path = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self { path, home }
    }

    /// The `PATH` value passed to child processes.
    pub fn path_var(&self) -> OsString {
        std::env::join_paths(&self.path).unwrap_or_default()
    }

    fn resolve(&self, program: &str) -> Result<PathBuf> {
        if program.contains('/') {
            return Ok(PathBuf::from(program));
        }
        let cwd = std::env::current_dir().unwrap_or_else(|_| self.home.clone());
        which::which_in(program, Some(self.path_var()), cwd).map_err(|_| {
            RigupError::CommandFailed {
                command: program.to_string(),
                code: None,
            }
        })
    }

    fn options(&self, env: &[(&str, &str)]) -> CommandOptions {
        let mut options = CommandOptions::captured();
        options.env.insert(
            "PATH".to_string(),
            self.path_var().to_string_lossy().to_string(),
        );
        for (key, value) in env {
            options.env.insert(key.to_string(), value.to_string());
        }
        options
    }

    fn exec(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandResult> {
        let resolved = self.resolve(program)?;
        let resolved = resolved.to_string_lossy();
        execute_program(&resolved, args, &self.options(env))
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SystemHost {
    fn os(&self) -> String {
        os_name().to_string()
    }

    fn arch(&self) -> String {
        std::env::consts::ARCH.to_string()
    }

    fn home_dir(&self) -> PathBuf {
        self.home.clone()
    }

    fn command_exists(&self, name: &str) -> bool {
        self.resolve(name).map(|p| p.exists()).unwrap_or(false)
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }

    fn query(&self, program: &str, args: &[&str]) -> Result<CommandResult> {
        self.exec(program, args, &[])
    }

    fn run(
        &mut self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<CommandResult> {
        let result = self.exec(program, args, env)?;
        if !result.stdout.is_empty() {
            tracing::debug!("{} stdout:\n{}", program, result.stdout);
        }
        if !result.stderr.is_empty() {
            tracing::debug!("{} stderr:\n{}", program, result.stderr);
        }
        Ok(result)
    }

    fn fetch(&mut self, url: &str, timeout: Duration) -> Result<String> {
        let network = |message: String| RigupError::Network {
            url: url.to_string(),
            message,
        };

        let client = Client::builder()
            .user_agent(concat!("rigup/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| network(e.to_string()))?;

        let response = client.get(url).send().map_err(|e| network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(network(format!("HTTP {}", response.status())));
        }
        response.text().map_err(|e| network(e.to_string()))
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn append_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn set_clipboard(&mut self, text: &str) -> Result<()> {
        let mut child = Command::new("pbcopy")
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|_| RigupError::CommandFailed {
                command: "pbcopy".to_string(),
                code: None,
            })?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if !status.success() {
            return Err(RigupError::CommandFailed {
                command: "pbcopy".to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn prepend_path(&mut self, dir: &Path) {
        if self.path.first().map(|p| p.as_path()) == Some(dir) {
            return;
        }
        self.path.retain(|p| p != dir);
        self.path.insert(0, dir.to_path_buf());
        tracing::debug!("PATH now starts with {}", dir.display());
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn prepend_path_moves_dir_to_front_once() {
        let mut host = SystemHost::new();
        let dir = PathBuf::from("/opt/rigup-test/bin");
        host.prepend_path(&dir);
        host.prepend_path(&dir);

        let count = host.path.iter().filter(|p| **p == dir).count();
        assert_eq!(count, 1);
        assert_eq!(host.path[0], dir);
    }

    #[test]
    fn command_exists_finds_sh() {
        let host = SystemHost::new();
        assert!(host.command_exists("sh"));
        assert!(!host.command_exists("definitely-not-a-real-command-rigup"));
    }

    #[test]
    fn query_unknown_program_is_error() {
        let host = SystemHost::new();
        let result = host.query("definitely-not-a-real-command-rigup", &[]);
        assert!(matches!(result, Err(RigupError::CommandFailed { .. })));
    }

    #[test]
    fn run_passes_extra_env() {
        let mut host = SystemHost::new();
        let result = host
            .run("sh", &["-c", "echo $RIGUP_TEST_VAR"], &[("RIGUP_TEST_VAR", "hi")])
            .unwrap();
        assert!(result.stdout.contains("hi"));
    }

    #[test]
    fn write_and_append_create_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/file.txt");
        let mut host = SystemHost::new();

        host.write_file(&path, "one\n").unwrap();
        host.append_file(&path, "two\n").unwrap();

        assert_eq!(host.read_file(&path).unwrap(), "one\ntwo\n");
        assert!(host.path_exists(&path));
    }

    #[test]
    fn append_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new/.zshrc");
        let mut host = SystemHost::new();

        host.append_file(&path, "x").unwrap();
        assert_eq!(host.read_file(&path).unwrap(), "x");
    }
}
