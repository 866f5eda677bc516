//! In-memory host for testing.
//!
//! `MockHost` implements [`Host`] without touching the real machine. It
//! records every side effect so tests can assert on them, and it can be
//! taught how the world changes when a command runs.
//!
//! # Example
//!
//! ```
//! use rigup::host::{Host, MockEffect, MockHost};
//!
//! let mut host = MockHost::macos()
//!     .with_command("npm")
//!     .simulate("npm install -g", vec![MockEffect::AddCommand("claude".into())]);
//!
//! assert!(!host.command_exists("claude"));
//! host.run("npm", &["install", "-g", "@anthropic-ai/claude-code"], &[]).unwrap();
//! assert!(host.command_exists("claude"));
//! assert_eq!(host.effects().len(), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RigupError, Result};
use crate::shell::CommandResult;

use super::Host;

/// A change to the mock world triggered by a successful `run`.
#[derive(Debug, Clone, PartialEq)]
pub enum MockEffect {
    /// Make a command resolvable.
    AddCommand(String),
    /// Create or replace a file.
    WriteFile(PathBuf, String),
    /// Make a probe succeed with the given stdout.
    SetQuery { command: String, stdout: String },
    /// Make a probe succeed and append a line to its stdout.
    AppendQueryLine { command: String, line: String },
}

/// Mock [`Host`] implementation for testing.
#[derive(Debug, Default, Clone)]
pub struct MockHost {
    os: String,
    arch: String,
    home: PathBuf,
    commands: BTreeSet<String>,
    path: Vec<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    queries: HashMap<String, CommandResult>,
    scripted_runs: Vec<(String, VecDeque<CommandResult>)>,
    rules: Vec<(String, Vec<MockEffect>)>,
    fetch_results: VecDeque<std::result::Result<String, String>>,
    effects: Vec<String>,
    runs: Vec<String>,
    fetches: Vec<String>,
    sleeps: Vec<Duration>,
    clipboard: Option<String>,
}

/// Join a program and its arguments the way rules and probes are keyed.
pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn ok(stdout: impl Into<String>) -> CommandResult {
    CommandResult::success(stdout.into(), String::new(), Duration::ZERO)
}

impl MockHost {
    /// An Apple Silicon Mac with the commands every macOS install ships.
    pub fn macos() -> Self {
        let mut host = Self {
            os: "macos".to_string(),
            arch: "aarch64".to_string(),
            home: PathBuf::from("/Users/dev"),
            path: vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")],
            ..Default::default()
        };
        for cmd in [
            "sh",
            "bash",
            "zsh",
            "git",
            "xcode-select",
            "ssh-keygen",
            "killall",
            "python3",
        ] {
            host.commands.insert(cmd.to_string());
        }
        host
    }

    /// A Linux machine (unsupported).
    pub fn linux() -> Self {
        Self {
            os: "linux".to_string(),
            home: PathBuf::from("/home/dev"),
            ..Self::macos()
        }
        .with_arch("x86_64")
    }

    /// Override the architecture.
    pub fn with_arch(mut self, arch: &str) -> Self {
        self.arch = arch.to_string();
        self
    }

    /// Make a command resolvable on `PATH`.
    pub fn with_command(mut self, name: &str) -> Self {
        self.commands.insert(name.to_string());
        self
    }

    /// Create a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    /// Make a probe succeed with `stdout`.
    pub fn with_query(mut self, command: &str, stdout: &str) -> Self {
        self.queries.insert(command.to_string(), ok(stdout));
        self
    }

    /// Apply `effects` whenever a successful `run` starts with `prefix`.
    pub fn simulate(mut self, prefix: &str, effects: Vec<MockEffect>) -> Self {
        self.rules.push((prefix.to_string(), effects));
        self
    }

    /// Make the next `times` runs starting with `prefix` exit non-zero.
    pub fn fail_run(mut self, prefix: &str, times: usize, stderr: &str) -> Self {
        let failures = (0..times)
            .map(|_| CommandResult::failure(Some(1), String::new(), stderr.to_string(), Duration::ZERO))
            .collect();
        self.scripted_runs.push((prefix.to_string(), failures));
        self
    }

    /// Queue the outcome of the next `fetch`.
    pub fn queue_fetch(mut self, result: std::result::Result<&str, &str>) -> Self {
        self.fetch_results
            .push_back(result.map(String::from).map_err(String::from));
        self
    }

    /// All side effects, in order.
    pub fn effects(&self) -> &[String] {
        &self.effects
    }

    /// Command lines passed to `run`, in order.
    pub fn runs(&self) -> &[String] {
        &self.runs
    }

    /// Number of runs whose command line starts with `prefix`.
    pub fn run_count(&self, prefix: &str) -> usize {
        self.runs.iter().filter(|r| r.starts_with(prefix)).count()
    }

    /// URLs passed to `fetch`, in order.
    pub fn fetches(&self) -> &[String] {
        &self.fetches
    }

    /// Durations passed to `sleep`.
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    /// Current clipboard contents.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Current `PATH` entries.
    pub fn path(&self) -> &[PathBuf] {
        &self.path
    }

    fn apply_effect(&mut self, effect: &MockEffect) {
        match effect {
            MockEffect::AddCommand(name) => {
                self.commands.insert(name.clone());
            }
            MockEffect::WriteFile(path, contents) => {
                self.files.insert(path.clone(), contents.clone());
            }
            MockEffect::SetQuery { command, stdout } => {
                self.queries.insert(command.clone(), ok(stdout.clone()));
            }
            MockEffect::AppendQueryLine { command, line } => {
                let entry = self
                    .queries
                    .entry(command.clone())
                    .or_insert_with(|| ok(""));
                entry.success = true;
                entry.exit_code = Some(0);
                entry.stdout.push_str(line);
                entry.stdout.push('\n');
            }
        }
    }

    fn require_command(&self, program: &str) -> Result<()> {
        if program.contains('/') || self.command_exists(program) {
            Ok(())
        } else {
            Err(RigupError::CommandFailed {
                command: program.to_string(),
                code: None,
            })
        }
    }
}

impl Host for MockHost {
    fn os(&self) -> String {
        self.os.clone()
    }

    fn arch(&self) -> String {
        self.arch.clone()
    }

    fn home_dir(&self) -> PathBuf {
        self.home.clone()
    }

    fn command_exists(&self, name: &str) -> bool {
        self.commands.contains(name)
            || self
                .path
                .iter()
                .any(|dir| self.files.contains_key(&dir.join(name)))
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.dirs.iter().any(|d| d.starts_with(path))
            || self.files.keys().any(|f| f.starts_with(path))
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn query(&self, program: &str, args: &[&str]) -> Result<CommandResult> {
        self.require_command(program)?;
        let key = command_line(program, args);
        Ok(self.queries.get(&key).cloned().unwrap_or_else(|| {
            CommandResult::failure(Some(1), String::new(), String::new(), Duration::ZERO)
        }))
    }

    fn run(
        &mut self,
        program: &str,
        args: &[&str],
        _env: &[(&str, &str)],
    ) -> Result<CommandResult> {
        self.require_command(program)?;
        let line = command_line(program, args);
        self.runs.push(line.clone());
        self.effects.push(format!("run: {}", line));

        let scripted = self
            .scripted_runs
            .iter_mut()
            .find(|(prefix, queue)| line.starts_with(prefix.as_str()) && !queue.is_empty())
            .and_then(|(_, queue)| queue.pop_front());
        if let Some(result) = scripted {
            return Ok(result);
        }

        let effects: Vec<MockEffect> = self
            .rules
            .iter()
            .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
            .flat_map(|(_, effects)| effects.clone())
            .collect();
        for effect in &effects {
            self.apply_effect(effect);
        }

        Ok(ok(""))
    }

    fn fetch(&mut self, url: &str, _timeout: Duration) -> Result<String> {
        self.fetches.push(url.to_string());
        self.effects.push(format!("fetch: {}", url));
        match self.fetch_results.pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(RigupError::Network {
                url: url.to_string(),
                message,
            }),
            None => Ok("#!/bin/sh\necho installing\n".to_string()),
        }
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.effects.push(format!("write: {}", path.display()));
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn append_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.effects.push(format!("append: {}", path.display()));
        self.files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(contents);
        Ok(())
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        self.effects.push(format!("mkdir: {}", path.display()));
        self.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn set_clipboard(&mut self, text: &str) -> Result<()> {
        self.effects.push("clipboard".to_string());
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    fn prepend_path(&mut self, dir: &Path) {
        self.effects.push(format!("path: {}", dir.display()));
        self.path.retain(|p| p != dir);
        self.path.insert(0, dir.to_path_buf());
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}
