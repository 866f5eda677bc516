//! The `rigup run` command (also the default).

use crate::cli::args::RunArgs;
use crate::config::{ConfigResolver, Profile, Resolution};
use crate::error::Result;
use crate::host::{Host, SystemHost};
use crate::runner::ProvisionRunner;
use crate::steps::Plan;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Resolves the configuration and provisions the machine.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }

    /// Run against `host`.
    ///
    /// Configuration errors surface as `Err` before any step runs. Once
    /// steps start, the exit code comes from the report: only a failed
    /// required step makes it non-zero.
    pub fn run_on(
        &self,
        host: &mut dyn Host,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let profile = Profile::load_or_default(self.args.profile.as_deref())?;
        let plan = Plan::standard()?;

        let resolver = ConfigResolver::new(self.args.overrides(), profile);
        let config = match resolver.resolve(ui, &*host)? {
            Resolution::Proceed(config) => config,
            Resolution::Cancelled => {
                ui.message("Cancelled; nothing was changed.");
                return Ok(CommandResult::success());
            }
        };
        tracing::debug!(?config, "Resolved configuration");

        let report = ProvisionRunner::new(&plan, &config).run(host, ui);
        if report.completed() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(report.exit_code()))
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut host = SystemHost::new();
        self.run_on(&mut host, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RigupError;
    use crate::host::MockHost;
    use crate::runner::StepOutcome;
    use crate::ui::MockUI;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(dry_run: bool) -> RunArgs {
        RunArgs {
            name: Some("Test User".into()),
            email: Some("test@example.com".into()),
            dry_run,
            non_interactive: true,
            ..Default::default()
        }
    }

    #[test]
    fn dry_run_changes_nothing() {
        let mut host = MockHost::macos();
        let mut ui = MockUI::new();
        let result = RunCommand::new(args(true)).run_on(&mut host, &mut ui).unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(host.effects().is_empty());
        let report = &ui.summaries()[0];
        assert!(report
            .records()
            .iter()
            .all(|r| matches!(r.outcome, StepOutcome::Skipped { .. })));
    }

    #[test]
    fn missing_email_fails_before_any_step() {
        let mut host = MockHost::macos();
        let mut ui = MockUI::new();
        let err = RunCommand::new(RunArgs {
            email: None,
            ..args(false)
        })
        .run_on(&mut host, &mut ui)
        .unwrap_err();

        assert!(matches!(err, RigupError::MissingIdentity { field: "email" }));
        assert!(host.effects().is_empty());
        assert!(ui.summaries().is_empty());
    }

    #[test]
    fn unsupported_os_exits_one() {
        let mut host = MockHost::linux();
        let mut ui = MockUI::new();
        let result = RunCommand::new(args(false)).run_on(&mut host, &mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(host.effects().is_empty());
    }

    #[test]
    fn missing_profile_is_error() {
        let mut ui = MockUI::new();
        let err = RunCommand::new(RunArgs {
            profile: Some("/nonexistent/rigup.yml".into()),
            ..args(true)
        })
        .run_on(&mut MockHost::macos(), &mut ui)
        .unwrap_err();
        assert!(matches!(err, RigupError::ProfileNotFound { .. }));
    }

    #[test]
    fn profile_enables_work_tools() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "work_tools: true").unwrap();

        let mut ui = MockUI::new();
        RunCommand::new(RunArgs {
            profile: Some(file.path().to_path_buf()),
            ..args(true)
        })
        .run_on(&mut MockHost::macos(), &mut ui)
        .unwrap();

        let record = ui.summaries()[0].get("work_tools").unwrap().clone();
        assert!(matches!(
            record.outcome,
            StepOutcome::Skipped { reason } if reason.starts_with("dry run:")
        ));
    }
}
