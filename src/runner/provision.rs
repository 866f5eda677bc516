//! The provisioning state machine.

use std::time::Instant;

use crate::config::RunConfig;
use crate::error::RigupError;
use crate::host::Host;
use crate::steps::{Plan, Step, StepContext};
use crate::ui::{format_duration, SpinnerHandle, UserInterface};

use super::report::{RunReport, StepOutcome, StepRecord};

/// Reason recorded for steps turned off by the configuration.
pub const DISABLED: &str = "disabled by configuration";

/// Runs every step of a [`Plan`] in order.
///
/// A failed step is recorded and the run moves on, unless the step is
/// required: then the run stops and no later step is recorded.
pub struct ProvisionRunner<'a> {
    plan: &'a Plan,
    config: &'a RunConfig,
}

impl<'a> ProvisionRunner<'a> {
    pub fn new(plan: &'a Plan, config: &'a RunConfig) -> Self {
        Self { plan, config }
    }

    /// Run the plan and return the report.
    pub fn run(&self, host: &mut dyn Host, ui: &mut dyn UserInterface) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::new(self.config);
        let total = self.plan.len();

        ui.show_header(if self.config.dry_run {
            "rigup · dry run"
        } else {
            "rigup"
        });
        tracing::info!(
            steps = total,
            dry_run = self.config.dry_run,
            work_tools = self.config.work_tools,
            "Starting provisioning run"
        );

        for (index, step) in self.plan.steps().iter().enumerate() {
            let step = step.as_ref();
            let _span = tracing::info_span!("step", step = step.name()).entered();
            ui.show_progress(index + 1, total);

            let record = self.run_step(step, host, ui);
            let failure = match &record.outcome {
                StepOutcome::Failed { reason } => Some(reason.clone()),
                _ => None,
            };
            report.push(record);

            if let Some(reason) = failure {
                if step.required() {
                    tracing::error!("Required step {} failed: {}", step.name(), reason);
                    ui.error(&format!(
                        "{} failed and is required; stopping: {}",
                        step.title(),
                        reason
                    ));
                    report.halt(step.name());
                    break;
                }
                tracing::warn!("Step {} failed, continuing: {}", step.name(), reason);
                ui.warning(&format!("{} failed: {}", step.title(), reason));
            }
        }

        report.finish(started.elapsed());
        tracing::info!(
            completed = report.completed(),
            duration = %format_duration(report.duration()),
            "Provisioning run finished"
        );
        ui.show_run_summary(&report);
        report
    }

    fn run_step(
        &self,
        step: &dyn Step,
        host: &mut dyn Host,
        ui: &mut dyn UserInterface,
    ) -> StepRecord {
        let started = Instant::now();
        let mut spinner = ui.start_spinner(step.title());

        let (outcome, attempts, note) = self.decide(step, host, ui, spinner.as_mut());
        finish_spinner(spinner.as_mut(), step, &outcome);
        tracing::debug!(outcome = %outcome, attempts, "Step finished");

        StepRecord {
            name: step.name().to_string(),
            required: step.required(),
            outcome,
            attempts,
            duration: started.elapsed(),
            note,
        }
    }

    fn decide(
        &self,
        step: &dyn Step,
        host: &mut dyn Host,
        ui: &mut dyn UserInterface,
        spinner: &mut dyn SpinnerHandle,
    ) -> (StepOutcome, u32, Option<String>) {
        let config = self.config;

        if !step.enabled(config) {
            let reason = DISABLED.to_string();
            return (StepOutcome::Skipped { reason }, 0, None);
        }

        let check = step.check(config, &*host);
        tracing::debug!(complete = check.complete, "Check: {}", check.description);
        if !check.complete && ui.output_mode().shows_details() {
            if let Some(details) = &check.details {
                ui.message(&format!("  {} ({})", check.description, details));
            }
        }

        if config.dry_run {
            let reason = if check.complete {
                format!("dry run: already satisfied ({})", check.description)
            } else {
                format!("dry run: {}", step.describe(config))
            };
            return (StepOutcome::Skipped { reason }, 0, None);
        }

        if check.complete {
            let detail = check.description;
            return (StepOutcome::SucceededNoop { detail }, 0, None);
        }

        spinner.set_message(&format!("{}: {}", step.title(), step.describe(config)));
        let mut ctx = StepContext { config, host, ui };
        match step.apply(&mut ctx) {
            Ok(applied) => (StepOutcome::Succeeded, applied.attempts, applied.note),
            Err(e) => {
                let attempts = match &e {
                    RigupError::RetriesExhausted { attempts, .. } => *attempts,
                    _ => 1,
                };
                let reason = e.to_string();
                (StepOutcome::Failed { reason }, attempts, None)
            }
        }
    }
}

fn finish_spinner(spinner: &mut dyn SpinnerHandle, step: &dyn Step, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Succeeded => spinner.finish_success(step.title()),
        StepOutcome::SucceededNoop { .. } => {
            spinner.finish_success(&format!("{} (already satisfied)", step.title()))
        }
        StepOutcome::Skipped { reason } => {
            spinner.finish_skipped(&format!("{} ({})", step.title(), reason))
        }
        StepOutcome::Failed { .. } => spinner.finish_error(step.title()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Identity;
    use crate::error::Result;
    use crate::host::MockHost;
    use crate::steps::{Applied, CheckResult};
    use crate::ui::{MockUI, SpinnerStatus};
    use std::cell::Cell;

    /// A step whose check flips once it has been applied.
    struct Toggle {
        name: &'static str,
        required: bool,
        fails: bool,
        applied: Cell<bool>,
    }

    impl Toggle {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                required: false,
                fails: false,
                applied: Cell::new(false),
            }
        }

        fn required(mut self) -> Self {
            self.required = true;
            self
        }

        fn failing(mut self) -> Self {
            self.fails = true;
            self
        }
    }

    impl Step for Toggle {
        fn name(&self) -> &'static str {
            self.name
        }
        fn title(&self) -> &'static str {
            self.name
        }
        fn required(&self) -> bool {
            self.required
        }
        fn check(&self, _: &RunConfig, _: &dyn Host) -> CheckResult {
            if self.applied.get() {
                CheckResult::complete("done before")
            } else {
                CheckResult::incomplete("not yet", "never applied")
            }
        }
        fn describe(&self, _: &RunConfig) -> String {
            format!("apply {}", self.name)
        }
        fn apply(&self, ctx: &mut StepContext<'_>) -> Result<Applied> {
            ctx.host.run("sh", &["-c", self.name], &[])?;
            if self.fails {
                return Err(RigupError::step(self.name, "boom"));
            }
            self.applied.set(true);
            Ok(Applied::once())
        }
    }

    fn config() -> RunConfig {
        RunConfig::new(Identity::new("Test User", "test@example.com"))
    }

    fn plan(steps: Vec<Toggle>) -> Plan {
        Plan::new(steps.into_iter().map(|s| Box::new(s) as Box<dyn Step>).collect()).unwrap()
    }

    #[test]
    fn second_run_is_all_noops() {
        let plan = plan(vec![Toggle::new("a"), Toggle::new("b")]);
        let config = config();
        let runner = ProvisionRunner::new(&plan, &config);
        let mut host = MockHost::macos();

        let first = runner.run(&mut host, &mut MockUI::new());
        assert_eq!(first.counts().succeeded, 2);

        let second = runner.run(&mut host, &mut MockUI::new());
        assert_eq!(second.counts().noop, 2);
        assert_eq!(host.runs().len(), 2);
    }

    #[test]
    fn best_effort_failure_continues() {
        let plan = plan(vec![Toggle::new("a").failing(), Toggle::new("b")]);
        let config = config();
        let mut ui = MockUI::new();
        let report = ProvisionRunner::new(&plan, &config).run(&mut MockHost::macos(), &mut ui);

        assert!(report.get("a").unwrap().outcome.is_failure());
        assert_eq!(report.get("b").unwrap().outcome, StepOutcome::Succeeded);
        assert!(report.completed());
        assert!(ui.has_warning("a failed"));
    }

    #[test]
    fn required_failure_halts() {
        let plan = plan(vec![
            Toggle::new("a").required().failing(),
            Toggle::new("b"),
        ]);
        let config = config();
        let mut host = MockHost::macos();
        let mut ui = MockUI::new();
        let report = ProvisionRunner::new(&plan, &config).run(&mut host, &mut ui);

        assert_eq!(report.records().len(), 1);
        assert_eq!(report.halted_by(), Some("a"));
        assert_eq!(report.exit_code(), 1);
        assert_eq!(host.runs().len(), 1);
        assert!(ui.has_error("stopping"));
    }

    #[test]
    fn dry_run_skips_everything_without_effects() {
        let done = Toggle::new("done");
        done.applied.set(true);
        let plan = plan(vec![done, Toggle::new("todo")]);
        let config = config().with_dry_run(true);
        let mut host = MockHost::macos();
        let report = ProvisionRunner::new(&plan, &config).run(&mut host, &mut MockUI::new());

        assert!(host.effects().is_empty());
        assert_eq!(
            report.get("done").unwrap().outcome,
            StepOutcome::Skipped {
                reason: "dry run: already satisfied (done before)".into()
            }
        );
        assert_eq!(
            report.get("todo").unwrap().outcome,
            StepOutcome::Skipped {
                reason: "dry run: apply todo".into()
            }
        );
    }

    #[test]
    fn reports_progress_spinners_and_summary() {
        let plan = plan(vec![Toggle::new("a"), Toggle::new("b").failing()]);
        let config = config();
        let mut ui = MockUI::new();
        ProvisionRunner::new(&plan, &config).run(&mut MockHost::macos(), &mut ui);

        assert_eq!(ui.progress(), &[(1, 2), (2, 2)]);
        assert_eq!(
            ui.spinner_finishes(),
            vec![
                (SpinnerStatus::Success, "a".to_string()),
                (SpinnerStatus::Error, "b".to_string())
            ]
        );
        assert_eq!(ui.summaries().len(), 1);
    }

    #[test]
    fn spinner_shows_what_is_applied() {
        let done = Toggle::new("done");
        done.applied.set(true);
        let plan = plan(vec![done, Toggle::new("todo")]);
        let config = config();
        let mut ui = MockUI::new();
        ProvisionRunner::new(&plan, &config).run(&mut MockHost::macos(), &mut ui);

        assert_eq!(ui.spinner_messages(), vec!["todo: apply todo".to_string()]);
    }
}
