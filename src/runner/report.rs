//! Run outcomes and the final report.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::config::RunConfig;
use crate::ui::StatusKind;

use super::followup;

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step changed the machine.
    Succeeded,
    /// The wanted state already existed; nothing was done.
    SucceededNoop { detail: String },
    /// The step was not run (dry-run or disabled by configuration).
    Skipped { reason: String },
    /// The step was run and failed.
    Failed { reason: String },
}

impl StepOutcome {
    /// Whether this outcome counts as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Display status for this outcome.
    pub fn status_kind(&self) -> StatusKind {
        match self {
            Self::Succeeded => StatusKind::Success,
            Self::SucceededNoop { .. } => StatusKind::Noop,
            Self::Skipped { .. } => StatusKind::Skipped,
            Self::Failed { .. } => StatusKind::Failed,
        }
    }

    /// Short label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Succeeded => "done",
            Self::SucceededNoop { .. } => "already satisfied",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    /// Detail text carried by the outcome, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Succeeded => None,
            Self::SucceededNoop { detail } => Some(detail),
            Self::Skipped { reason } | Self::Failed { reason } => Some(reason),
        }
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail() {
            Some(detail) if !detail.is_empty() => write!(f, "{}: {}", self.label(), detail),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// Step name.
    pub name: String,
    /// Whether failure of this step halts the run.
    pub required: bool,
    /// What happened.
    pub outcome: StepOutcome,
    /// Attempts made by the action (0 when the action never ran).
    pub attempts: u32,
    /// Time spent on the step.
    pub duration: Duration,
    /// Extra information from the action (e.g. "installed 3 formulae").
    pub note: Option<String>,
}

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub succeeded: usize,
    pub noop: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    /// Total number of recorded steps.
    pub fn total(&self) -> usize {
        self.succeeded + self.noop + self.skipped + self.failed
    }
}

/// Append-only record of a provisioning run.
#[derive(Debug, Clone)]
pub struct RunReport {
    records: Vec<StepRecord>,
    halted_by: Option<String>,
    started_at: DateTime<Local>,
    duration: Duration,
    dry_run: bool,
    work_tools: bool,
}

impl RunReport {
    /// Start an empty report for a run.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            records: Vec::new(),
            halted_by: None,
            started_at: Local::now(),
            duration: Duration::ZERO,
            dry_run: config.dry_run,
            work_tools: config.work_tools,
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: StepRecord) {
        debug_assert!(
            !self.records.iter().any(|r| r.name == record.name),
            "step '{}' recorded twice",
            record.name
        );
        self.records.push(record);
    }

    /// Mark the run as stopped by a required step.
    pub fn halt(&mut self, step: &str) {
        self.halted_by = Some(step.to_string());
    }

    /// Set the total run time.
    pub fn finish(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Records in execution order.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Look up a record by step name.
    pub fn get(&self, name: &str) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// The required step that stopped the run, if any.
    pub fn halted_by(&self) -> Option<&str> {
        self.halted_by.as_deref()
    }

    /// When the run started.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Total run time.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether this was a dry run.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Per-outcome counts.
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for record in &self.records {
            match record.outcome {
                StepOutcome::Succeeded => counts.succeeded += 1,
                StepOutcome::SucceededNoop { .. } => counts.noop += 1,
                StepOutcome::Skipped { .. } => counts.skipped += 1,
                StepOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    /// Names of failed steps.
    pub fn failed_steps(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.outcome.is_failure())
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Whether the run completed without a required-step halt.
    ///
    /// Best-effort failures do not make a run unsuccessful.
    pub fn completed(&self) -> bool {
        self.halted_by.is_none()
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        if self.completed() {
            0
        } else {
            1
        }
    }

    /// Manual actions left to the operator.
    pub fn follow_ups(&self) -> Vec<&'static str> {
        followup::follow_ups(self.work_tools)
    }
}
