//! Running a plan against a host.
//!
//! - [`ProvisionRunner`] - walks the plan, one step at a time
//! - [`RetryPolicy`] - bounded linear backoff for network operations
//! - [`RunReport`] - what happened, in order

pub mod followup;
pub mod provision;
pub mod report;
pub mod retry;

pub use followup::follow_ups;
pub use provision::ProvisionRunner;
pub use report::{OutcomeCounts, RunReport, StepOutcome, StepRecord};
pub use retry::RetryPolicy;
