//! The `rigup steps` command.

use crate::cli::args::RunArgs;
use crate::config::{Identity, Profile, RunConfig};
use crate::error::Result;
use crate::steps::Plan;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Lists the plan in execution order.
pub struct StepsCommand {
    args: RunArgs,
}

impl StepsCommand {
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }
}

impl Command for StepsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let profile = Profile::load_or_default(self.args.profile.as_deref())?;
        let work_tools = self.args.work_tools_flag().unwrap_or(profile.work_tools);
        // Identity does not affect which steps are enabled.
        let config = RunConfig::new(Identity::new("", ""))
            .with_profile(profile)
            .with_work_tools(work_tools);
        let plan = Plan::standard()?;

        ui.show_header("Provisioning steps");
        for (i, step) in plan.steps().iter().enumerate() {
            let mut flags = Vec::new();
            if step.required() {
                flags.push("required".to_string());
            }
            if !step.enabled(&config) {
                flags.push("disabled".to_string());
            }
            if !step.depends_on().is_empty() {
                flags.push(format!("after {}", step.depends_on().join(", ")));
            }
            ui.message(&format!(
                "{:>3}. {:<18} {:<28} {}",
                i + 1,
                step.name(),
                step.title(),
                flags.join("; ")
            ));
        }
        Ok(CommandResult::success())
    }
}
