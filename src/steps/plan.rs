//! Ordered, validated step lists.

use std::collections::HashSet;

use anyhow::anyhow;

use crate::error::{RigupError, Result};

use super::{catalogue, Step};

/// An ordered list of steps with unique names whose dependencies all
/// point backwards.
pub struct Plan {
    steps: Vec<Box<dyn Step>>,
}

impl Plan {
    /// Validate and wrap `steps`.
    pub fn new(steps: Vec<Box<dyn Step>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for step in &steps {
            for dep in step.depends_on() {
                if !seen.contains(dep) {
                    return Err(RigupError::Other(anyhow!(
                        "step '{}' depends on '{}', which is not declared before it",
                        step.name(),
                        dep
                    )));
                }
            }
            if !seen.insert(step.name()) {
                return Err(RigupError::DuplicateStep {
                    name: step.name().to_string(),
                });
            }
        }
        Ok(Self { steps })
    }

    /// The built-in macOS plan.
    pub fn standard() -> Result<Self> {
        Self::new(catalogue())
    }

    pub fn steps(&self) -> &[Box<dyn Step>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Step> {
        self.steps
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan").field("steps", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::host::Host;
    use crate::steps::{Applied, CheckResult, StepContext};

    struct Named(&'static str, &'static [&'static str]);

    impl Step for Named {
        fn name(&self) -> &'static str {
            self.0
        }
        fn title(&self) -> &'static str {
            "test"
        }
        fn depends_on(&self) -> &'static [&'static str] {
            self.1
        }
        fn check(&self, _: &RunConfig, _: &dyn Host) -> CheckResult {
            CheckResult::complete("ok")
        }
        fn describe(&self, _: &RunConfig) -> String {
            "nothing".into()
        }
        fn apply(&self, _: &mut StepContext<'_>) -> Result<Applied> {
            Ok(Applied::once())
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Plan::new(vec![Box::new(Named("a", &[])), Box::new(Named("a", &[]))])
            .unwrap_err();
        assert!(matches!(err, RigupError::DuplicateStep { name } if name == "a"));
    }

    #[test]
    fn rejects_forward_dependencies() {
        let err = Plan::new(vec![Box::new(Named("a", &["b"])), Box::new(Named("b", &[]))])
            .unwrap_err();
        assert!(err.to_string().contains("depends on 'b'"));
    }

    #[test]
    fn standard_plan_is_valid_and_ordered() {
        let plan = Plan::standard().unwrap();
        let names = plan.names();
        assert_eq!(names.first(), Some(&"macos"));
        assert_eq!(names.last(), Some(&"dock"));
        assert_eq!(plan.len(), 17);
        assert!(plan.get("macos").unwrap().required());
        assert!(plan.get("homebrew").is_some());
    }
}
