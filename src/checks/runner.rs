//! Check runner for executing environment checks

use super::tools::{ToolCheck, ToolRole};
use super::trait_def::{Check, CheckContext, CheckResult};
use super::work_area::WorkAreaCheck;
use crate::core::config::ToolsConfig;
use crate::core::error::VerifyResult;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Box<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  pub fn run_all(&self, ctx: &CheckContext<'_>) -> VerifyResult<Vec<CheckResult>> {
    let mut results = Vec::new();

    for check in &self.checks {
      tracing::debug!(check = check.name(), "{}", check.description());
      match check.run(ctx) {
        Ok(result) => results.push(result),
        Err(err) => {
          // If a check itself fails to run, create an error result
          results.push(CheckResult::error(
            check.name(),
            format!("Check failed to run: {}", err),
            Some("Re-run with --verbose for details"),
          ));
        }
      }
    }

    Ok(results)
  }

}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// One check per required executable, in preflight order
pub fn tool_checks(tools: &ToolsConfig) -> Vec<ToolCheck> {
  ToolRole::ALL
    .into_iter()
    .map(|role| ToolCheck::new(role, tools))
    .collect()
}

/// Create a runner with all built-in checks
pub fn create_default_runner(tools: &ToolsConfig) -> CheckRunner {
  let mut runner = CheckRunner::new();

  for check in tool_checks(tools) {
    runner.add_check(Box::new(check));
  }
  runner.add_check(Box::new(WorkAreaCheck));

  runner
}
