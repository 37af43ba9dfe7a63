//! `couchdb-release-check doctor` - check the environment without running anything

use crate::checks::{Check, CheckContext, CheckResult, Severity, create_default_runner, tool_checks};
use crate::core::config::VerifyConfig;
use crate::core::error::{VerifyError, VerifyResult};
use crate::core::work_area::WorkArea;
use crate::process::{CommandRunner, SystemRunner};
use std::path::Path;

/// Run the doctor command
pub fn run_doctor(config_path: Option<&Path>, json: bool) -> VerifyResult<()> {
  let config = super::load_config(config_path)?;
  let results = diagnose(&config, &SystemRunner)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else {
    display_results(&results);
  }

  verdict(&config, &results)
}

/// Run every built-in check against `runner`
pub fn diagnose(config: &VerifyConfig, runner: &dyn CommandRunner) -> VerifyResult<Vec<CheckResult>> {
  let area = WorkArea::new(&config.workspace.root);
  let ctx = CheckContext {
    runner,
    work_root: area.root(),
  };
  create_default_runner(&config.tools).run_all(&ctx)
}

fn display_results(results: &[CheckResult]) {
  println!("🩺 Checking the release testing environment");
  println!("════════════════════════════════════════");
  println!();

  for result in results {
    let marker = match (result.passed, result.severity) {
      (true, _) => "✅",
      (false, Severity::Error) => "❌",
      (false, _) => "⚠️ ",
    };
    println!("{} {}", marker, result.message);
    if let Some(suggestion) = &result.suggestion {
      for line in suggestion.lines() {
        println!("   💡 {}", line);
      }
    }
  }

  let passed = results.iter().filter(|r| r.passed).count();
  println!();
  println!("{} of {} checks passed", passed, results.len());
}

/// A missing tool wins over any other blocking result so the exit code says so
fn verdict(config: &VerifyConfig, results: &[CheckResult]) -> VerifyResult<()> {
  let blocking: Vec<&CheckResult> = results.iter().filter(|r| r.is_blocking()).collect();
  if blocking.is_empty() {
    return Ok(());
  }

  if let Some(tool) = tool_checks(&config.tools)
    .into_iter()
    .find(|check| blocking.iter().any(|r| r.check_name == check.name()))
  {
    return Err(tool.missing_error());
  }

  Err(VerifyError::message(format!(
    "{} blocking issue(s) found: {}",
    blocking.len(),
    blocking
      .iter()
      .map(|r| r.check_name.as_str())
      .collect::<Vec<_>>()
      .join(", ")
  )))
}
