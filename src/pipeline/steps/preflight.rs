//! Required executables, checked before anything touches the network

use crate::checks::{Check, CheckContext, tool_checks};
use crate::core::config::VerifyConfig;
use crate::core::error::VerifyResult;
use crate::core::work_area::WorkArea;
use crate::pipeline::outcome::StageOutcome;
use crate::process::CommandRunner;
use crate::ui::Console;

/// Check every tool and fail with the first missing one.
///
/// All tools are reported before failing so the operator can install
/// everything in one go.
pub fn run(
  config: &VerifyConfig,
  area: &WorkArea,
  runner: &dyn CommandRunner,
  console: &mut Console<'_>,
) -> VerifyResult<StageOutcome> {
  let ctx = CheckContext {
    runner,
    work_root: area.root(),
  };

  let checks = tool_checks(&config.tools);
  let mut first_missing = None;

  for check in &checks {
    console.say(format!("checking if {} is installed", check.program()))?;
    let result = check.run(&ctx)?;
    if result.passed {
      console.success(&result.message)?;
    } else {
      console.failure(&result.message)?;
      if let Some(suggestion) = &result.suggestion {
        console.hint(suggestion)?;
      }
      first_missing.get_or_insert(check);
    }
  }

  if let Some(check) = first_missing {
    return Err(check.missing_error());
  }

  Ok(StageOutcome::pass(format!("all {} required tools are installed", checks.len())))
}
