//! Scratch root check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::VerifyResult;

/// Warns when the next run will delete an existing scratch root
pub struct WorkAreaCheck;

impl Check for WorkAreaCheck {
  fn name(&self) -> &str {
    "work-area"
  }

  fn description(&self) -> &str {
    "Scratch root location and leftovers from a previous run"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> VerifyResult<CheckResult> {
    let root = ctx.work_root;

    if root.exists() && !root.is_dir() {
      return Ok(CheckResult::error(
        self.name(),
        format!("{} exists and is not a directory", root.display()),
        Some("Remove it or set [workspace].root / --work-root to another path"),
      ));
    }

    if root.exists() {
      return Ok(CheckResult::warning(
        self.name(),
        format!("{} exists and will be deleted by the next verify run", root.display()),
        Some("Copy anything you want to keep out of it first"),
      ));
    }

    Ok(CheckResult::pass(
      self.name(),
      format!("{} will be created", root.display()),
    ))
  }
}
