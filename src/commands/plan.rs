//! `couchdb-release-check plan` - show what a verify run would execute

use crate::core::error::VerifyResult;
use crate::core::work_area::WorkArea;
use crate::pipeline::{ExecutionPlan, RunContext};
use crate::release::ReleaseIdentity;
use std::path::Path;

/// Run the plan command
pub fn run_plan(config_path: Option<&Path>, version: &str, candidate: &str, json: bool) -> VerifyResult<()> {
  let config = super::load_config(config_path)?;
  let area = WorkArea::new(&config.workspace.root);
  let identity = ReleaseIdentity::new(version, candidate, &config.release.artifact_prefix);
  let plan = ExecutionPlan::build(&RunContext::new(&config, &area, identity));

  if json {
    println!("{}", plan.to_json()?);
  } else {
    print!("{}", plan.to_human_readable());
  }

  Ok(())
}
