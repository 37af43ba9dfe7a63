//! CLI commands for couchdb-release-check
//!
//! - **verify**: Download, verify, rebuild and test a release candidate
//! - **plan**: Print every command a verify run would execute, without running any
//! - **doctor**: Check that the required executables are installed

pub mod doctor;
pub mod plan;
pub mod verify;

pub use doctor::run_doctor;
pub use plan::run_plan;
pub use verify::{VerifyArgs, run_verify};

use crate::core::config::VerifyConfig;
use crate::core::error::{ResultExt, VerifyResult};
use std::env;
use std::path::Path;

/// Explicit `--config`, else the first config file found in the current directory
fn load_config(explicit: Option<&Path>) -> VerifyResult<VerifyConfig> {
  let current_dir = env::current_dir().context("Failed to determine the current directory")?;
  let config = VerifyConfig::resolve(explicit, &current_dir)?;
  tracing::debug!(?config, "configuration loaded");
  Ok(config)
}
