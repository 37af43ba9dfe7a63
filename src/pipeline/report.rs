//! JSON record of a verification run
//!
//! Written to `<root>/verification-report.json` after every run that got as
//! far as resetting the work area, so the operator has the stage outcomes and
//! the tarball fingerprint at hand when casting a vote.

use super::context::RunContext;
use super::outcome::StageOutcome;
use super::stage::{GatePolicy, Stage};
use crate::core::error::{ResultExt, VerifyError, VerifyResult};
use crate::release::InstallPaths;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// How a stage ended, after its gate policy was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
  Passed,
  /// Gating stage failed; the run stopped here
  Failed,
  /// Reporting stage failed; the run went on
  Warned,
  /// The stage itself could not run (spawn or I/O failure)
  Errored,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
  pub stage: Stage,
  pub policy: GatePolicy,
  pub status: StageStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exit_code: Option<i32>,
  pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
  pub version: String,
  pub candidate: String,
  pub artifact: String,
  pub url: String,
  pub source_dir: PathBuf,
  pub install: InstallPaths,
}

impl ReleaseSummary {
  pub fn from_context(ctx: &RunContext<'_>) -> Self {
    Self {
      version: ctx.identity.version.clone(),
      candidate: ctx.identity.candidate.clone(),
      artifact: ctx.identity.artifact_filename(),
      url: ctx.identity.artifact_url(&ctx.config.release.base_url),
      source_dir: ctx.source_dir(),
      install: ctx.install_paths(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorSummary {
  pub message: String,
  pub exit_code: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub help: Option<String>,
}

impl From<&VerifyError> for ErrorSummary {
  fn from(error: &VerifyError) -> Self {
    Self {
      message: error.to_string(),
      exit_code: error.exit_code().as_i32(),
      help: error.help_message(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub tool_version: String,
  pub started_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub finished_at: Option<DateTime<Utc>>,
  pub work_root: PathBuf,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub release: Option<ReleaseSummary>,
  pub stages: Vec<StageRecord>,
  /// SHA-256 of the downloaded tarball, computed in-process
  #[serde(skip_serializing_if = "Option::is_none")]
  pub artifact_sha256: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<ErrorSummary>,
}

impl RunReport {
  pub fn start(work_root: &Path) -> Self {
    Self {
      tool_version: env!("CARGO_PKG_VERSION").to_string(),
      started_at: Utc::now(),
      finished_at: None,
      work_root: work_root.to_path_buf(),
      release: None,
      stages: Vec::new(),
      artifact_sha256: None,
      error: None,
    }
  }

  pub fn record(&mut self, stage: Stage, policy: GatePolicy, outcome: &StageOutcome) {
    let status = match (outcome.passed, policy) {
      (true, _) => StageStatus::Passed,
      (false, GatePolicy::Gating) => StageStatus::Failed,
      (false, GatePolicy::Reporting) => StageStatus::Warned,
    };
    self.stages.push(StageRecord {
      stage,
      policy,
      status,
      exit_code: outcome.code,
      message: outcome.message.clone(),
    });
  }

  /// A stage that returned an error instead of an outcome
  pub fn record_error(&mut self, stage: Stage, policy: GatePolicy, error: &VerifyError) {
    self.stages.push(StageRecord {
      stage,
      policy,
      status: StageStatus::Errored,
      exit_code: None,
      message: error.to_string(),
    });
  }

  #[cfg(test)]
  pub fn status_of(&self, stage: Stage) -> Option<StageStatus> {
    self.stages.iter().find(|r| r.stage == stage).map(|r| r.status)
  }

  /// Stamp the end time and the terminal error, if any
  pub fn finish(&mut self, error: Option<&VerifyError>) {
    self.finished_at = Some(Utc::now());
    self.error = error.map(ErrorSummary::from);
  }

  pub fn to_json(&self) -> VerifyResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn write(&self, path: &Path) -> VerifyResult<()> {
    let json = self.to_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write run report to {}", path.display()))
  }
}
