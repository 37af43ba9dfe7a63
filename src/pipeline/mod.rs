//! Release verification pipeline
//!
//! Runs the fifteen stages in order against a single work area:
//!
//! ```text
//! preflight → identity → reset-work-area → download → import-keys → signature
//!   → checksum → clone → export-tree → unpack → diff → configure → test
//!   → package → completion
//! ```
//!
//! Every stage yields a [`StageOutcome`]. What a failed outcome means is the
//! stage's [`GatePolicy`]: gating failures end the run with a [`GateError`],
//! reporting failures are shown to the operator and recorded, and the run
//! goes on. Partial state is left on disk either way.

pub mod context;
pub mod outcome;
pub mod plan;
pub mod report;
pub mod stage;
pub mod steps;

pub use context::RunContext;
pub use outcome::StageOutcome;
pub use plan::ExecutionPlan;
pub use report::{ReleaseSummary, RunReport};
pub use stage::{GatePolicy, Stage};

use crate::core::config::VerifyConfig;
use crate::core::error::{GateError, VerifyError, VerifyResult};
use crate::core::work_area::WorkArea;
use crate::process::CommandRunner;
use crate::ui::Console;
use std::io::BufRead;
use steps::identity::IdentityRequest;
use steps::{build, checksum, completion, download, identity, preflight, signature, tree};

/// System packages the build stages need
pub const REQUIRED_PACKAGES: &str =
  "autoconf autoconf-archive automake libtool erlang icu4c spidermonkey curl pkg-config";

pub const TESTING_GUIDE_URL: &str = "https://cwiki.apache.org/confluence/display/COUCHDB/Testing+a+Source+Release";

/// Result of a run: the report is produced even when the run fails
pub struct RunOutcome {
  pub report: RunReport,
  pub error: Option<VerifyError>,
}

impl RunOutcome {
  pub fn into_result(self) -> VerifyResult<RunReport> {
    match self.error {
      Some(error) => Err(error),
      None => Ok(self.report),
    }
  }
}

pub struct Pipeline<'a> {
  config: &'a VerifyConfig,
  runner: &'a dyn CommandRunner,
  console: Console<'a>,
  input: Box<dyn BufRead + 'a>,
  area: WorkArea,
  write_report: bool,
}

impl<'a> Pipeline<'a> {
  pub fn new(
    config: &'a VerifyConfig,
    runner: &'a dyn CommandRunner,
    console: Console<'a>,
    input: Box<dyn BufRead + 'a>,
  ) -> Self {
    Self {
      config,
      runner,
      console,
      input,
      area: WorkArea::new(&config.workspace.root),
      write_report: true,
    }
  }

  /// Skip writing `verification-report.json`
  pub fn without_report(mut self) -> Self {
    self.write_report = false;
    self
  }

  pub fn run(mut self, request: &IdentityRequest) -> RunOutcome {
    let mut report = RunReport::start(self.area.root());
    let mut reset = false;

    let error = self.execute(request, &mut report, &mut reset).err();
    report.finish(error.as_ref());

    // Nothing to write into until the work area exists
    if reset && self.write_report {
      let path = self.area.report_path();
      match report.write(&path) {
        Ok(()) => {
          tracing::info!(path = %path.display(), "run report written");
          let _ = self.console.say(format!("run report written to {}", path.display()));
        }
        Err(e) => tracing::warn!(error = %e, "failed to write run report"),
      }
    }

    RunOutcome { report, error }
  }

  fn execute(&mut self, request: &IdentityRequest, report: &mut RunReport, reset: &mut bool) -> VerifyResult<()> {
    let config = self.config;
    let runner = self.runner;

    self.intro()?;

    self.begin(Stage::Preflight)?;
    let outcome = preflight::run(config, &self.area, runner, &mut self.console);
    self.settle(report, Stage::Preflight, outcome)?;

    self.begin(Stage::Identity)?;
    let resolved = identity::resolve(
      request,
      &config.release.artifact_prefix,
      &config.release.base_url,
      &mut self.console,
      &mut *self.input,
    );
    let release = match resolved {
      Ok(release) => release,
      Err(e) => return self.settle(report, Stage::Identity, Err(e)),
    };
    self.settle(report, Stage::Identity, Ok(StageOutcome::pass(release.artifact_filename())))?;

    self.begin(Stage::ResetWorkArea)?;
    let outcome = download::reset(&self.area, &mut self.console);
    *reset = outcome.is_ok();
    self.settle(report, Stage::ResetWorkArea, outcome)?;

    let area = self.area.clone();
    let ctx = RunContext::new(config, &area, release);
    report.release = Some(ReleaseSummary::from_context(&ctx));

    self.begin(Stage::Download)?;
    let outcome = download::run(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Download, outcome)?;

    self.begin(Stage::ImportKeys)?;
    let outcome = signature::import_keys(&ctx, runner, &mut self.console);
    self.settle(report, Stage::ImportKeys, outcome)?;

    self.begin(Stage::Signature)?;
    let outcome = signature::verify(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Signature, outcome)?;

    self.begin(Stage::Checksum)?;
    let outcome = checksum::run(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Checksum, outcome)?;
    self.fingerprint(&ctx, report)?;

    self.begin(Stage::Clone)?;
    let outcome = tree::clone(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Clone, outcome)?;

    self.begin(Stage::ExportTree)?;
    let outcome = tree::export(&ctx, runner, &mut self.console);
    self.settle(report, Stage::ExportTree, outcome)?;

    self.begin(Stage::Unpack)?;
    let outcome = tree::unpack(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Unpack, outcome)?;

    self.begin(Stage::Diff)?;
    let outcome = tree::diff(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Diff, outcome)?;

    self.begin(Stage::Configure)?;
    let outcome = build::configure(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Configure, outcome)?;

    self.begin(Stage::Test)?;
    let outcome = build::test(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Test, outcome)?;

    self.begin(Stage::Package)?;
    let outcome = build::package(&ctx, runner, &mut self.console);
    self.settle(report, Stage::Package, outcome)?;

    self.begin(Stage::Completion)?;
    let outcome = completion::run(&ctx, &mut self.console);
    self.settle(report, Stage::Completion, outcome)
  }

  fn intro(&mut self) -> VerifyResult<()> {
    self.console.banner()?;
    self.console.say("remember: you need to have installed these programs:")?;
    self.console.say(REQUIRED_PACKAGES)?;
    self.console.blank()?;
    self.console.say("The release testing info page can be found at:")?;
    self.console.say(TESTING_GUIDE_URL)?;
    Ok(())
  }

  fn begin(&mut self, stage: Stage) -> VerifyResult<()> {
    tracing::info!(%stage, policy = %self.config.policy.policy_for(stage), "stage started");
    self.console.banner()?;
    Ok(())
  }

  /// Record the stage and apply its gate policy
  fn settle(&mut self, report: &mut RunReport, stage: Stage, result: VerifyResult<StageOutcome>) -> VerifyResult<()> {
    let policy = self.config.policy.policy_for(stage);

    let outcome = match result {
      Ok(outcome) => outcome,
      Err(e) => {
        tracing::debug!(%stage, error = %e, "stage errored");
        report.record_error(stage, policy, &e);
        return Err(e);
      }
    };

    tracing::info!(%stage, passed = outcome.passed, code = ?outcome.code, "stage finished");
    report.record(stage, policy, &outcome);

    if outcome.passed {
      return Ok(());
    }

    match policy {
      GatePolicy::Gating => Err(VerifyError::Gate(GateError {
        stage,
        message: outcome.message,
        status: outcome.code,
      })),
      GatePolicy::Reporting => {
        self.console.warn(format!("{} ({} is not gating, continuing)", outcome.message, stage))?;
        Ok(())
      }
    }
  }

  /// SHA-256 of the tarball for the report; a read failure is only logged
  fn fingerprint(&mut self, ctx: &RunContext<'_>, report: &mut RunReport) -> VerifyResult<()> {
    match checksum::sha256_file(&ctx.artifact_path()) {
      Ok(digest) => {
        self.console.say(format!("sha256 of {}: {}", ctx.identity.artifact_filename(), digest))?;
        report.artifact_sha256 = Some(digest);
      }
      Err(e) => tracing::warn!(error = %e, "could not fingerprint the artifact"),
    }
    Ok(())
  }
}
