//! `couchdb-release-check verify` - run the full verification pipeline

use crate::core::error::VerifyResult;
use crate::pipeline::Pipeline;
use crate::pipeline::steps::identity::IdentityRequest;
use crate::process::SystemRunner;
use crate::ui::Console;
use std::io;
use std::path::{Path, PathBuf};

/// Flags for the verify command
#[derive(Debug, Default)]
pub struct VerifyArgs {
  pub release_version: Option<String>,
  pub candidate: Option<String>,
  pub work_root: Option<PathBuf>,
  pub no_report: bool,
}

/// Run the verify command
pub fn run_verify(config_path: Option<&Path>, args: VerifyArgs) -> VerifyResult<()> {
  let mut config = super::load_config(config_path)?;
  if let Some(root) = args.work_root {
    config.workspace.root = root;
    config.validate()?;
  }
  tracing::debug!(root = %config.workspace.root.display(), "work root");

  let runner = SystemRunner;
  let console = Console::new(io::stdout());
  let input = Box::new(io::stdin().lock());

  let mut pipeline = Pipeline::new(&config, &runner, console, input);
  if args.no_report {
    pipeline = pipeline.without_report();
  }

  let request = IdentityRequest::new(args.release_version, args.candidate);
  pipeline.run(&request).into_result().map(|_| ())
}
