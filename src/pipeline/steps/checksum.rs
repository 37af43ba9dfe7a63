//! Published digest checks

use crate::core::error::{ResultExt, VerifyResult};
use crate::pipeline::context::RunContext;
use crate::pipeline::outcome::StageOutcome;
use crate::process::{CommandRunner, OutputMode, ToolCommand};
use crate::ui::Console;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// `(label, command)` for sha256 then sha512, each checking its digest file in dist/
pub fn commands(ctx: &RunContext<'_>) -> Vec<(&'static str, ToolCommand)> {
  [
    ("sha256", &ctx.config.tools.sha256),
    ("sha512", &ctx.config.tools.sha512),
  ]
  .into_iter()
  .map(|(algorithm, program)| {
    let cmd = ToolCommand::new(program)
      .arg("--check")
      .arg(ctx.identity.digest_filename(algorithm))
      .current_dir(ctx.area.dist());
    (algorithm, cmd)
  })
  .collect()
}

/// Stop at the first digest that does not match
pub fn run(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  for (algorithm, cmd) in commands(ctx) {
    console.say(format!("checking {} sum", algorithm))?;
    let outcome = runner.run(&cmd, OutputMode::Quiet)?;
    if !outcome.success() {
      let message = format!("the {}sum is incorrect", algorithm);
      console.failure(&message)?;
      return Ok(StageOutcome::fail(message, outcome.code));
    }
    console.success(format!("the {}sum is correct", algorithm))?;
  }

  Ok(StageOutcome::pass("sha256 and sha512 sums are correct"))
}

/// Lowercase hex SHA-256 of a file, for the run report
pub fn sha256_file(path: &Path) -> VerifyResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(format!("{:x}", hasher.finalize()))
}
