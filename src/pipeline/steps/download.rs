//! Release artifact download and work area reset

use crate::core::error::VerifyResult;
use crate::core::work_area::WorkArea;
use crate::pipeline::context::RunContext;
use crate::pipeline::outcome::StageOutcome;
use crate::process::{CommandRunner, OutputMode, ToolCommand};
use crate::ui::Console;

/// Wipe the previous run and recreate dist/, git/ and tree/
pub fn reset(area: &WorkArea, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  if area.reset()? {
    console.say(format!("old directory {} deleted", area.root().display()))?;
  }
  console.say(format!("created directory dist, git, tree in {}", area.root().display()))?;
  Ok(StageOutcome::pass("work area ready"))
}

/// One download-client invocation per artifact, run inside dist/
pub fn commands(ctx: &RunContext<'_>) -> Vec<ToolCommand> {
  ctx
    .identity
    .download_urls(&ctx.config.release.base_url)
    .into_iter()
    .map(|url| {
      ToolCommand::new(&ctx.config.tools.download)
        .arg(url)
        .current_dir(ctx.area.dist())
    })
    .collect()
}

/// Fetch every artifact; failures are counted, not acted on
pub fn run(ctx: &RunContext<'_>, runner: &dyn CommandRunner, console: &mut Console<'_>) -> VerifyResult<StageOutcome> {
  console.say("download the release files")?;

  let commands = commands(ctx);
  let mut first_failure = None;
  let mut failed = 0;
  for cmd in &commands {
    let outcome = runner.run(cmd, OutputMode::Quiet)?;
    if !outcome.success() {
      failed += 1;
      first_failure.get_or_insert(outcome.code);
      console.failure(format!("{} exited with {:?}", cmd, outcome.code))?;
    }
  }

  console.say("downloaded couchdb release files:")?;
  for name in ctx.area.list_dist()? {
    console.say(format!("  {}", name))?;
  }

  match first_failure {
    None => Ok(StageOutcome::pass(format!("fetched {} files", commands.len()))),
    Some(code) => Ok(StageOutcome::fail(
      format!("{} of {} downloads failed", failed, commands.len()),
      code,
    )),
  }
}
