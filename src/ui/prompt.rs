//! Interactive questions on stdin

use super::console::Console;
use crate::core::error::{ResultExt, VerifyError, VerifyResult};
use std::io::BufRead;

/// Print `question` and read one line; blocks until the operator answers.
///
/// End of input before any answer is an error, an empty line is a valid answer.
pub fn ask(console: &mut Console<'_>, input: &mut dyn BufRead, question: &str) -> VerifyResult<String> {
  console.ask(question)?;

  let mut line = String::new();
  let read = input
    .read_line(&mut line)
    .with_context(|| format!("Failed to read answer to '{}'", question.trim()))?;

  if read == 0 {
    console.blank()?;
    return Err(VerifyError::with_help(
      format!("No answer to '{}': input closed", question.trim()),
      "Pass --release-version and --candidate when running without a terminal.",
    ));
  }

  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
