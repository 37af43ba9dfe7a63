//! Operator-facing status output

use std::io::{self, Write};

const BANNER: &str = "~~~~~~~~~~~~~~~~~~~ Apache CouchDB release testing ~~~~~~~~~~~~~~~~~~~";

/// Line-oriented writer for status messages.
///
/// Every write is flushed so messages stay ordered with the output of child
/// processes that share the terminal.
pub struct Console<'a> {
  out: Box<dyn Write + 'a>,
}

impl<'a> Console<'a> {
  pub fn new(out: impl Write + 'a) -> Self {
    Self { out: Box::new(out) }
  }

  /// Plain status line
  pub fn say(&mut self, message: impl AsRef<str>) -> io::Result<()> {
    writeln!(self.out, "{}", message.as_ref())?;
    self.out.flush()
  }

  /// Text without a trailing newline (prompts)
  pub fn ask(&mut self, question: &str) -> io::Result<()> {
    write!(self.out, "{}", question)?;
    self.out.flush()
  }

  pub fn blank(&mut self) -> io::Result<()> {
    self.say("")
  }

  /// Stage separator
  pub fn banner(&mut self) -> io::Result<()> {
    writeln!(self.out)?;
    writeln!(self.out, "{}", BANNER)?;
    writeln!(self.out)?;
    self.out.flush()
  }

  pub fn success(&mut self, message: impl AsRef<str>) -> io::Result<()> {
    self.say(format!("✅ {}", message.as_ref()))
  }

  pub fn failure(&mut self, message: impl AsRef<str>) -> io::Result<()> {
    self.say(format!("❌ {}", message.as_ref()))
  }

  pub fn warn(&mut self, message: impl AsRef<str>) -> io::Result<()> {
    self.say(format!("⚠️  {}", message.as_ref()))
  }

  pub fn hint(&mut self, message: impl AsRef<str>) -> io::Result<()> {
    self.say(format!("   💡 {}", message.as_ref()))
  }

  /// Raw tool output, terminated with a newline if it lacks one
  pub fn passthrough(&mut self, text: &str) -> io::Result<()> {
    if text.is_empty() {
      return Ok(());
    }
    write!(self.out, "{}", text)?;
    if !text.ends_with('\n') {
      writeln!(self.out)?;
    }
    self.out.flush()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_markers_and_banner() {
    let mut buf = Vec::new();
    {
      let mut console = Console::new(&mut buf);
      console.success("the sha256sum is correct").unwrap();
      console.warn("diff found differences").unwrap();
      console.banner().unwrap();
    }
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("✅ the sha256sum is correct\n⚠️  diff found differences\n"));
    assert!(text.contains("\n~~~~~~~~~~~~~~~~~~~ Apache CouchDB release testing"));
  }

  #[test]
  fn test_passthrough_terminates_line() {
    let mut buf = Vec::new();
    {
      let mut console = Console::new(&mut buf);
      console.passthrough("gpg: Good signature").unwrap();
      console.passthrough("").unwrap();
      console.passthrough("done\n").unwrap();
    }
    assert_eq!(String::from_utf8(buf).unwrap(), "gpg: Good signature\ndone\n");
  }
}
