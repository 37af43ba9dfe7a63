/// What a stage function observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
  pub passed: bool,
  /// Exit status of the command that decided the outcome
  pub code: Option<i32>,
  pub message: String,
}

impl StageOutcome {
  pub fn pass(message: impl Into<String>) -> Self {
    Self {
      passed: true,
      code: Some(0),
      message: message.into(),
    }
  }

  pub fn fail(message: impl Into<String>, code: Option<i32>) -> Self {
    Self {
      passed: false,
      code,
      message: message.into(),
    }
  }
}
