//! Release identity from flags or prompts

use crate::core::error::VerifyResult;
use crate::release::ReleaseIdentity;
use crate::ui::{Console, prompt};
use std::io::BufRead;

pub const VERSION_PROMPT: &str = "Provide the couchdb release version: ";
pub const CANDIDATE_PROMPT: &str = "Provide the couchdb release candidate: ";

/// Values given on the command line; missing ones are prompted for
#[derive(Debug, Clone, Default)]
pub struct IdentityRequest {
  pub version: Option<String>,
  pub candidate: Option<String>,
}

impl IdentityRequest {
  pub fn new(version: Option<String>, candidate: Option<String>) -> Self {
    Self { version, candidate }
  }
}

pub fn resolve(
  request: &IdentityRequest,
  prefix: &str,
  base_url: &str,
  console: &mut Console<'_>,
  input: &mut dyn BufRead,
) -> VerifyResult<ReleaseIdentity> {
  let version = match &request.version {
    Some(version) => version.clone(),
    None => prompt::ask(console, input, VERSION_PROMPT)?,
  };
  let candidate = match &request.candidate {
    Some(candidate) => candidate.clone(),
    None => prompt::ask(console, input, CANDIDATE_PROMPT)?,
  };

  let identity = ReleaseIdentity::new(&version, &candidate, prefix);

  if !identity.is_semver() {
    console.warn(format!(
      "version '{}' is not MAJOR.MINOR.PATCH; using it as typed",
      identity.version
    ))?;
  }
  console.say(format!("release file: {}", identity.artifact_filename()))?;
  console.say(format!("release url:  {}", identity.artifact_url(base_url)))?;

  Ok(identity)
}
