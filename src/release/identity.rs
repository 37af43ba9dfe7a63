//! Release identity and the names derived from it
//!
//! Everything here is plain string substitution. Version and candidate are
//! taken as typed by the operator; nothing is escaped or validated, so a
//! malformed value shows up later as a failed download or a missing file.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Version + release-candidate label as entered by the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseIdentity {
  pub version: String,
  pub candidate: String,
  /// Leading part of the artifact name (`apache-couchdb`)
  pub prefix: String,
}

impl ReleaseIdentity {
  /// Build an identity, stripping only the trailing line ending from each value
  pub fn new(version: &str, candidate: &str, prefix: &str) -> Self {
    Self {
      version: chomp(version).to_string(),
      candidate: chomp(candidate).to_string(),
      prefix: prefix.to_string(),
    }
  }

  /// Candidate label uppercased with every `.` and `/` removed (`rc.1` -> `RC1`)
  pub fn candidate_token(&self) -> String {
    self
      .candidate
      .to_uppercase()
      .chars()
      .filter(|c| *c != '.' && *c != '/')
      .collect()
  }

  /// `apache-couchdb-<version>-<token>.tar.gz`
  pub fn artifact_filename(&self) -> String {
    format!("{}-{}-{}.tar.gz", self.prefix, self.version, self.candidate_token())
  }

  /// `<base><version>/<candidate>/<artifact>`, joined without escaping
  pub fn artifact_url(&self, base_url: &str) -> String {
    [
      base_url,
      &self.version,
      "/",
      &self.candidate,
      "/",
      &self.artifact_filename(),
    ]
    .concat()
  }

  /// Artifact URL followed by its `.asc`, `.sha256` and `.sha512` siblings
  pub fn download_urls(&self, base_url: &str) -> Vec<String> {
    let artifact = self.artifact_url(base_url);
    let mut urls = vec![artifact.clone()];
    urls.extend(SIDECAR_SUFFIXES.iter().map(|suffix| format!("{}{}", artifact, suffix)));
    urls
  }

  /// Detached signature filename
  pub fn signature_filename(&self) -> String {
    format!("{}.asc", self.artifact_filename())
  }

  /// Digest file for the given algorithm suffix (`sha256`, `sha512`)
  pub fn digest_filename(&self, algorithm: &str) -> String {
    format!("{}.{}", self.artifact_filename(), algorithm)
  }

  /// Sidecar naming the git tree the tarball was cut from
  pub fn tree_ish_filename(&self) -> String {
    format!("{}.ish", self.artifact_filename())
  }

  /// Directory the tarball unpacks into (`apache-couchdb-<version>`)
  pub fn source_dir_name(&self) -> String {
    format!("{}-{}", self.prefix, self.version)
  }

  /// Whether the version parses as semver. Only used for a warning.
  pub fn is_semver(&self) -> bool {
    semver::Version::parse(&self.version).is_ok()
  }
}

/// Siblings fetched next to the tarball
pub const SIDECAR_SUFFIXES: [&str; 3] = [".asc", ".sha256", ".sha512"];

/// Paths an operator needs after `make release`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPaths {
  pub local_ini: PathBuf,
  pub start_command: PathBuf,
}

impl InstallPaths {
  /// Paths inside `<source_dir>/rel/couchdb`
  pub fn under(source_dir: &Path) -> Self {
    let rel = source_dir.join("rel").join("couchdb");
    Self {
      local_ini: rel.join("etc").join("local.ini"),
      start_command: rel.join("bin").join("couchdb"),
    }
  }
}

fn chomp(value: &str) -> &str {
  value
    .strip_suffix("\r\n")
    .or_else(|| value.strip_suffix('\n'))
    .unwrap_or(value)
}
