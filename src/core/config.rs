use crate::core::error::{ConfigError, ResultExt, VerifyError, VerifyResult};
use crate::pipeline::{GatePolicy, Stage};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Configuration for couchdb-release-check
/// Searched in order: release-check.toml, .release-check.toml, .config/release-check.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyConfig {
  #[serde(default)]
  pub release: ReleaseConfig,
  #[serde(default)]
  pub workspace: WorkspaceConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
  #[serde(default)]
  pub policy: PolicyConfig,
}

/// Where release artifacts and sources come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  /// Prefix the version and candidate are appended to
  #[serde(default = "default_base_url")]
  pub base_url: String,

  /// Public keyring imported before signature verification
  #[serde(default = "default_keys_url")]
  pub keys_url: String,

  /// Repository the reference tree is exported from
  #[serde(default = "default_repository_url")]
  pub repository_url: String,

  /// Leading part of the artifact filename and unpacked directory
  #[serde(default = "default_artifact_prefix")]
  pub artifact_prefix: String,
}

fn default_base_url() -> String {
  "https://dist.apache.org/repos/dist/dev/couchdb/source/".to_string()
}

fn default_keys_url() -> String {
  "https://downloads.apache.org/couchdb/KEYS".to_string()
}

fn default_repository_url() -> String {
  "https://gitbox.apache.org/repos/asf/couchdb.git".to_string()
}

fn default_artifact_prefix() -> String {
  "apache-couchdb".to_string()
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      keys_url: default_keys_url(),
      repository_url: default_repository_url(),
      artifact_prefix: default_artifact_prefix(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
  /// Scratch root holding dist/, git/ and tree/. Wiped at the start of every run.
  #[serde(default = "default_work_root")]
  pub root: PathBuf,
}

fn default_work_root() -> PathBuf {
  PathBuf::from("/tmp/couchdb")
}

impl Default for WorkspaceConfig {
  fn default() -> Self {
    Self {
      root: default_work_root(),
    }
  }
}

/// Program names for every external tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  #[serde(default = "default_toolchain")]
  pub toolchain: String,
  #[serde(default = "default_download")]
  pub download: String,
  #[serde(default = "default_fetch")]
  pub fetch: String,
  #[serde(default = "default_signature")]
  pub signature: String,
  #[serde(default = "default_sha256")]
  pub sha256: String,
  #[serde(default = "default_sha512")]
  pub sha512: String,
  #[serde(default = "default_vcs")]
  pub vcs: String,
  #[serde(default = "default_archive")]
  pub archive: String,
  #[serde(default = "default_diff")]
  pub diff: String,
  #[serde(default = "default_make")]
  pub make: String,
}

fn default_toolchain() -> String {
  "erl".to_string()
}

fn default_download() -> String {
  "wget".to_string()
}

fn default_fetch() -> String {
  "curl".to_string()
}

fn default_signature() -> String {
  "gpg".to_string()
}

fn default_sha256() -> String {
  "sha256sum".to_string()
}

fn default_sha512() -> String {
  "sha512sum".to_string()
}

fn default_vcs() -> String {
  "git".to_string()
}

fn default_archive() -> String {
  "tar".to_string()
}

fn default_diff() -> String {
  "diff".to_string()
}

fn default_make() -> String {
  "make".to_string()
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      toolchain: default_toolchain(),
      download: default_download(),
      fetch: default_fetch(),
      signature: default_signature(),
      sha256: default_sha256(),
      sha512: default_sha512(),
      vcs: default_vcs(),
      archive: default_archive(),
      diff: default_diff(),
      make: default_make(),
    }
  }
}

/// Gate policy overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
  /// Reporting stages promoted to gating, by stage id (e.g. "signature", "diff")
  #[serde(default)]
  pub strict: Vec<String>,
}

impl PolicyConfig {
  /// Validate stage names; only reporting stages may be listed
  pub fn validate(&self) -> VerifyResult<()> {
    for name in &self.strict {
      let stage: Stage = name
        .parse()
        .map_err(|name| VerifyError::Config(ConfigError::UnknownStage { name }))?;
      if stage.default_policy() == GatePolicy::Gating {
        return Err(VerifyError::Config(ConfigError::NotPromotable { stage }));
      }
    }
    Ok(())
  }

  /// Effective policy for a stage after promotion
  pub fn policy_for(&self, stage: Stage) -> GatePolicy {
    if self.strict.iter().any(|s| s == stage.id()) {
      GatePolicy::Gating
    } else {
      stage.default_policy()
    }
  }
}

impl VerifyConfig {
  /// Find config file in search order: release-check.toml, .release-check.toml, .config/release-check.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release-check.toml"),
      path.join(".release-check.toml"),
      path.join(".config").join("release-check.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Resolve the effective config.
  ///
  /// An explicit path must exist. Without one, the search locations under
  /// `search_dir` are tried and built-in defaults are used if none exists.
  pub fn resolve(explicit: Option<&Path>, search_dir: &Path) -> VerifyResult<Self> {
    match explicit {
      Some(path) => {
        if !path.exists() {
          return Err(VerifyError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
          }));
        }
        Self::load(path)
      }
      None => match Self::find_config_path(search_dir) {
        Some(path) => Self::load(&path),
        None => {
          tracing::debug!("no config file under {}, using defaults", search_dir.display());
          Ok(Self::default())
        }
      },
    }
  }

  /// Load and validate a config file
  pub fn load(config_path: &Path) -> VerifyResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;
    tracing::debug!("loaded config from {}", config_path.display());
    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> VerifyResult<Self> {
    let config: VerifyConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate the whole configuration
  pub fn validate(&self) -> VerifyResult<()> {
    let urls = [
      ("release.base_url", &self.release.base_url),
      ("release.keys_url", &self.release.keys_url),
      ("release.repository_url", &self.release.repository_url),
    ];
    for (field, value) in urls {
      if value.trim().is_empty() {
        return Err(VerifyError::Config(ConfigError::Invalid {
          field: field.to_string(),
          reason: "must not be empty".to_string(),
        }));
      }
    }

    if self.release.artifact_prefix.trim().is_empty() {
      return Err(VerifyError::Config(ConfigError::Invalid {
        field: "release.artifact_prefix".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    let home = env::var_os("HOME").map(PathBuf::from);
    if is_protected_root(&self.workspace.root, home.as_deref()) {
      return Err(VerifyError::Config(ConfigError::Invalid {
        field: "workspace.root".to_string(),
        reason: format!("'{}' cannot be used as a scratch root", self.workspace.root.display()),
      }));
    }

    self.policy.validate()
  }
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` above the root stays at the root; leading `..` of a relative path is kept.
fn normalize_lexically(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match normalized.components().next_back() {
        Some(Component::Normal(_)) => {
          normalized.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => normalized.push(".."),
      },
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}

/// Roots that `reset` must never delete: empty or the current directory,
/// the filesystem root, or the home directory
fn is_protected_root(root: &Path, home: Option<&Path>) -> bool {
  let root = normalize_lexically(root);
  if root.as_os_str().is_empty() || root.parent().is_none() {
    return true;
  }
  home.is_some_and(|home| normalize_lexically(home) == root)
}
