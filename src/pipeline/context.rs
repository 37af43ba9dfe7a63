use crate::core::config::VerifyConfig;
use crate::core::work_area::WorkArea;
use crate::release::{InstallPaths, ReleaseIdentity};
use std::path::PathBuf;

/// Everything the stages after `identity` need
pub struct RunContext<'a> {
  pub config: &'a VerifyConfig,
  pub area: &'a WorkArea,
  pub identity: ReleaseIdentity,
}

impl<'a> RunContext<'a> {
  pub fn new(config: &'a VerifyConfig, area: &'a WorkArea, identity: ReleaseIdentity) -> Self {
    Self {
      config,
      area,
      identity,
    }
  }

  /// Downloaded tarball
  pub fn artifact_path(&self) -> PathBuf {
    self.area.dist().join(self.identity.artifact_filename())
  }

  /// `.ish` sidecar next to the tarball
  pub fn tree_ish_path(&self) -> PathBuf {
    self.area.dist().join(self.identity.tree_ish_filename())
  }

  /// Directory the tarball unpacks into
  pub fn source_dir(&self) -> PathBuf {
    self.area.dist().join(self.identity.source_dir_name())
  }

  pub fn install_paths(&self) -> InstallPaths {
    InstallPaths::under(&self.source_dir())
  }
}
