//! Core building blocks shared by every command
//!
//! - **config**: `release-check.toml` parsing and validation
//! - **error**: Error types with exit codes and contextual help messages
//! - **work_area**: The `dist`/`git`/`tree` directory layout under the work root

pub mod config;
pub mod error;
pub mod work_area;
