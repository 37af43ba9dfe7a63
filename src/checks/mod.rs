//! Environment checks
//!
//! This module provides a unified interface for the checks `doctor` prints
//! and the preflight stage enforces. All checks implement the `Check` trait.
//!
//! # Built-in Checks
//!
//! - **tool-\***: one per required executable (erl, wget, curl, gpg,
//!   sha256sum, sha512sum, git, tar, diff, make)
//! - **work-area**: warns when the scratch root from a previous run is about
//!   to be deleted
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = CheckContext {
//!   runner: &SystemRunner,
//!   work_root: Path::new("/tmp/couchdb"),
//! };
//!
//! let runner = create_default_runner(&config.tools);
//! for result in runner.run_all(&ctx)? {
//!   if !result.passed {
//!     println!("❌ {}: {}", result.check_name, result.message);
//!   }
//! }
//! ```

mod runner;
mod tools;
mod trait_def;
mod work_area;

// Re-export public API
pub use runner::{create_default_runner, tool_checks};
pub use trait_def::{Check, CheckContext, CheckResult, Severity};
