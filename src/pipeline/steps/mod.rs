//! One module per group of pipeline stages
//!
//! Each stage is a function returning a [`StageOutcome`](super::StageOutcome);
//! the driver decides what a failed outcome means. Command builders are public
//! so `plan` can print exactly what a run would execute.

pub mod build;
pub mod checksum;
pub mod completion;
pub mod download;
pub mod identity;
pub mod preflight;
pub mod signature;
pub mod tree;
