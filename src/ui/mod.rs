//! Terminal interaction: status lines and prompts

pub mod console;
pub mod prompt;

pub use console::Console;
