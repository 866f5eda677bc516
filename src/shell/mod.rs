//! Shell command execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{execute_program, CommandOptions, CommandResult};
pub use platform::{is_ci, os_name};
