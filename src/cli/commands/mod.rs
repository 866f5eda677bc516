//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed to by
//! [`CommandDispatcher`].

pub mod completions;
pub mod dispatcher;
pub mod run;
pub mod steps;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
