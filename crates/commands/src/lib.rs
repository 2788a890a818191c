//! Command interpreter and response formatter for the MetaMapa chat bot.
//!
//! Inbound text is matched against an ordered command table, its arguments
//! are split and validated, the matching handler calls the backends, and the
//! outcome is rendered into chat replies. Nothing in here touches the
//! messaging transport.

pub mod dispatcher;
pub mod error;
pub mod format;
pub mod handlers;
pub mod parse;
pub mod registry;
pub mod result;

pub use {
    dispatcher::{Dispatcher, DispatcherOptions},
    error::{CommandError, FailureKind},
    registry::{COMMANDS, CommandName, CommandSpec, ParsedCommand},
    result::{Absent, CommandResult, Outcome},
};
