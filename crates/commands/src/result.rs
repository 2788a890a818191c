use metamapa_backends::types::{Fact, FactSummary, Pdi};

use crate::{error::CommandError, registry::CommandName};

/// Outcome of handling one inbound message, consumed by the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Success(Outcome),
    /// The backend had nothing for the requested key.
    Empty(Absent),
    Failure(CommandError),
}

/// Typed success payloads, one per handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Static help text for a menu command.
    Menu(CommandName),
    FactList {
        collection: String,
        facts: Vec<FactSummary>,
    },
    FactDetail {
        id: String,
        fact: Fact,
        images: Vec<Pdi>,
    },
    FactCreated {
        id: Option<String>,
    },
    PdiCreated {
        id: Option<String>,
        content: String,
    },
    DeletionRequested {
        id: Option<String>,
        status: Option<String>,
    },
    RequestUpdated {
        id: String,
        status: String,
    },
    /// No command matched the input.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Absent {
    Fact { id: String },
    Collection { name: String },
}

impl From<crate::error::Result<CommandResult>> for CommandResult {
    fn from(result: crate::error::Result<CommandResult>) -> Self {
        result.unwrap_or_else(Self::Failure)
    }
}
