use {
    metamapa_backends::Backends,
    metamapa_channels::{IncomingMessage, OutboundReply},
    tracing::{debug, warn},
};

use crate::{
    error::Result,
    format::{self, DEFAULT_LIST_LIMIT},
    handlers,
    registry::{self, CommandName, ParsedCommand},
    result::{CommandResult, Outcome},
};

#[derive(Debug, Clone, Copy)]
pub struct DispatcherOptions {
    /// Look up a fact's images after fetching its detail.
    pub fetch_fact_images: bool,
    /// Maximum entries shown in a fact list.
    pub list_limit: usize,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            fetch_fact_images: true,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Stateless per-message command interpreter.
///
/// Safe to share across tasks: the backends hold only a connection pool.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    backends: Backends,
    options: DispatcherOptions,
}

impl Dispatcher {
    #[must_use]
    pub fn new(backends: Backends, options: DispatcherOptions) -> Self {
        Self { backends, options }
    }

    #[must_use]
    pub fn options(&self) -> DispatcherOptions {
        self.options
    }

    /// Interpret one message and compute every reply it produces.
    ///
    /// Never fails: validation and backend errors become failure replies.
    pub async fn handle(&self, msg: &IncomingMessage) -> Vec<OutboundReply> {
        let result = self.execute(&msg.text).await;
        format::replies(&msg.conversation_id, &result, self.options.list_limit)
    }

    /// Interpret `text` into a [`CommandResult`].
    pub async fn execute(&self, text: &str) -> CommandResult {
        let text = text.trim();

        let Some(parsed) = registry::recognize(text) else {
            debug!(text_len = text.len(), "unrecognized command");
            return CommandResult::Success(Outcome::Unrecognized);
        };

        let result = match parsed {
            Ok(command) => {
                debug!(command = ?command.name, "dispatching command");
                self.run(&command).await
            },
            Err(e) => Err(e),
        };

        let result = CommandResult::from(result);
        if let CommandResult::Failure(ref e) = result {
            warn!(kind = %e.kind(), error = %e, "command failed");
        }
        result
    }

    async fn run(&self, command: &ParsedCommand) -> Result<CommandResult> {
        let b = &self.backends;
        match command.name {
            CommandName::Start
            | CommandName::AggregatorMenu
            | CommandName::SourcesMenu
            | CommandName::PdiMenu
            | CommandName::RequestsMenu
            | CommandName::AllCommands => Ok(CommandResult::Success(Outcome::Menu(command.name))),
            CommandName::ListCollection => handlers::list_collection(b, command.arg(0)).await,
            CommandName::ShowFact => {
                handlers::show_fact(b, command.arg(0), self.options.fetch_fact_images).await
            },
            CommandName::CreateFact => {
                handlers::create_fact(b, command.arg(0), command.arg(1), command.arg(2)).await
            },
            CommandName::AttachPdi => {
                handlers::attach_pdi(b, command.arg(0), command.arg(1)).await
            },
            CommandName::RequestDeletion => {
                handlers::request_deletion(b, command.arg(0), command.arg(1)).await
            },
            CommandName::UpdateRequest => {
                handlers::update_request(b, command.arg(0), command.arg(1)).await
            },
        }
    }
}
