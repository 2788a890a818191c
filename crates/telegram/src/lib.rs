//! Telegram transport for the MetaMapa bot.
//!
//! Long-polls the Bot API with teloxide, feeds each text message to the
//! command dispatcher and sends the replies back as Markdown text and photos.

pub mod bot;
pub mod chunk;
pub mod error;
pub mod handlers;
pub mod outbound;
pub mod state;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod mock_api;

pub use {
    bot::{bot_commands, poll_once, start_polling},
    error::{Error, Result},
    outbound::TelegramOutbound,
    state::BotState,
};
