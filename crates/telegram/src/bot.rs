use std::{sync::Arc, time::Duration};

use {
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand, UpdateKind},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use {
    metamapa_commands::{COMMANDS, Dispatcher},
    metamapa_config::TelegramConfig,
};

use crate::{
    error::{Error, Result},
    handlers,
    outbound::TelegramOutbound,
    state::BotState,
};

/// Extra headroom the HTTP client gets over the long-polling timeout so it
/// does not abort `getUpdates` before Telegram answers.
const CLIENT_TIMEOUT_MARGIN: Duration = Duration::from_secs(15);

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Commands published for client autocomplete, in table order.
#[must_use]
pub fn bot_commands() -> Vec<BotCommand> {
    COMMANDS
        .iter()
        .map(|spec| BotCommand::new(spec.command(), spec.description))
        .collect()
}

/// Connect the bot and start polling for updates.
///
/// Spawns a background task that processes updates one at a time until the
/// returned `CancellationToken` is cancelled. The token is also cancelled
/// when another instance takes over the same bot token.
pub async fn start_polling(
    config: &TelegramConfig,
    dispatcher: Dispatcher,
) -> Result<CancellationToken> {
    let token = config
        .token
        .as_ref()
        .map(|t| t.expose_secret().trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::message("telegram bot token is not configured"))?;

    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(config.poll_timeout_secs.into()) + CLIENT_TIMEOUT_MARGIN)
        .build()?;
    let bot = Bot::with_client(token, client);

    // Verify credentials and get bot username.
    let me = bot.get_me().await?;
    let bot_username = config.username.clone().or_else(|| me.username.clone());

    // Delete any existing webhook so long polling works.
    bot.delete_webhook().send().await?;

    if config.register_commands
        && let Err(e) = bot.set_my_commands(bot_commands()).await
    {
        warn!(error = %e, "failed to register bot commands");
    }

    info!(username = ?bot_username, "telegram bot connected (webhook cleared)");

    let state = BotState {
        dispatcher,
        outbound: Arc::new(TelegramOutbound::new(bot.clone())),
        bot_username,
    };
    let cancel = CancellationToken::new();
    let poll_timeout = config.poll_timeout_secs;

    let loop_cancel = cancel.clone();
    tokio::spawn(async move {
        info!("starting telegram polling loop");
        let mut offset: i32 = 0;

        loop {
            let result = tokio::select! {
                () = loop_cancel.cancelled() => break,
                result = poll_once(&bot, &state, offset, poll_timeout) => result,
            };

            match result {
                Ok(next) => offset = next,
                Err(RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) => {
                    warn!(
                        "telegram bot disabled: another instance is already running with this token"
                    );
                    loop_cancel.cancel();
                    break;
                },
                Err(e) => {
                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::select! {
                        () = loop_cancel.cancelled() => break,
                        () = tokio::time::sleep(POLL_ERROR_BACKOFF) => {},
                    }
                },
            }
        }

        info!("telegram polling stopped");
    });

    Ok(cancel)
}

/// Fetch one batch of updates and handle each message in order.
///
/// Returns the offset for the next call.
pub async fn poll_once(
    bot: &Bot,
    state: &BotState,
    offset: i32,
    timeout_secs: u32,
) -> std::result::Result<i32, RequestError> {
    let updates = bot
        .get_updates()
        .offset(offset)
        .timeout(timeout_secs)
        .allowed_updates(vec![AllowedUpdate::Message])
        .await?;

    debug!(count = updates.len(), "got telegram updates");

    let mut next = offset;
    for update in updates {
        next = update.id.as_offset();
        match update.kind {
            UpdateKind::Message(msg) => {
                debug!(chat_id = msg.chat.id.0, "received telegram message");
                handlers::handle_message_direct(msg, state).await;
            },
            other => {
                debug!("ignoring non-message update: {other:?}");
            },
        }
    }
    Ok(next)
}
