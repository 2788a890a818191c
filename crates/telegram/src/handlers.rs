use {
    std::borrow::Cow,
    teloxide::types::{MediaKind, Message, MessageKind},
    tracing::{debug, info, warn},
};

use metamapa_channels::{IncomingMessage, deliver};

use crate::state::BotState;

/// Handle a single inbound Telegram message (called from the polling loop).
///
/// Computes every reply first, then delivers them in order. Errors never
/// escape: failures are already turned into replies or logged.
pub async fn handle_message_direct(msg: Message, state: &BotState) {
    let chat_id = msg.chat.id.0;
    let Some(text) = extract_text(&msg) else {
        debug!(chat_id, "ignoring non-text message");
        return;
    };

    let Some(text) = strip_bot_mention(text, state.bot_username.as_deref()) else {
        debug!(chat_id, "ignoring command addressed to another bot");
        return;
    };

    let conversation_id = chat_id.to_string();
    if let Err(e) = state.outbound.send_typing(&conversation_id).await {
        debug!(chat_id, error = %e, "failed to send typing indicator");
    }

    let incoming = IncomingMessage::new(conversation_id, text);
    let replies = state.dispatcher.handle(&incoming).await;
    let report = deliver(state.outbound.as_ref(), &replies).await;

    if report.failed > 0 {
        warn!(
            chat_id,
            sent = report.sent,
            failed = report.failed,
            "some replies were not delivered"
        );
    } else {
        info!(chat_id, sent = report.sent, "replies delivered");
    }
}

/// Text of a plain text message. Captions and other media are not commands.
fn extract_text(msg: &Message) -> Option<&str> {
    match &msg.kind {
        MessageKind::Common(common) => match &common.media_kind {
            MediaKind::Text(t) => Some(t.text.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// Remove the `@username` suffix clients add to commands in groups
/// (`/hecho@metamapa_bot 12` → `/hecho 12`).
///
/// Returns `None` when the command names a different bot.
fn strip_bot_mention<'a>(text: &'a str, bot_username: Option<&str>) -> Option<Cow<'a, str>> {
    let trimmed = text.trim_start();
    let command_end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let command = &trimmed[..command_end];

    let Some((keyword, mention)) = command
        .strip_prefix('/')
        .and_then(|c| c.split_once('@'))
    else {
        return Some(Cow::Borrowed(text));
    };

    let addressed_to_us = bot_username.is_none_or(|me| mention.eq_ignore_ascii_case(me));
    addressed_to_us.then(|| Cow::Owned(format!("/{keyword}{}", &trimmed[command_end..])))
}
