//! `metamapa dispatch`: answer one message locally, without Telegram.

use std::io::{self, Write};

use {
    anyhow::Result,
    metamapa_channels::{IncomingMessage, OutboundReply},
    metamapa_config::{MetamapaConfig, validate},
    tracing::warn,
};

use crate::run_commands::build_dispatcher;

pub async fn handle_dispatch(config: &MetamapaConfig, conversation: &str, text: &str) -> Result<()> {
    let mut diagnostics = Vec::new();
    validate::check_values(config, &mut diagnostics);
    for d in diagnostics.iter().filter(|d| !d.path.starts_with("telegram.")) {
        warn!(path = %d.path, "{}", d.message);
    }

    let dispatcher = build_dispatcher(config)?;
    let replies = dispatcher
        .handle(&IncomingMessage::new(conversation, text))
        .await;

    print_replies(&mut io::stdout().lock(), &replies)?;
    Ok(())
}

/// Text replies verbatim, attachments as `[imagen] <url>` lines.
fn print_replies(out: &mut impl Write, replies: &[OutboundReply]) -> io::Result<()> {
    for reply in replies {
        match reply.attachment_url.as_deref() {
            Some(url) if reply.text.is_empty() => writeln!(out, "[imagen] {url}")?,
            Some(url) => writeln!(out, "[imagen] {url} ({})", reply.text)?,
            None => writeln!(out, "{}", reply.text)?,
        }
    }
    Ok(())
}
