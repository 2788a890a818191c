use {
    async_trait::async_trait,
    teloxide::{
        ApiError, RequestError,
        payloads::{SendMessageSetters, SendPhotoSetters},
        prelude::*,
        types::{ChatAction, ChatId, InputFile, ParseMode},
    },
    tracing::{debug, info, warn},
};

use metamapa_channels::{ChannelOutbound, Error, Result};

use crate::chunk::{self, TELEGRAM_CAPTION_LIMIT, TELEGRAM_MAX_MESSAGE_LEN};

/// Replies are written for Telegram's legacy Markdown.
#[allow(deprecated)]
const REPLY_PARSE_MODE: ParseMode = ParseMode::Markdown;

/// Outbound message sender for Telegram.
///
/// Every request is sent once. The only second attempt is the plain-text
/// resend of a chunk whose markup Telegram refused to parse.
#[derive(Debug, Clone)]
pub struct TelegramOutbound {
    bot: Bot,
}

impl TelegramOutbound {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Send one chunk as Markdown, resending it as plain text if Telegram
    /// rejects the markup.
    async fn send_chunk_with_fallback(
        &self,
        to: &str,
        chat_id: ChatId,
        chunk: &str,
    ) -> std::result::Result<(), RequestError> {
        let markdown = self
            .bot
            .send_message(chat_id, chunk)
            .parse_mode(REPLY_PARSE_MODE)
            .await;

        match markdown {
            Ok(_) => Ok(()),
            Err(e) if is_markup_rejection(&e) => {
                warn!(
                    chat_id = to,
                    error = %e,
                    "telegram rejected markdown, resending as plain text"
                );
                self.bot.send_message(chat_id, chunk).await.map(|_| ())
            },
            Err(e) => Err(e),
        }
    }
}

fn is_markup_rejection(error: &RequestError) -> bool {
    matches!(error, RequestError::Api(ApiError::CantParseEntities(_)))
}

fn parse_chat_id(to: &str) -> Result<ChatId> {
    Ok(ChatId(to.parse::<i64>()?))
}

#[async_trait]
impl ChannelOutbound for TelegramOutbound {
    async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let chat_id = parse_chat_id(to)?;
        let chunks = chunk::chunk_message(text, TELEGRAM_MAX_MESSAGE_LEN);

        for chunk in &chunks {
            self.send_chunk_with_fallback(to, chat_id, chunk)
                .await
                .map_err(|e| Error::external("telegram send message", e))?;
        }

        info!(
            chat_id = to,
            text_len = text.len(),
            chunk_count = chunks.len(),
            "telegram outbound text sent"
        );
        Ok(())
    }

    async fn send_photo(&self, to: &str, url: &str, caption: Option<&str>) -> Result<()> {
        let chat_id = parse_chat_id(to)?;
        let photo_url =
            url::Url::parse(url).map_err(|e| Error::invalid_input(format!("{url}: {e}")))?;

        let mut req = self.bot.send_photo(chat_id, InputFile::url(photo_url));
        if let Some(caption) = caption {
            req = req.caption(chunk::truncate_at_char_boundary(
                caption,
                TELEGRAM_CAPTION_LIMIT,
            ));
        }
        req.await
            .map_err(|e| Error::external("telegram send photo", e))?;

        debug!(chat_id = to, url, "telegram outbound photo sent");
        Ok(())
    }

    async fn send_typing(&self, to: &str) -> Result<()> {
        let chat_id = parse_chat_id(to)?;
        self.bot
            .send_chat_action(chat_id, ChatAction::Typing)
            .await
            .map_err(|e| Error::external("telegram send chat action", e))?;
        Ok(())
    }
}
