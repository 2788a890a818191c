use {async_trait::async_trait, serde::Serialize};

use crate::Result;

// ── Messages ────────────────────────────────────────────────────────────────

/// One inbound text turn from a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomingMessage {
    /// Chat/peer ID the reply must go back to.
    pub conversation_id: String,
    pub text: String,
}

impl IncomingMessage {
    #[must_use]
    pub fn new(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
        }
    }
}

/// A reply addressed to a conversation.
///
/// When `attachment_url` is set the reply is an image attachment and `text`
/// is used as its caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundReply {
    pub conversation_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl OutboundReply {
    #[must_use]
    pub fn text(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
            attachment_url: None,
        }
    }

    #[must_use]
    pub fn attachment(
        conversation_id: impl Into<String>,
        url: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: caption.into(),
            attachment_url: Some(url.into()),
        }
    }

    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.attachment_url.is_some()
    }
}

// ── Outbound ────────────────────────────────────────────────────────────────

/// Send messages to a channel.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Send a markdown-lite text message.
    async fn send_text(&self, to: &str, text: &str) -> Result<()>;

    /// Send an image by URL, optionally captioned.
    async fn send_photo(&self, to: &str, url: &str, caption: Option<&str>) -> Result<()>;

    /// Send a "typing" indicator. No-op by default.
    async fn send_typing(&self, _to: &str) -> Result<()> {
        Ok(())
    }
}
