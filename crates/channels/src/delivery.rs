//! Second stage of message processing: hand computed replies to a channel.
//!
//! Failures here never propagate. A failed text send is logged and the next
//! reply is attempted; a failed image send is reported to the conversation as
//! a short warning instead of being retried.

use tracing::{debug, warn};

use crate::plugin::{ChannelOutbound, OutboundReply};

/// Prefix of the text sent when an image attachment cannot be delivered.
pub const IMAGE_SEND_FAILED_PREFIX: &str = "⚠️ No pude enviar la imagen: ";

/// Outcome counters for one [`deliver`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

/// Deliver `replies` in order through `outbound`.
pub async fn deliver(outbound: &dyn ChannelOutbound, replies: &[OutboundReply]) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for reply in replies {
        let to = reply.conversation_id.as_str();
        match reply.attachment_url.as_deref() {
            None => match outbound.send_text(to, &reply.text).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(chat_id = to, error = %e, "failed to send reply text");
                    report.failed += 1;
                },
            },
            Some(url) => {
                let caption = (!reply.text.is_empty()).then_some(reply.text.as_str());
                match outbound.send_photo(to, url, caption).await {
                    Ok(()) => {
                        debug!(chat_id = to, url, "sent image attachment");
                        report.sent += 1;
                    },
                    Err(e) => {
                        warn!(chat_id = to, url, error = %e, "failed to send image attachment");
                        report.failed += 1;
                        let notice = format!("{IMAGE_SEND_FAILED_PREFIX}{e}");
                        if let Err(e) = outbound.send_text(to, &notice).await {
                            warn!(chat_id = to, error = %e, "failed to report image send failure");
                        }
                    },
                }
            },
        }
    }

    report
}
