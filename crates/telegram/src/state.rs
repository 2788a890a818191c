use std::sync::Arc;

use {metamapa_channels::ChannelOutbound, metamapa_commands::Dispatcher};

/// Everything the polling loop needs to answer a message.
#[derive(Clone)]
pub struct BotState {
    pub dispatcher: Dispatcher,
    pub outbound: Arc<dyn ChannelOutbound>,
    /// Username without `@`, used to strip `/cmd@username` suffixes.
    pub bot_username: Option<String>,
}
