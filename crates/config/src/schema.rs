//! Config schema types.

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetamapaConfig {
    pub telegram: TelegramConfig,
    pub backends: BackendsConfig,
    pub commands: CommandsConfig,
}

/// Telegram bot account.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Start the bot on `run`. When false the process exits after startup checks.
    pub enabled: bool,

    /// Bot token from @BotFather.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,

    /// Bot username without `@`. Resolved from `getMe` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Publish the command list for client autocomplete on startup.
    pub register_commands: bool,

    /// Long-polling timeout passed to `getUpdates`.
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: None,
            username: None,
            register_commands: true,
            poll_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("enabled", &self.enabled)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .field("register_commands", &self.register_commands)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

/// Base URLs of the MetaMapa services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    pub aggregator_url: String,
    pub sources_url: String,
    pub pdi_url: String,
    pub requests_url: String,
    /// Per-request timeout, connect included.
    pub timeout_secs: u64,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            aggregator_url: String::new(),
            sources_url: String::new(),
            pdi_url: String::new(),
            requests_url: String::new(),
            timeout_secs: 10,
        }
    }
}

impl BackendsConfig {
    /// `(key, value)` pairs for every base URL, in a stable order.
    #[must_use]
    pub fn urls(&self) -> [(&'static str, &str); 4] {
        [
            ("aggregator_url", &self.aggregator_url),
            ("sources_url", &self.sources_url),
            ("pdi_url", &self.pdi_url),
            ("requests_url", &self.requests_url),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Look up images after showing a fact.
    pub fetch_fact_images: bool,
    /// Maximum entries in a collection listing.
    pub list_limit: usize,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            fetch_fact_images: true,
            list_limit: 10,
        }
    }
}

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
