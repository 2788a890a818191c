//! Configuration loading, env substitution, env overrides and validation.
//!
//! Config files: `metamapa.toml`, `metamapa.yaml`, `metamapa.yml` or
//! `metamapa.json`, searched in `./` then `~/.config/metamapa/`.
//!
//! Supports `${ENV_VAR}` substitution in the raw file text.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        LoadedConfig, apply_env_overrides, config_dir, discover_and_load, load_config,
        load_or_discover,
    },
    schema::{BackendsConfig, CommandsConfig, MetamapaConfig, TelegramConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
