use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, info, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::MetamapaConfig,
};

/// Standard config file names, checked in order.
pub const CONFIG_FILENAMES: &[&str] = &[
    "metamapa.toml",
    "metamapa.yaml",
    "metamapa.yml",
    "metamapa.json",
];

/// Environment variables that override file values, applied after loading.
pub const ENV_TELEGRAM_TOKEN: &str = "METAMAPA_TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_USERNAME: &str = "METAMAPA_TELEGRAM_USERNAME";
pub const ENV_AGGREGATOR_URL: &str = "METAMAPA_AGGREGATOR_URL";
pub const ENV_SOURCES_URL: &str = "METAMAPA_SOURCES_URL";
pub const ENV_PDI_URL: &str = "METAMAPA_PDI_URL";
pub const ENV_REQUESTS_URL: &str = "METAMAPA_REQUESTS_URL";

/// A config together with the file it came from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: MetamapaConfig,
    pub path: Option<PathBuf>,
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<MetamapaConfig> {
    let raw = read(path)?;
    parse_config(&substitute_env(&raw), path)
}

/// Parse `path` into a generic JSON value after env substitution.
pub fn load_config_value(path: &Path) -> Result<serde_json::Value> {
    let raw = read(path)?;
    parse_config_value(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./metamapa.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/metamapa/metamapa.{toml,yaml,yml,json}` (user-global)
///
/// Returns `MetamapaConfig::default()` if no usable config file is found.
pub fn discover_and_load() -> LoadedConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return LoadedConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(config) => LoadedConfig {
            config,
            path: Some(path),
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            LoadedConfig {
                config: MetamapaConfig::default(),
                path: Some(path),
            }
        },
    }
}

/// Load `explicit` when given (errors propagate), otherwise discover. Env
/// overrides are applied in both cases.
pub fn load_or_discover(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let mut loaded = match explicit {
        Some(path) => LoadedConfig {
            config: load_config(path)?,
            path: Some(path.to_path_buf()),
        },
        None => discover_and_load(),
    };
    apply_env_overrides(&mut loaded.config);
    if let Some(ref path) = loaded.path {
        info!(path = %path.display(), "config loaded");
    }
    Ok(loaded)
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    find_config_in(Path::new("."))
        .or_else(|| config_dir().and_then(|dir| find_config_in(&dir)))
}

/// First of [`CONFIG_FILENAMES`] that exists in `dir`.
pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/metamapa/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "metamapa").map(|d| d.config_dir().to_path_buf())
}

/// Apply `METAMAPA_*` overrides from the process environment.
pub fn apply_env_overrides(config: &mut MetamapaConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// Apply overrides using a custom lookup. Blank values are ignored.
pub fn apply_env_overrides_with(
    config: &mut MetamapaConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = get(ENV_TELEGRAM_TOKEN) {
        config.telegram.token = Some(Secret::new(token));
    }
    if let Some(username) = get(ENV_TELEGRAM_USERNAME) {
        config.telegram.username = Some(username.trim_start_matches('@').to_string());
    }

    let backends = &mut config.backends;
    for (name, slot) in [
        (ENV_AGGREGATOR_URL, &mut backends.aggregator_url),
        (ENV_SOURCES_URL, &mut backends.sources_url),
        (ENV_PDI_URL, &mut backends.pdi_url),
        (ENV_REQUESTS_URL, &mut backends.requests_url),
    ] {
        if let Some(url) = get(name) {
            debug!(var = name, "backend url overridden from environment");
            *slot = url;
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("toml")
}

fn parse_config(raw: &str, path: &Path) -> Result<MetamapaConfig> {
    match extension(path) {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        ext => Err(Error::UnsupportedFormat { ext: ext.into() }),
    }
}

fn parse_config_value(raw: &str, path: &Path) -> Result<serde_json::Value> {
    match extension(path) {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        ext => Err(Error::UnsupportedFormat { ext: ext.into() }),
    }
}
