//! Configuration validation.
//!
//! Two passes: the raw file is checked for syntax and unknown keys, then the
//! loaded config (after env overrides) is checked for values the bot cannot
//! run with.

use std::path::{Path, PathBuf};

use {secrecy::ExposeSecret, serde_json::Value};

use crate::{env_subst::unresolved_placeholders, loader, schema::MetamapaConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "missing", "invalid-value", "env"
    pub category: &'static str,
    /// Dotted path, e.g. "backends.pdi_url"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.severity, self.message)
        } else {
            write!(f, "{} [{}]: {}", self.severity, self.path, self.message)
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Validate an effective config, plus its source file when there is one.
#[must_use]
pub fn validate(config: &MetamapaConfig, path: Option<&Path>) -> ValidationResult {
    let mut diagnostics = match path {
        Some(p) => check_file(p),
        None => vec![Diagnostic::new(
            Severity::Info,
            "file-ref",
            "",
            "no config file found; using defaults and environment",
        )],
    };
    check_values(config, &mut diagnostics);

    ValidationResult {
        diagnostics,
        config_path: path.map(Path::to_path_buf),
    }
}

/// Syntax and unknown-key checks on a config file.
#[must_use]
pub fn check_file(path: &Path) -> Vec<Diagnostic> {
    let value = match loader::load_config_value(path) {
        Ok(v) => v,
        Err(e) => return vec![Diagnostic::new(Severity::Error, "syntax", "", e.to_string())],
    };

    let mut diagnostics = Vec::new();
    check_unknown_fields(&value, &mut diagnostics);
    if let Err(e) = serde_json::from_value::<MetamapaConfig>(value) {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        ));
    }
    diagnostics
}

const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("telegram", &[
        "enabled",
        "token",
        "username",
        "register_commands",
        "poll_timeout_secs",
    ]),
    ("backends", &[
        "aggregator_url",
        "sources_url",
        "pdi_url",
        "requests_url",
        "timeout_secs",
    ]),
    ("commands", &["fetch_fact_images", "list_limit"]),
];

fn check_unknown_fields(value: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(root) = value.as_object() else {
        return;
    };

    for (section, body) in root {
        let Some((_, fields)) = KNOWN_KEYS.iter().find(|(name, _)| name == section) else {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "unknown-field",
                section.as_str(),
                format!("unknown section `{section}`"),
            ));
            continue;
        };
        let Some(body) = body.as_object() else {
            continue;
        };
        for key in body.keys().filter(|k| !fields.contains(&k.as_str())) {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "unknown-field",
                format!("{section}.{key}"),
                format!("unknown field `{key}`"),
            ));
        }
    }
}

/// Semantic checks on the effective config.
pub fn check_values(config: &MetamapaConfig, diagnostics: &mut Vec<Diagnostic>) {
    let telegram = &config.telegram;
    if telegram.enabled {
        match telegram.token.as_ref().map(|t| t.expose_secret().trim()) {
            None | Some("") => diagnostics.push(Diagnostic::new(
                Severity::Error,
                "missing",
                "telegram.token",
                "telegram is enabled but no bot token is configured (set METAMAPA_TELEGRAM_TOKEN)",
            )),
            Some(token) if !unresolved_placeholders(token).is_empty() => {
                diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    "env",
                    "telegram.token",
                    "bot token references an unset environment variable",
                ));
            },
            Some(_) => {},
        }
        if telegram.poll_timeout_secs == 0 {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "invalid-value",
                "telegram.poll_timeout_secs",
                "0 disables long polling and makes the bot poll continuously",
            ));
        }
    }

    for (key, url) in config.backends.urls() {
        let path = format!("backends.{key}");
        let url = url.trim();
        if url.is_empty() {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "missing",
                path,
                "backend base URL is not configured",
            ));
            continue;
        }
        if let Some(var) = unresolved_placeholders(url).first() {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "env",
                path,
                format!("references unset environment variable `{var}`"),
            ));
            continue;
        }
        match url::Url::parse(url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => {},
            Ok(u) => diagnostics.push(Diagnostic::new(
                Severity::Error,
                "invalid-value",
                path,
                format!("unsupported scheme `{}`; use http or https", u.scheme()),
            )),
            Err(e) => diagnostics.push(Diagnostic::new(
                Severity::Error,
                "invalid-value",
                path,
                format!("invalid URL `{url}`: {e}"),
            )),
        }
    }

    if config.backends.timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "invalid-value",
            "backends.timeout_secs",
            "timeout must be at least 1 second",
        ));
    }

    if config.commands.list_limit == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "invalid-value",
            "commands.list_limit",
            "list limit must be at least 1",
        ));
    }
}
