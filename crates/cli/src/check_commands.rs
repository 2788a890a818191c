//! `metamapa check`: config validation report.
//!
//! Prints one section per config area with `[ok]`, `[warn]`, `[fail]` or
//! `[info]` per item, then a summary. Exits non-zero when anything failed.

use {
    anyhow::{Result, bail},
    metamapa_config::{
        LoadedConfig,
        validate::{self, Diagnostic, Severity},
    },
};

// ── ANSI helpers ────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
    Info,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Fail => "fail",
            Self::Info => "info",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Ok => GREEN,
            Self::Warn => YELLOW,
            Self::Fail => RED,
            Self::Info => CYAN,
        }
    }
}

impl From<Severity> for Status {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Self::Fail,
            Severity::Warning => Self::Warn,
            Severity::Info => Self::Info,
        }
    }
}

struct CheckItem {
    status: Status,
    message: String,
}

struct Section {
    title: &'static str,
    items: Vec<CheckItem>,
}

/// Sections in print order, keyed by the first segment of a diagnostic path.
const SECTIONS: &[(&str, &str)] = &[
    ("", "Config file"),
    ("telegram", "Telegram"),
    ("backends", "Backends"),
    ("commands", "Commands"),
];

fn section_key(path: &str) -> &str {
    let head = path.split('.').next().unwrap_or_default();
    SECTIONS
        .iter()
        .find(|(key, _)| *key == head)
        .map_or("", |(key, _)| *key)
}

fn build_sections(loaded: &LoadedConfig, diagnostics: &[Diagnostic]) -> Vec<Section> {
    SECTIONS
        .iter()
        .map(|&(key, title)| {
            let mut items: Vec<CheckItem> = diagnostics
                .iter()
                .filter(|d| section_key(&d.path) == key)
                .map(|d| CheckItem {
                    status: d.severity.into(),
                    message: if d.path.is_empty() {
                        d.message.clone()
                    } else {
                        format!("{}: {}", d.path, d.message)
                    },
                })
                .collect();

            if key.is_empty()
                && let Some(path) = &loaded.path
            {
                items.insert(0, CheckItem {
                    status: Status::Info,
                    message: format!("using {}", path.display()),
                });
            }
            if key == "telegram" && !loaded.config.telegram.enabled {
                items.push(CheckItem {
                    status: Status::Info,
                    message: "bot disabled; `metamapa run` will exit immediately".into(),
                });
            }
            if !items.iter().any(|i| matches!(i.status, Status::Warn | Status::Fail)) {
                items.push(CheckItem {
                    status: Status::Ok,
                    message: "no problems found".into(),
                });
            }

            Section { title, items }
        })
        .collect()
}

// ── Printing ────────────────────────────────────────────────────────────────

fn print_report(sections: &[Section]) -> (usize, usize) {
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for section in sections {
        eprintln!("{BOLD}{}{RESET}", section.title);
        for item in &section.items {
            let color = item.status.color();
            let label = item.status.label();
            eprintln!("  [{color}{label}{RESET}]  {}", item.message);
            match item.status {
                Status::Fail => errors += 1,
                Status::Warn => warnings += 1,
                _ => {},
            }
        }
        eprintln!();
    }

    (errors, warnings)
}

// ── Entry point ─────────────────────────────────────────────────────────────

pub fn handle_check(loaded: &LoadedConfig) -> Result<()> {
    eprintln!("{BOLD}metamapa check{RESET}");
    eprintln!("{BOLD}=============={RESET}\n");

    let result = validate::validate(&loaded.config, loaded.path.as_deref());
    let (errors, warnings) = print_report(&build_sections(loaded, &result.diagnostics));

    eprintln!("{BOLD}Summary:{RESET} {errors} error(s), {warnings} warning(s)");

    if errors > 0 {
        bail!("configuration check failed with {errors} error(s)");
    }
    Ok(())
}
