//! Rendering of [`CommandResult`]s into Telegram legacy-Markdown replies.

use {
    metamapa_channels::OutboundReply,
    std::fmt::Write as _,
};

use crate::{
    error::CommandError,
    handlers::PENDING_STATUS,
    registry::{Arity, COMMANDS, CommandName},
    result::{Absent, CommandResult, Outcome},
};

/// Caption attached to image replies.
pub const IMAGE_CAPTION: &str = "🖼️ PDI";

/// Fact lists show at most this many entries by default.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Characters with markup meaning in legacy Markdown.
const MARKUP_CHARS: [char; 3] = ['*', '_', '`'];

/// Upstream error bodies longer than this are cut.
const MAX_ERROR_BODY_CHARS: usize = 1500;

const FALLBACK_STATUS: &str = "activo";
const FALLBACK_DESCRIPTION: &str = "—";
const UNTITLED: &str = "(sin título)";

const UNRECOGNIZED: &str = "🤔 No entendí ese comando. Probá `/start` para ver el menú.";

const WELCOME: &str = "🤖 *¡Bienvenido a MetaMapa!* 📍

Elegí una sección para ver sus comandos:
• `/agregador`  🗂️  Listados
• `/fuente`     📰  Hechos
• `/pdi`        🖼️  Agregar PDI a Hechos
• `/solicitud`  🧹  Solicitudes de borrado
• `/todas`      📚  Ver todo el menú

_Tip:_ usá la barra `/` para autocompletar comandos.";

/// Escape markup characters so user or backend text renders literally.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKUP_CHARS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Text placed inside an inline code span. Escapes do not work there, so
/// backticks are replaced instead.
fn code(text: &str) -> String {
    text.replace('`', "'")
}

/// Display indicator for a status value, case-insensitive.
#[must_use]
pub fn status_indicator(status: &str) -> &'static str {
    match status.trim().to_lowercase().as_str() {
        "" => "⚪",
        "activo" => "🟢",
        "pendiente" => "🟡",
        "borrado" | "rechazado" => "🔴",
        _ => "🔵",
    }
}

/// Whether `value` is an absolute `http`/`https` URL that can be sent as an image.
#[must_use]
pub fn is_renderable_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(default)
}

fn menu(name: CommandName) -> String {
    let (header, members): (&str, &[CommandName]) = match name {
        CommandName::AggregatorMenu => ("🗂️ *Agregador* — comandos:", &[
            CommandName::ListCollection,
        ]),
        CommandName::SourcesMenu => ("📰 *Fuente* — comandos:", &[
            CommandName::ShowFact,
            CommandName::CreateFact,
        ]),
        CommandName::PdiMenu => ("🖼️ *PDI* — comandos:", &[CommandName::AttachPdi]),
        CommandName::RequestsMenu => ("🧹 *Solicitudes* — comandos:", &[
            CommandName::RequestDeletion,
            CommandName::UpdateRequest,
        ]),
        CommandName::AllCommands => {
            let mut out = String::from("📚 *Todos los comandos:*");
            for spec in COMMANDS
                .iter()
                .filter(|s| s.arity != Arity::None)
            {
                let _ = write!(out, "\n• `{}`", spec.usage);
            }
            return out;
        },
        _ => return WELCOME.to_string(),
    };

    let mut out = header.to_string();
    for spec in COMMANDS.iter().filter(|s| members.contains(&s.name)) {
        let _ = write!(out, "\n• `{}` — {}", spec.usage, spec.description);
    }
    out
}

fn render_outcome(outcome: &Outcome, list_limit: usize) -> String {
    match outcome {
        Outcome::Menu(name) => menu(*name),
        Outcome::Unrecognized => UNRECOGNIZED.to_string(),
        Outcome::FactList { collection, facts } => {
            let mut out = format!("🗂️ *Hechos en* _{}_", escape_markdown(collection));
            for fact in facts.iter().take(list_limit) {
                let _ = write!(
                    out,
                    "\n• `{}` · {}",
                    code(or_default(fact.id.as_deref(), "?")),
                    escape_markdown(or_default(fact.titulo.as_deref(), UNTITLED))
                );
            }
            if facts.len() > list_limit {
                let _ = write!(out, "\n… y {} más", facts.len() - list_limit);
            }
            out
        },
        Outcome::FactDetail { fact, .. } => {
            let status = or_default(fact.estado.as_deref(), FALLBACK_STATUS);
            format!(
                "📰 *{}*\nEstado: {} `{}`\nDescripción: {}",
                escape_markdown(or_default(fact.titulo.as_deref(), UNTITLED)),
                status_indicator(status),
                code(status),
                escape_markdown(or_default(fact.descripcion.as_deref(), FALLBACK_DESCRIPTION)),
            )
        },
        Outcome::FactCreated { id: Some(id) } => format!(
            "✅ *Hecho creado*: `{id}`\n_Sugerencia:_ probá `/hecho {id}`",
            id = code(id)
        ),
        Outcome::FactCreated { id: None } => "⚠️ Hecho creado, pero no recibí un `id`.".into(),
        Outcome::PdiCreated { id: Some(id), .. } => format!("🖼️ *PDI creado*: `{}`", code(id)),
        Outcome::PdiCreated { id: None, .. } => "⚠️ PDI creado, pero no recibí un `id`.".into(),
        Outcome::DeletionRequested {
            id: Some(id),
            status,
        } => format!(
            "📬 *Solicitud creada*: `{}` · estado: `{}`",
            code(id),
            code(or_default(status.as_deref(), PENDING_STATUS))
        ),
        Outcome::DeletionRequested { id: None, .. } => {
            "⚠️ Solicitud creada, pero no recibí un `id`.".into()
        },
        Outcome::RequestUpdated { id, status } => format!(
            "🔁 *Solicitud* `{}` → estado: `{}`",
            code(id),
            code(status)
        ),
    }
}

fn render_absent(absent: &Absent) -> String {
    match absent {
        Absent::Collection { name } => {
            format!("🗂️ *{}* no tiene hechos cargados.", escape_markdown(name))
        },
        Absent::Fact { id } => format!("🔎 No encontré el hecho `{}`.", code(id)),
    }
}

fn render_failure(err: &CommandError) -> String {
    match err {
        CommandError::BadUsage { usage } => format!("⚠️ *Uso inválido:* {usage}"),
        CommandError::UpstreamHttp { status, body } => {
            let body = body.trim();
            let body = if body.is_empty() {
                "(sin cuerpo)".to_string()
            } else if body.chars().count() > MAX_ERROR_BODY_CHARS {
                let cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
                format!("{cut}…")
            } else {
                body.to_string()
            };
            format!("⚠️ *HTTP {status}*\n```\n{}\n```", code(&body))
        },
        CommandError::UpstreamUnreachable {
            detail,
            timed_out: true,
        } => format!("⏱️ *Tiempo de espera agotado:* {}", escape_markdown(detail)),
        CommandError::UpstreamUnreachable { detail, .. } => {
            format!("📡 *Servicio no disponible:* {}", escape_markdown(detail))
        },
        CommandError::Unknown { detail } => format!("❌ *Error:* {}", escape_markdown(detail)),
    }
}

/// Render the text reply for a result.
#[must_use]
pub fn render(result: &CommandResult, list_limit: usize) -> String {
    match result {
        CommandResult::Success(outcome) => render_outcome(outcome, list_limit),
        CommandResult::Empty(absent) => render_absent(absent),
        CommandResult::Failure(err) => render_failure(err),
    }
}

/// Image URLs to send after the text reply. Non-URL contents are skipped.
#[must_use]
pub fn attachments(result: &CommandResult) -> Vec<String> {
    match result {
        CommandResult::Success(Outcome::FactDetail { images, .. }) => images
            .iter()
            .filter_map(|pdi| pdi.contenido.as_deref())
            .filter(|c| is_renderable_url(c))
            .map(|c| c.trim().to_string())
            .collect(),
        CommandResult::Success(Outcome::PdiCreated { content, .. }) if is_renderable_url(content) => {
            vec![content.trim().to_string()]
        },
        _ => Vec::new(),
    }
}

/// The text reply followed by one attachment-only reply per image.
#[must_use]
pub fn replies(conversation_id: &str, result: &CommandResult, list_limit: usize) -> Vec<OutboundReply> {
    let mut out = vec![OutboundReply::text(conversation_id, render(result, list_limit))];
    out.extend(
        attachments(result)
            .into_iter()
            .map(|url| OutboundReply::attachment(conversation_id, url, IMAGE_CAPTION)),
    );
    out
}
