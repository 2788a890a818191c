//! Ordered command table.
//!
//! Entries are evaluated top to bottom and the first match wins. Commands that
//! take arguments only match when the keyword is followed by whitespace, so a
//! bare `/coleccion` falls through to the unrecognized reply.

use crate::{
    error::{CommandError, Result},
    parse::split_fields,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Start,
    AggregatorMenu,
    SourcesMenu,
    PdiMenu,
    RequestsMenu,
    AllCommands,
    ListCollection,
    ShowFact,
    CreateFact,
    AttachPdi,
    RequestDeletion,
    UpdateRequest,
}

/// How a command consumes the text after its keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No arguments. Matched by plain prefix.
    None,
    /// The whole trimmed remainder is a single argument.
    Rest,
    /// A fixed number of `|`-separated fields.
    Fields(usize),
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: CommandName,
    /// Keyword including the leading slash.
    pub keyword: &'static str,
    pub arity: Arity,
    /// Expected shape, shown on bad usage.
    pub usage: &'static str,
    /// One-line description for client autocomplete.
    pub description: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: CommandName::Start,
        keyword: "/start",
        arity: Arity::None,
        usage: "/start",
        description: "Menú principal",
    },
    CommandSpec {
        name: CommandName::AggregatorMenu,
        keyword: "/agregador",
        arity: Arity::None,
        usage: "/agregador",
        description: "Comandos de listados",
    },
    CommandSpec {
        name: CommandName::SourcesMenu,
        keyword: "/fuente",
        arity: Arity::None,
        usage: "/fuente",
        description: "Comandos de hechos",
    },
    CommandSpec {
        name: CommandName::PdiMenu,
        keyword: "/pdi",
        arity: Arity::None,
        usage: "/pdi",
        description: "Comandos de PDI",
    },
    CommandSpec {
        name: CommandName::RequestsMenu,
        keyword: "/solicitud",
        arity: Arity::None,
        usage: "/solicitud",
        description: "Comandos de solicitudes de borrado",
    },
    CommandSpec {
        name: CommandName::AllCommands,
        keyword: "/todas",
        arity: Arity::None,
        usage: "/todas",
        description: "Ver todos los comandos",
    },
    CommandSpec {
        name: CommandName::ListCollection,
        keyword: "/coleccion",
        arity: Arity::Rest,
        usage: "/coleccion <nombre>",
        description: "Lista los hechos de una colección",
    },
    CommandSpec {
        name: CommandName::ShowFact,
        keyword: "/hecho",
        arity: Arity::Rest,
        usage: "/hecho <id>",
        description: "Muestra el detalle de un hecho",
    },
    CommandSpec {
        name: CommandName::CreateFact,
        keyword: "/agregar_hecho",
        arity: Arity::Fields(3),
        usage: "/agregar_hecho <coleccion> | <titulo> | <descripcion>",
        description: "Crea un hecho",
    },
    CommandSpec {
        name: CommandName::AttachPdi,
        keyword: "/agregar_pdi",
        arity: Arity::Fields(2),
        usage: "/agregar_pdi <hechoId> | <urlImagen>",
        description: "Agrega un PDI a un hecho",
    },
    CommandSpec {
        name: CommandName::RequestDeletion,
        keyword: "/solicitar_borrado",
        arity: Arity::Fields(2),
        usage: "/solicitar_borrado <hechoId> | <motivo>",
        description: "Crea una solicitud de borrado",
    },
    CommandSpec {
        name: CommandName::UpdateRequest,
        keyword: "/cambiar_solicitud",
        arity: Arity::Fields(2),
        usage: "/cambiar_solicitud <solicitudId> | <estado>",
        description: "Cambia el estado de una solicitud",
    },
];

/// A recognized command with its raw arguments, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: CommandName,
    pub raw_args: Vec<String>,
}

impl ParsedCommand {
    /// Argument at `index`, or `""` when absent.
    #[must_use]
    pub fn arg(&self, index: usize) -> &str {
        self.raw_args.get(index).map_or("", String::as_str)
    }
}

impl CommandSpec {
    /// Returns the text after the keyword when `text` selects this command.
    #[must_use]
    pub fn matches<'a>(&self, text: &'a str) -> Option<&'a str> {
        let rest = text.strip_prefix(self.keyword)?;
        match self.arity {
            Arity::None => Some(rest),
            Arity::Rest | Arity::Fields(_) => rest
                .chars()
                .next()
                .is_some_and(char::is_whitespace)
                .then_some(rest),
        }
    }

    /// Extract arguments from the text following the keyword.
    pub fn parse(&self, remainder: &str) -> Result<ParsedCommand> {
        let raw_args = match self.arity {
            Arity::None => Vec::new(),
            Arity::Rest => vec![remainder.trim().to_string()],
            Arity::Fields(n) => split_fields(remainder, n)
                .map_err(|e| CommandError::bad_usage(format!("{e}. Usá `{}`", self.usage)))?,
        };
        Ok(ParsedCommand {
            name: self.name,
            raw_args,
        })
    }

    /// Keyword without the leading slash.
    #[must_use]
    pub fn command(&self) -> &'static str {
        self.keyword.trim_start_matches('/')
    }
}

/// First table entry selected by `text`, with the remaining text.
#[must_use]
pub fn lookup(text: &str) -> Option<(&'static CommandSpec, &str)> {
    COMMANDS
        .iter()
        .find_map(|spec| spec.matches(text).map(|rest| (spec, rest)))
}

/// Spec for a command name.
#[must_use]
pub fn spec(name: CommandName) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Usage string for a command name.
#[must_use]
pub fn usage(name: CommandName) -> &'static str {
    spec(name).map_or("/start", |s| s.usage)
}

/// Recognize `text`: `None` when no command matches, otherwise the parsed
/// command or a bad-usage error.
pub fn recognize(text: &str) -> Option<Result<ParsedCommand>> {
    lookup(text).map(|(spec, rest)| spec.parse(rest))
}
