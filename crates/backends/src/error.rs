use std::error::Error as StdError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The backend answered with a non-success status.
    #[error("{backend} returned HTTP {status}: {body}")]
    Http {
        backend: &'static str,
        status: u16,
        body: String,
    },

    /// The backend could not be reached or did not answer in time.
    #[error("{context}: {source}")]
    Unreachable {
        context: String,
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a body that is not the expected JSON shape.
    #[error("{context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Classify a transport-level `reqwest` failure.
    ///
    /// Errors that carry no HTTP status (connect, timeout, body read) mean the
    /// backend was unreachable; request-building errors are local.
    #[must_use]
    pub fn from_transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_builder() {
            return Self::external(context, source);
        }
        Self::Unreachable {
            context: context.into(),
            timed_out: source.is_timeout(),
            source,
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}
