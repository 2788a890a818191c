use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommandError>;

/// Failure taxonomy surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Local validation failed (arity, blank required field).
    BadUsage,
    /// A backend answered with a non-success status.
    UpstreamHttpError,
    /// A backend could not be reached or timed out.
    UpstreamUnreachable,
    Unknown,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadUsage => "bad_usage",
            Self::UpstreamHttpError => "upstream_http_error",
            Self::UpstreamUnreachable => "upstream_unreachable",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// `usage` names the exact expected argument shape.
    #[error("{usage}")]
    BadUsage { usage: String },

    #[error("HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("{detail}")]
    UpstreamUnreachable { detail: String, timed_out: bool },

    #[error("{detail}")]
    Unknown { detail: String },
}

impl CommandError {
    #[must_use]
    pub fn bad_usage(usage: impl Into<String>) -> Self {
        Self::BadUsage {
            usage: usage.into(),
        }
    }

    #[must_use]
    pub fn unknown(detail: impl std::fmt::Display) -> Self {
        Self::Unknown {
            detail: detail.to_string(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::BadUsage { .. } => FailureKind::BadUsage,
            Self::UpstreamHttp { .. } => FailureKind::UpstreamHttpError,
            Self::UpstreamUnreachable { .. } => FailureKind::UpstreamUnreachable,
            Self::Unknown { .. } => FailureKind::Unknown,
        }
    }
}

impl From<metamapa_backends::Error> for CommandError {
    fn from(err: metamapa_backends::Error) -> Self {
        use metamapa_backends::Error as Backend;

        match err {
            Backend::Http { status, body, .. } => Self::UpstreamHttp { status, body },
            Backend::Unreachable { timed_out, .. } => Self::UpstreamUnreachable {
                detail: err.to_string(),
                timed_out,
            },
            other => Self::unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_maps_to_upstream_http() {
        let err = CommandError::from(metamapa_backends::Error::Http {
            backend: "aggregator",
            status: 404,
            body: "missing".into(),
        });
        assert_eq!(err.kind(), FailureKind::UpstreamHttpError);
        assert_eq!(err.to_string(), "HTTP 404: missing");
    }

    #[test]
    fn other_backend_errors_map_to_unknown() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CommandError::from(metamapa_backends::Error::Decode {
            context: "failed to parse sources POST /hechos response".into(),
            source,
        });
        assert_eq!(err.kind(), FailureKind::Unknown);
        assert!(err.to_string().contains("failed to parse"));
    }
}
