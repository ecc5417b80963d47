use thiserror::Error;

/// Top-level error type for the `stamgr-api` crate.
///
/// Two classes of failure exist: the transport could not produce a usable
/// JSON body (connection, TLS, HTTP status, malformed body), or the
/// controller answered with an envelope whose `meta.rc` is not `"ok"`.
/// Use [`Error::is_transport`] / [`Error::is_api`] to branch on the class.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS handshake, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response whose body was not a JSON envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// URL construction failed (bad host or site identifier).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Site identifier that cannot name a path segment (empty, `.` or `..`).
    #[error("Invalid site identifier: {0:?}")]
    InvalidSite(String),

    /// The HTTP client could not be built with the requested TLS policy.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Response body was not JSON, or not shaped like an envelope.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Controller ──────────────────────────────────────────────────
    /// The controller reported a failure in the `{meta: {rc, msg}}` envelope.
    ///
    /// `message` is the controller's `meta.msg` verbatim.
    #[error("{message}")]
    Api { code: String, message: String },
}

impl Error {
    /// Returns `true` for failures raised below the envelope layer.
    pub fn is_transport(&self) -> bool {
        !self.is_api()
    }

    /// Returns `true` if the controller explicitly rejected the call.
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// The controller's message, for [`Error::Api`] only.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns `true` if the transport failed to reach the controller at all.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_controller_message_verbatim() {
        let err = Error::Api {
            code: "error".into(),
            message: "api.err.Invalid".into(),
        };
        assert_eq!(err.to_string(), "api.err.Invalid");
        assert!(err.is_api());
        assert!(!err.is_transport());
        assert_eq!(err.api_message(), Some("api.err.Invalid"));
    }

    #[test]
    fn deserialization_is_transport_class() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert!(err.is_transport());
        assert_eq!(err.api_message(), None);
        assert!(!err.is_connect());
    }
}
