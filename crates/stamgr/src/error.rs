//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use stamgr_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(stamgr::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Self-signed certificate? Try: stamgr --insecure ..."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(stamgr::tls_error),
        help("Check the ca_cert path in your profile, or use --insecure (-k).")
    )]
    Tls { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(stamgr::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(stamgr::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Store a new password with: stamgr config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(stamgr::no_credentials),
        help(
            "Set a username in the profile (or --username) and a password via\n\
             STAMGR_PASSWORD, `stamgr config set-password`, or the config file."
        )
    )]
    NoCredentials { profile: String },

    // ── Controller ───────────────────────────────────────────────────
    #[error("Controller rejected the request: {message}")]
    #[diagnostic(code(stamgr::rejected))]
    Rejected { code: String, message: String },

    #[error("Controller returned HTTP {status}: {body}")]
    #[diagnostic(code(stamgr::http))]
    Http { status: u16, body: String },

    #[error("Unexpected response from controller: {message}")]
    #[diagnostic(
        code(stamgr::unexpected_response),
        help("Is the host/port pointing at the controller's API port (usually 8443)?")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stamgr::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No controller configured")]
    #[diagnostic(
        code(stamgr::no_config),
        help(
            "Pass --host and --username, or add a profile to the config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found")]
    #[diagnostic(
        code(stamgr::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(stamgr::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {reason}")]
    #[diagnostic(code(stamgr::keyring))]
    Keyring { reason: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a failed login. A controller rejection during login is an
    /// authentication failure; anything else keeps its usual mapping.
    pub fn from_login(err: stamgr_api::Error, profile: &str) -> Self {
        match err {
            stamgr_api::Error::Api { message, .. } => Self::AuthFailed {
                profile: profile.into(),
                message,
            },
            other => other.into(),
        }
    }
}

// ── stamgr_api::Error → CliError ─────────────────────────────────────

impl From<stamgr_api::Error> for CliError {
    fn from(err: stamgr_api::Error) -> Self {
        use stamgr_api::Error as ApiError;

        match err {
            ApiError::Transport(e) if e.is_timeout() => Self::Timeout,
            ApiError::Transport(e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            ApiError::Http { status, body } => Self::Http { status, body },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ApiError::InvalidSite(site) => Self::Validation {
                field: "site".into(),
                reason: format!("'{site}' cannot be used as a site identifier"),
            },
            ApiError::Tls(reason) => Self::Tls { reason },
            ApiError::Deserialization { message, .. } => Self::UnexpectedResponse { message },
            ApiError::Api { code, message } => Self::Rejected { code, message },
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Serialization(e) => Self::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Keyring(e) => Self::Keyring {
                reason: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}
