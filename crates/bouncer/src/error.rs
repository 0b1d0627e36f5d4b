//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use bouncer_config::ConfigError;
use bouncer_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const NOT_TOGGLEABLE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(bouncer::connection_failed),
        help(
            "Check the backend URL and your network.\n\
             Reason: {reason}\n\
             For a self-signed certificate, try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(bouncer::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.\n{reason}")
    )]
    Timeout { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(bouncer::auth_failed),
        help("Verify the email and password for this profile, or set BOUNCER_PASSWORD.")
    )]
    AuthFailed { message: String },

    #[error("Session expired")]
    #[diagnostic(code(bouncer::session_expired), help("Run the command again to log in."))]
    SessionExpired,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(bouncer::no_credentials),
        help(
            "Set email and password (or password_env) in the profile,\n\
             or export BOUNCER_EMAIL and BOUNCER_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(bouncer::not_found),
        help("Run: bouncer devices to see the devices on this account")
    )]
    NotFound { identifier: String },

    #[error("Device cannot be toggled while it shows {status}")]
    #[diagnostic(
        code(bouncer::not_toggleable),
        help("Only BLOCK and UNBLOCK states can be toggled. Run: bouncer legend")
    )]
    NotToggleable { status: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map_or_else(String::new, |s| format!(" (HTTP {s})")))]
    #[diagnostic(code(bouncer::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bouncer::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bouncer::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No {field} configured for profile '{profile}'")]
    #[diagnostic(
        code(bouncer::missing_setting),
        help(
            "Set {field} in the profile, or pass it on the command line.\n\
             Config file: {path}"
        )
    )]
    MissingSetting {
        field: String,
        profile: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(bouncer::config))]
    Config(Box<figment::Error>),

    #[error("failed to render config: {0}")]
    #[diagnostic(code(bouncer::config))]
    Serialization(#[from] toml::ser::Error),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(bouncer::internal))]
    Internal(String),
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
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::SessionExpired | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::NotToggleable { .. } => exit_code::NOT_TOGGLEABLE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout { reason } => CliError::Timeout { reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NoRefreshToken | CoreError::NotAuthenticated => CliError::SessionExpired,
            CoreError::DeviceNotFound { identifier } => CliError::NotFound { identifier },
            CoreError::NotToggleable { status } => CliError::NotToggleable { status },
            CoreError::Api { message, status } => CliError::ApiError { status, message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::NotReady => CliError::Internal(err.to_string()),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Missing { field, profile } => CliError::MissingSetting {
                field,
                profile,
                path: bouncer_config::config_path().display().to_string(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
        }
    }
}
