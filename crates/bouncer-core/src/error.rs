// ── Core error types ──
//
// User-facing errors from bouncer-core. Consumers never see raw reqwest
// errors or JSON parse failures; the `From<bouncer_api::Error>` impl folds
// transport-layer errors into the domain taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Not authenticated -- login required")]
    NotAuthenticated,

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Device is in a state that cannot be toggled: {status}")]
    NotToggleable { status: String },

    #[error("Device details have not been loaded")]
    NotReady,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    /// Backend rejection or unreadable response. Network failures are not
    /// folded in here: connect errors surface as [`CoreError::ConnectionFailed`]
    /// and timeouts as [`CoreError::Timeout`], so match all three to catch
    /// every failed call.
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out: {reason}")]
    Timeout { reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bouncer_api::Error> for CoreError {
    fn from(err: bouncer_api::Error) -> Self {
        match err {
            bouncer_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            bouncer_api::Error::NoRefreshToken => CoreError::NoRefreshToken,
            bouncer_api::Error::NotAuthenticated => CoreError::NotAuthenticated,
            bouncer_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            bouncer_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout {
                        reason: e.to_string(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            bouncer_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            bouncer_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            bouncer_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response: {message}"),
                status: None,
            },
        }
    }
}
