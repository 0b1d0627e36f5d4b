use thiserror::Error;

/// Top-level error type for the `bouncer-api` crate.
///
/// Covers authentication, transport, and backend failures.
/// `bouncer-core` maps these into the domain error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login or refresh rejected by the backend.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A refresh was attempted while no refresh token was held.
    #[error("No refresh token available")]
    NoRefreshToken,

    /// An authorized call was attempted while no access token was held.
    #[error("No access token available -- login required")]
    NotAuthenticated,

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success response from the backend. `message` is the backend's
    /// `message` field when present, else a generic description.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_shows_status_and_backend_message() {
        let err = Error::Api {
            status: 503,
            message: "busy".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): busy");
    }
}
