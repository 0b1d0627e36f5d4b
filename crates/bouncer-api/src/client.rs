// Device API HTTP client
//
// Wraps `reqwest::Client` with endpoint construction, payload envelope
// unwrapping, and bearer authorization drawn from the shared session.
// Authorized calls that come back `401` trigger one refresh and exactly one
// retry; the bound is an explicit loop counter, not recursion.

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::auth::LoginCredentials;
use crate::error::Error;
use crate::models::{Envelope, ErrorBody, UserDeviceEntry};
use crate::session::SessionManager;
use crate::transport::{TransportConfig, join_endpoint};

/// Retries allowed after a `401`, each preceded by a token refresh.
const MAX_AUTH_RETRIES: u32 = 1;

/// Fallback when an error response carries no `message`.
const GENERIC_API_ERROR: &str = "API error occurred";

/// Lock command accepted by `PUT /tcp-device/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    Block,
    Unblock,
}

impl DeviceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Unblock => "unblock",
        }
    }
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw HTTP client for the device-management backend.
///
/// All device methods require an authenticated [`SessionManager`]; they
/// fail with [`Error::NotAuthenticated`] rather than logging in implicitly.
pub struct BouncerClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionManager>,
}

impl BouncerClient {
    /// Create a client (and its session) from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        credentials: LoginCredentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: LoginCredentials) -> Self {
        let session = Arc::new(SessionManager::new(
            http.clone(),
            base_url.clone(),
            credentials,
        ));
        Self {
            http,
            base_url,
            session,
        }
    }

    /// The session shared by every call on this client.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List every device attached to the logged-in user.
    ///
    /// `GET /user-device`
    pub async fn list_user_devices(&self) -> Result<Vec<UserDeviceEntry>, Error> {
        let url = join_endpoint(&self.base_url, "user-device")?;
        debug!("listing user devices");
        let resp = self
            .send_authorized(|token| self.http.get(url.clone()).bearer_auth(token))
            .await?;
        parse_payload(resp).await
    }

    /// Issue a lock command to one device.
    ///
    /// `PUT /tcp-device/{device_id}/{block|unblock}` (empty success body).
    /// The id is percent-encoded as a single path segment.
    pub async fn send_device_action(&self, device_id: &str, action: DeviceAction) -> Result<(), Error> {
        let url = device_action_url(&self.base_url, device_id, action)?;
        debug!(device_id, %action, "sending device action");
        self.send_authorized(|token| {
            self.http
                .put(url.clone())
                .bearer_auth(token)
                .json(&json!({}))
        })
        .await?;
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a bearer-authorized request built by `build`.
    ///
    /// On `401` the session is refreshed and the request rebuilt with the
    /// new access token, at most [`MAX_AUTH_RETRIES`] times. A `401` after
    /// the last retry surfaces as [`Error::Api`] and clears the session, so
    /// later calls fail with [`Error::NotAuthenticated`] instead of replaying
    /// rejected tokens. Any other non-success status surfaces immediately.
    async fn send_authorized<F>(&self, build: F) -> Result<reqwest::Response, Error>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let mut retries = 0;
        loop {
            let Some(tokens) = self.session.tokens() else {
                return Err(Error::NotAuthenticated);
            };

            let resp = build(tokens.access_token().expose_secret())
                .send()
                .await
                .map_err(Error::Transport)?;

            let status = resp.status();
            if status.is_success() {
                return Ok(resp);
            }

            if status != StatusCode::UNAUTHORIZED {
                return Err(api_error(resp).await);
            }
            if retries >= MAX_AUTH_RETRIES {
                warn!("access token rejected after refresh, session cleared");
                self.session.clear();
                return Err(api_error(resp).await);
            }

            retries += 1;
            debug!(attempt = retries, "access token rejected, refreshing session");
            self.session.renew(&tokens).await?;
        }
    }
}

impl fmt::Debug for BouncerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BouncerClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// `{base}/tcp-device/{device_id}/{action}` with `device_id` pushed as one
/// encoded segment.
fn device_action_url(base: &Url, device_id: &str, action: DeviceAction) -> Result<Url, Error> {
    let mut url = join_endpoint(base, "tcp-device")?;
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .push(device_id)
        .push(action.as_str());
    Ok(url)
}

/// Decode a `{ "payload": T }` success body.
async fn parse_payload<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
        let preview = body.chars().take(200).collect::<String>();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })?;
    Ok(envelope.payload)
}

/// Pull the backend's `message` out of an error response, if it sent one.
pub(crate) async fn backend_message(resp: reqwest::Response) -> Option<String> {
    let body = resp.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

/// Turn a non-success response into [`Error::Api`].
async fn api_error(resp: reqwest::Response) -> Error {
    let status = resp.status().as_u16();
    let message = backend_message(resp)
        .await
        .unwrap_or_else(|| GENERIC_API_ERROR.to_owned());
    Error::Api { status, message }
}
