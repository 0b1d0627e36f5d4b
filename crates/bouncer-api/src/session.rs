// Session management
//
// Owns the access/refresh token pair, performs login and refresh, and
// serializes every credential write behind one async gate. Refresh is
// single-flight: a caller that arrives while a refresh is running waits for
// it and adopts its outcome instead of sending a second request, so the
// server never sees two refreshes race each other on the same token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{LoginCredentials, TokenPair};
use crate::error::Error;
use crate::models::{Envelope, TokenPayload};
use crate::transport::join_endpoint;

const LOGIN_PATH: &str = "auth/credentials";
const REFRESH_PATH: &str = "auth/refresh";

/// Result of the most recent refresh, replayed to callers that waited on it.
#[derive(Debug, Clone)]
enum RefreshOutcome {
    Refreshed,
    NoRefreshToken,
    Failed(String),
}

/// The last completed refresh and the counter value it produced.
#[derive(Debug)]
struct LastRefresh {
    generation: u64,
    outcome: RefreshOutcome,
}

impl RefreshOutcome {
    fn of(result: &Result<(), Error>) -> Self {
        match result {
            Ok(()) => Self::Refreshed,
            Err(Error::NoRefreshToken) => Self::NoRefreshToken,
            Err(Error::Authentication { message }) => Self::Failed(message.clone()),
            Err(other) => Self::Failed(other.to_string()),
        }
    }

    fn replay(&self) -> Result<(), Error> {
        match self {
            Self::Refreshed => Ok(()),
            Self::NoRefreshToken => Err(Error::NoRefreshToken),
            Self::Failed(message) => Err(Error::Authentication {
                message: message.clone(),
            }),
        }
    }
}

/// Token holder for one backend session.
///
/// Shared as `Arc<SessionManager>` between the device client, the periodic
/// refresh timer, and any front end that wants to observe validity.
pub struct SessionManager {
    http: reqwest::Client,
    base_url: Url,
    credentials: LoginCredentials,
    tokens: RwLock<Option<TokenPair>>,
    /// Held for the duration of every login/refresh. Stores the outcome of
    /// the last completed refresh for callers that queued behind it; a login
    /// resets it.
    gate: Mutex<Option<LastRefresh>>,
    /// Bumped under `gate` each time a refresh completes.
    refreshes: AtomicU64,
}

impl SessionManager {
    pub fn new(http: reqwest::Client, base_url: Url, credentials: LoginCredentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
            tokens: RwLock::new(None),
            gate: Mutex::new(None),
            refreshes: AtomicU64::new(0),
        }
    }

    /// The account this session logs in as.
    pub fn email(&self) -> &str {
        &self.credentials.email
    }

    /// True iff an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.read_tokens().is_some()
    }

    /// Snapshot of the current token pair.
    pub fn tokens(&self) -> Option<TokenPair> {
        self.read_tokens().clone()
    }

    /// Drop the held tokens. Later authorized calls fail with
    /// [`Error::NotAuthenticated`] until the next login.
    pub fn clear(&self) {
        self.store(None);
    }

    /// Authenticate with the configured email/password.
    ///
    /// `POST /auth/credentials` with `{email, password}`. On success the
    /// token pair is replaced; on any failure it is cleared.
    pub async fn login(&self) -> Result<(), Error> {
        let mut last = self.gate.lock().await;
        *last = None;

        let url = join_endpoint(&self.base_url, LOGIN_PATH)?;
        debug!("logging in at {}", url);

        let body = json!({
            "email": self.credentials.email,
            "password": self.credentials.password.expose_secret(),
        });

        match self.request_tokens(self.http.post(url).json(&body), "login").await {
            Ok(pair) => {
                self.store(Some(pair));
                info!(email = %self.credentials.email, "login successful");
                Ok(())
            }
            Err(e) => {
                self.store(None);
                Err(e)
            }
        }
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// `POST /auth/refresh` with `Authorization: Bearer {refreshToken}`.
    /// Fails with [`Error::NoRefreshToken`] when none is held. A failed
    /// refresh clears the session and is never retried here.
    ///
    /// Concurrent callers share a single network request: whoever finds the
    /// gate held by a refresh waits for it and returns its outcome. That
    /// includes a refresh whose bookkeeping finished but which has not yet
    /// released the gate.
    pub async fn refresh(&self) -> Result<(), Error> {
        let seen = self.refreshes.load(Ordering::Acquire);
        let mut last = match self.gate.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                let guard = self.gate.lock().await;
                if let Some(done) = guard.as_ref().filter(|done| done.generation >= seen) {
                    debug!("joined in-flight token refresh");
                    return done.outcome.replay();
                }
                guard
            }
        };

        let result = self.refresh_locked().await;
        let generation = self.refreshes.fetch_add(1, Ordering::AcqRel) + 1;
        *last = Some(LastRefresh {
            generation,
            outcome: RefreshOutcome::of(&result),
        });
        result
    }

    /// Refresh after the backend rejected `rejected`, unless a concurrent
    /// refresh has already rotated it out.
    pub(crate) async fn renew(&self, rejected: &TokenPair) -> Result<(), Error> {
        if let Some(current) = self.tokens() {
            if !current.same_as(rejected) {
                debug!("rejected token already rotated, skipping refresh");
                return Ok(());
            }
        }
        self.refresh().await
    }

    /// Number of refreshes completed so far (successful or not).
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Acquire)
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn refresh_locked(&self) -> Result<(), Error> {
        let refresh_token: SecretString = match self.tokens() {
            Some(pair) => pair.refresh_token().clone(),
            None => return Err(Error::NoRefreshToken),
        };

        let url = join_endpoint(&self.base_url, REFRESH_PATH)?;
        debug!("refreshing tokens at {}", url);

        let builder = self
            .http
            .post(url)
            .bearer_auth(refresh_token.expose_secret())
            .json(&json!({}));

        match self.request_tokens(builder, "refresh").await {
            Ok(pair) => {
                self.store(Some(pair));
                info!("tokens refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, session cleared");
                self.store(None);
                Err(match e {
                    Error::Authentication { .. } => e,
                    other => Error::Authentication {
                        message: other.to_string(),
                    },
                })
            }
        }
    }

    /// Send a login/refresh request and decode the token envelope.
    async fn request_tokens(
        &self,
        builder: reqwest::RequestBuilder,
        flow: &str,
    ) -> Result<TokenPair, Error> {
        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let message = match crate::client::backend_message(resp).await {
                Some(msg) => msg,
                None => format!("{flow} rejected (HTTP {status})"),
            };
            return Err(Error::Authentication { message });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let envelope: Envelope<TokenPayload> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{flow} response: {e}"),
                body: body.clone(),
            })?;
        Ok(envelope.payload.into())
    }

    fn read_tokens(&self) -> std::sync::RwLockReadGuard<'_, Option<TokenPair>> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, pair: Option<TokenPair>) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = pair;
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.base_url.as_str())
            .field("email", &self.credentials.email)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
