// ── Device gateway ──
//
// Domain-level operations on the configured barrier controller. Session
// handling is delegated to the shared `SessionManager`; the bounded 401
// retry lives in the API client. Operations that need a session fail fast
// with `NotAuthenticated` -- logging in is the caller's decision.

use std::sync::Arc;

use tracing::{debug, info};

use bouncer_api::{BouncerClient, DeviceAction, LoginCredentials, SessionManager, TlsMode, TransportConfig};

use crate::config::{GatewayConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{CommandStatus, Device, RawStatus};
use crate::status::Vocabulary;

/// Handle to one configured device behind one backend session.
#[derive(Debug)]
pub struct DeviceGateway {
    client: BouncerClient,
    device_id: String,
    vocabulary: Vocabulary,
}

impl DeviceGateway {
    /// Build the HTTP client and session from configuration. Does not log in.
    pub fn new(config: &GatewayConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let credentials = LoginCredentials::new(config.email.clone(), config.password.clone());
        let client = BouncerClient::new(config.api_url.clone(), credentials, &transport)?;
        Ok(Self::from_client(
            client,
            config.device_id.clone(),
            config.vocabulary,
        ))
    }

    /// Wrap an existing client.
    pub fn from_client(client: BouncerClient, device_id: impl Into<String>, vocabulary: Vocabulary) -> Self {
        Self {
            client,
            device_id: device_id.into(),
            vocabulary,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        self.client.session()
    }

    // ── Session pass-throughs ────────────────────────────────────────

    pub async fn login(&self) -> Result<(), CoreError> {
        Ok(self.session().login().await?)
    }

    pub async fn refresh(&self) -> Result<(), CoreError> {
        Ok(self.session().refresh().await?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Every device visible to the logged-in user.
    pub async fn fetch_device_list(&self) -> Result<Vec<Device>, CoreError> {
        self.require_session()?;
        let entries = self.client.list_user_devices().await?;
        debug!(count = entries.len(), "fetched device list");
        Ok(entries.into_iter().map(Device::from).collect())
    }

    /// The device with identifier `device_id`.
    pub async fn fetch_device_details(&self, device_id: &str) -> Result<Device, CoreError> {
        self.fetch_device_list()
            .await?
            .into_iter()
            .find(|d| d.id == device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: device_id.to_owned(),
            })
    }

    /// The configured device.
    pub async fn fetch_configured_device(&self) -> Result<Device, CoreError> {
        self.fetch_device_details(&self.device_id).await
    }

    /// Command status of `device` under this gateway's vocabulary.
    pub fn command_for(&self, device: &Device) -> CommandStatus {
        self.vocabulary.map(&device.status)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Flip the configured device away from `current`: a blocked device is
    /// unblocked, anything else is blocked. Returns the verb that was sent.
    pub async fn update_device_status(&self, current: &RawStatus) -> Result<DeviceAction, CoreError> {
        let action = match current {
            RawStatus::Blocked => DeviceAction::Unblock,
            _ => DeviceAction::Block,
        };
        self.set_device_status(action).await?;
        Ok(action)
    }

    /// Send `action` to the configured device regardless of its state.
    pub async fn set_device_status(&self, action: DeviceAction) -> Result<(), CoreError> {
        self.require_session()?;
        self.client.send_device_action(&self.device_id, action).await?;
        info!(device_id = %self.device_id, %action, "device status updated");
        Ok(())
    }

    /// Toggle a device currently shown as `current` and return the status
    /// to show next.
    ///
    /// Only `Unblock`/`Block` are toggleable; anything else fails with
    /// [`CoreError::NotToggleable`] before any request is made. The result
    /// is optimistic: the backend is not re-read.
    pub async fn toggle_device_status(&self, current: CommandStatus) -> Result<CommandStatus, CoreError> {
        let Some(next) = current.toggled() else {
            return Err(CoreError::NotToggleable {
                status: self.vocabulary.label(current).to_owned(),
            });
        };

        let raw = self.vocabulary.raw_for(current);
        self.update_device_status(&raw).await?;
        Ok(next)
    }

    fn require_session(&self) -> Result<(), CoreError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }
}

fn build_transport(config: &GatewayConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
