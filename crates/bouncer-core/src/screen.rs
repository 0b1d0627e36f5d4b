// ── Device screen controller ──
//
// Owns the lifecycle a front end drives: mount (login, fetch, start the
// periodic session refresh), toggle, reload, teardown. Rendering is left to
// the caller, which observes `ScreenState` through a watch channel and reads
// the activity log.
//
// The refresh task is tied to a `DropGuard`, so dropping the screen on any
// path (including a dropped mount future) cancels it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::activity::{ActivityLog, LogOrder};
use crate::config::{DEFAULT_REFRESH_INTERVAL, GatewayConfig};
use crate::error::CoreError;
use crate::gateway::DeviceGateway;
use crate::model::{CommandStatus, Device};

/// What the screen currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ScreenState {
    Loading,
    Ready(DeviceView),
    Failed(String),
}

impl ScreenState {
    pub fn view(&self) -> Option<&DeviceView> {
        match self {
            Self::Ready(view) => Some(view),
            _ => None,
        }
    }
}

/// A device together with its projected command status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceView {
    pub device: Device,
    pub command: CommandStatus,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenOptions {
    /// Period of the background session refresh. Zero disables it.
    pub refresh_interval: Duration,
    pub log_order: LogOrder,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            log_order: LogOrder::default(),
        }
    }
}

impl From<&GatewayConfig> for ScreenOptions {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval,
            log_order: config.log_order,
        }
    }
}

/// A mounted device screen.
pub struct DeviceScreen {
    gateway: Arc<DeviceGateway>,
    log: Arc<ActivityLog>,
    state: watch::Sender<ScreenState>,
    toggle_lock: Mutex<()>,
    refresh_task: Option<JoinHandle<()>>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl DeviceScreen {
    /// Mount the screen: start the periodic refresh, log in if needed, and
    /// load the configured device.
    ///
    /// Never fails. A failed initial load leaves the screen in
    /// [`ScreenState::Failed`] with the refresh task still running, so a
    /// later [`reload`](Self::reload) can recover.
    pub async fn mount(gateway: Arc<DeviceGateway>, options: ScreenOptions) -> Self {
        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();
        let log = Arc::new(ActivityLog::new(options.log_order));
        let (state, _) = watch::channel(ScreenState::Loading);

        let refresh_task = (!options.refresh_interval.is_zero()).then(|| {
            tokio::spawn(session_refresh_task(
                Arc::clone(&gateway),
                Arc::clone(&log),
                options.refresh_interval,
                cancel.clone(),
            ))
        });

        let screen = Self {
            gateway,
            log,
            state,
            toggle_lock: Mutex::new(()),
            refresh_task,
            cancel,
            _guard: guard,
        };

        // Errors are already reflected in the state and the log.
        let _ = screen.reload().await;
        screen
    }

    pub fn gateway(&self) -> &Arc<DeviceGateway> {
        &self.gateway
    }

    /// Current state snapshot.
    pub fn state(&self) -> ScreenState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.state.subscribe()
    }

    pub fn log(&self) -> &Arc<ActivityLog> {
        &self.log
    }

    /// Re-read the device from the backend, logging in first if the
    /// session was lost.
    pub async fn reload(&self) -> Result<DeviceView, CoreError> {
        match self.load().await {
            Ok(view) => {
                self.log.push(format!(
                    "Device {} is {}",
                    display_name(&view.device),
                    view.label
                ));
                self.state.send_replace(ScreenState::Ready(view.clone()));
                Ok(view)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Toggle the shown device and update the view optimistically.
    ///
    /// Toggles are serialized; a second press waits for the first.
    pub async fn toggle(&self) -> Result<CommandStatus, CoreError> {
        let _serial = self.toggle_lock.lock().await;

        let Some(current) = self.state.borrow().view().cloned() else {
            return Err(CoreError::NotReady);
        };

        let vocabulary = self.gateway.vocabulary();
        let next = match self.gateway.toggle_device_status(current.command).await {
            Ok(next) => next,
            Err(e @ CoreError::NotToggleable { .. }) => {
                self.log.push(format!("Cannot toggle: {e}"));
                return Err(e);
            }
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        let mut device = current.device;
        device.status = vocabulary.raw_for(next);
        let view = DeviceView {
            device,
            command: next,
            label: vocabulary.label(next),
        };
        self.log.push(format!("Toggled {} -> {}", current.label, view.label));
        self.state.send_replace(ScreenState::Ready(view));
        Ok(next)
    }

    /// Stop the periodic refresh and wait for it to finish. A refresh
    /// already in flight completes first so rotated tokens are not lost.
    pub async fn teardown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.refresh_task.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "session refresh task ended abnormally");
            }
        }
        debug!("device screen torn down");
    }

    async fn load(&self) -> Result<DeviceView, CoreError> {
        if !self.gateway.is_authenticated() {
            self.gateway.login().await?;
            self.log.push(format!(
                "Logged in as {}",
                self.gateway.session().email()
            ));
        }
        let device = self.gateway.fetch_configured_device().await?;
        let command = self.gateway.command_for(&device);
        Ok(DeviceView {
            device,
            command,
            label: self.gateway.vocabulary().label(command),
        })
    }

    fn fail(&self, error: &CoreError) {
        warn!(error = %error, "device screen error");
        self.log.push(format!("Error: {error}"));
        self.state.send_replace(ScreenState::Failed(error.to_string()));
    }
}

impl std::fmt::Debug for DeviceScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceScreen")
            .field("device_id", &self.gateway.device_id())
            .field("state", &*self.state.borrow())
            .field("refreshing", &self.refresh_task.is_some())
            .finish_non_exhaustive()
    }
}

fn display_name(device: &Device) -> &str {
    if device.nickname.is_empty() {
        &device.id
    } else {
        &device.nickname
    }
}

/// Periodically refresh the session tokens until cancelled.
async fn session_refresh_task(
    gateway: Arc<DeviceGateway>,
    log: Arc<ActivityLog>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if gateway.is_authenticated() {
                    match gateway.refresh().await {
                        Ok(()) => debug!("session refreshed"),
                        Err(e) => {
                            warn!(error = %e, "periodic session refresh failed");
                            log.push(format!("Session refresh failed: {e}"));
                        }
                    }
                } else {
                    debug!("skipping session refresh: not authenticated");
                }
            }
        }
    }
}
