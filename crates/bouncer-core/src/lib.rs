//! Session & device gateway between `bouncer-api` and front ends (CLI).
//!
//! This crate owns the domain logic for driving one barrier controller:
//!
//! - **[`DeviceGateway`]**: Reads the device list, looks up the configured
//!   device, and sends block/unblock commands. Authorization and the bounded
//!   refresh-and-retry-once policy come from the shared session in
//!   `bouncer-api`.
//!
//! - **[`Vocabulary`]**: Total mapping from the backend's raw status to the
//!   command status a front end displays. Two named policies (`action` and
//!   `parking`) are supported; one is chosen per deployment.
//!
//! - **[`DeviceScreen`]**: Screen lifecycle: mount, optimistic toggle,
//!   reload, teardown. Runs the periodic session refresh and cancels it on
//!   every exit path.
//!
//! - **[`ActivityLog`]**: Append-only, timestamped record of what happened,
//!   displayed newest-first or oldest-first.

pub mod activity;
pub mod config;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod model;
pub mod screen;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use activity::{ActivityLog, LogEntry, LogOrder};
pub use config::{DEFAULT_REFRESH_INTERVAL, DEFAULT_TIMEOUT, GatewayConfig, TlsVerification};
pub use error::CoreError;
pub use gateway::DeviceGateway;
pub use model::{CommandStatus, Device, RawStatus};
pub use screen::{DeviceScreen, DeviceView, ScreenOptions, ScreenState};
pub use status::{Vocabulary, map_raw_to_command};

pub use bouncer_api::DeviceAction;
