// bouncer-api: Async Rust client for the bouncer device-management backend

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use auth::{LoginCredentials, TokenPair};
pub use client::{BouncerClient, DeviceAction};
pub use error::Error;
pub use models::{DeviceRecord, UserDeviceEntry};
pub use session::SessionManager;
pub use transport::{TlsMode, TransportConfig};
