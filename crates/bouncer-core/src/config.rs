// ── Runtime gateway configuration ──
//
// Describes *how* to reach the backend and which device to drive. Carries
// credential data and tuning but never touches disk: the CLI resolves a
// profile and hands a `GatewayConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::activity::LogOrder;
use crate::status::Vocabulary;

/// Interval of the periodic token refresh while a screen is mounted.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification policy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    #[default]
    SystemDefaults,
    CustomCa(PathBuf),
    DangerAcceptInvalid,
}

/// Everything a [`DeviceGateway`](crate::DeviceGateway) and
/// [`DeviceScreen`](crate::DeviceScreen) need to run.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_url: Url,
    pub device_id: String,
    pub email: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub refresh_interval: Duration,
    pub vocabulary: Vocabulary,
    pub log_order: LogOrder,
}

impl GatewayConfig {
    /// Config with defaults for everything but the required fields.
    pub fn new(
        api_url: Url,
        device_id: impl Into<String>,
        email: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            api_url,
            device_id: device_id.into(),
            email: email.into(),
            password,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            vocabulary: Vocabulary::default(),
            log_order: LogOrder::default(),
        }
    }
}
