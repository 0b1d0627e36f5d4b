// ── Device domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device state as reported by the backend.
///
/// Parsing is total: values this client does not know are kept verbatim in
/// [`RawStatus::Unknown`] and treated as offline downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RawStatus {
    Blocked,
    Unblocked,
    InUse,
    Alarm,
    Offline,
    Unknown(String),
}

impl RawStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BLOCKED" => Self::Blocked,
            "UNBLOCKED" => Self::Unblocked,
            "IN_USE" => Self::InUse,
            "ALARM" => Self::Alarm,
            "OFFLINE" => Self::Offline,
            _ => Self::Unknown(raw.to_owned()),
        }
    }

    /// The backend spelling of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blocked => "BLOCKED",
            Self::Unblocked => "UNBLOCKED",
            Self::InUse => "IN_USE",
            Self::Alarm => "ALARM",
            Self::Offline => "OFFLINE",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for RawStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for RawStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<RawStatus> for String {
    fn from(status: RawStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The barrier controller as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub nickname: String,
    pub status: RawStatus,
    /// Battery voltage in millivolts.
    pub battery_millivolts: Option<u32>,
    pub location: Option<String>,
    pub firmware_version: Option<String>,
    /// Last time the device talked to the backend, as sent by the backend.
    pub last_connection: Option<String>,
}

impl Device {
    /// Battery voltage in volts (`3650 mV -> 3.65`).
    pub fn battery_volts(&self) -> Option<f64> {
        self.battery_millivolts.map(|mv| f64::from(mv) / 1000.0)
    }
}
