// Backend response types
//
// Every successful response wraps its body in a `{ "payload": ... }`
// envelope. Device fields use `#[serde(default)]` liberally because the
// backend omits optional attributes instead of sending nulls.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard response envelope: `{ "payload": T }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub payload: T,
}

/// Error body returned with non-success statuses. `message` is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Token pair returned by both `/auth/credentials` and `/auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
}

// ── Devices ──────────────────────────────────────────────────────────

/// One entry of `GET /user-device`. The device record is nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDeviceEntry {
    pub device: DeviceRecord,
}

/// Device as returned by the backend.
///
/// `status` is kept as the raw backend string; interpretation (including
/// values this client has never seen) is the domain layer's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub id: String,
    #[serde(default)]
    pub nick_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Battery voltage in millivolts.
    #[serde(default)]
    pub battery_voltage: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub last_connection_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_entry_with_missing_optionals() {
        let raw = json!({
            "payload": [{ "device": { "id": "dev-1", "status": "BLOCKED" } }]
        });
        let env: Envelope<Vec<UserDeviceEntry>> =
            serde_json::from_value(raw).expect("valid envelope");
        let device = &env.payload[0].device;
        assert_eq!(device.id, "dev-1");
        assert_eq!(device.status.as_deref(), Some("BLOCKED"));
        assert!(device.nick_name.is_none());
        assert!(device.battery_voltage.is_none());
        assert!(device.last_connection_date.is_none());
    }

    #[test]
    fn error_body_without_message() {
        let body: ErrorBody = serde_json::from_str("{}").expect("valid body");
        assert!(body.message.is_none());
    }
}
