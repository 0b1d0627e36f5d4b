// ── API-to-domain type conversions ──
//
// Bridges raw `bouncer_api` records into the domain `Device`. Missing
// optional attributes stay `None`; an absent status becomes `Unknown`.

use bouncer_api::{DeviceRecord, UserDeviceEntry};

use crate::model::{Device, RawStatus};

impl From<DeviceRecord> for Device {
    fn from(record: DeviceRecord) -> Self {
        Self {
            id: record.id,
            nickname: record.nick_name.unwrap_or_default(),
            status: record
                .status
                .map_or_else(|| RawStatus::Unknown(String::new()), RawStatus::from),
            // Negative or out-of-range readings are sensor noise.
            battery_millivolts: record.battery_voltage.and_then(|mv| u32::try_from(mv).ok()),
            location: record.location,
            firmware_version: record.firmware_version,
            last_connection: record.last_connection_date,
        }
    }
}

impl From<UserDeviceEntry> for Device {
    fn from(entry: UserDeviceEntry) -> Self {
        entry.device.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(status: Option<&str>) -> DeviceRecord {
        DeviceRecord {
            id: "dev-1".into(),
            nick_name: None,
            status: status.map(String::from),
            battery_voltage: None,
            location: None,
            firmware_version: None,
            last_connection_date: None,
        }
    }

    #[test]
    fn optional_fields_pass_through_as_none() {
        let device = Device::from(record(Some("BLOCKED")));
        assert_eq!(device.id, "dev-1");
        assert_eq!(device.nickname, "");
        assert_eq!(device.status, RawStatus::Blocked);
        assert_eq!(device.battery_millivolts, None);
        assert_eq!(device.location, None);
        assert_eq!(device.firmware_version, None);
        assert_eq!(device.last_connection, None);
    }

    #[test]
    fn missing_status_is_unknown() {
        let device = Device::from(record(None));
        assert!(!device.status.is_known());
    }

    #[test]
    fn negative_battery_is_dropped() {
        let mut raw = record(Some("UNBLOCKED"));
        raw.battery_voltage = Some(-5);
        assert_eq!(Device::from(raw).battery_millivolts, None);
    }
}
