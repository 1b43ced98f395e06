//! Wire constants for the DigiScale firmware.

use bluest::Uuid;
use std::time::Duration;

/// GATT service advertised by the scale firmware.
pub const SERVICE_UUID: &str = "6530099a-e4c4-41ef-a871-3b47a8c016dc";

/// Characteristic that notifies weight readings.
pub const CHARACTERISTIC_UUID: &str = "09771e9e-b398-4143-983f-1c5e93cc2742";

/// Substring of the advertised device name that identifies a scale.
pub const DEVICE_NAME_TOKEN: &str = "ESP32";

/// Pause between stopping one scan and starting the next.
pub const SCAN_RESTART_QUIESCENCE: Duration = Duration::from_millis(500);

pub fn scale_service() -> Uuid {
    Uuid::parse_str(SERVICE_UUID).unwrap()
}

pub fn weight_characteristic() -> Uuid {
    Uuid::parse_str(CHARACTERISTIC_UUID).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuids_parse() {
        assert_eq!(scale_service().to_string(), SERVICE_UUID);
        assert_eq!(weight_characteristic().to_string(), CHARACTERISTIC_UUID);
    }
}
