//! DigiScale BLE client.
//!
//! Connects to the DigiScale ESP32 scale firmware over Bluetooth Low Energy
//! and streams weight readings.
//!
//! The firmware advertises a fixed GATT service with a single characteristic
//! that notifies base64-encoded little-endian floats (kilograms).
//! [`ScaleSession`] drives the lifecycle: scan for peripherals whose name
//! carries the scale token, connect to one, subscribe, and publish each
//! decoded reading through a watch channel.
//!
//! ```no_run
//! use digiscale_ble::ScaleSession;
//!
//! # async fn example() -> Result<(), digiscale_ble::SessionError> {
//! let mut session = ScaleSession::new().await?;
//! session.start_scan().await?;
//! // ... wait for discovery, then:
//! let scales = session.discovered_scales();
//! session.connect(&scales[0].id).await?;
//! let reading = session.current_reading();
//! # Ok(())
//! # }
//! ```

pub mod decode;
pub mod permissions;
pub mod session;
pub mod uuids;

pub use decode::{decode_reading, DecodeError};
pub use permissions::{AlwaysGranted, PermissionGate, PermissionSet};
pub use session::{DiscoveredScale, ScaleSession, SessionError};
