//! Platform permission handling for BLE scanning.
//!
//! Which runtime grants a scan needs is a property of the platform, resolved
//! once as a [`PermissionSet`] instead of scattered conditionals. The host
//! supplies a [`PermissionGate`] that actually prompts the user.

/// Runtime grants a platform requires before scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionSet {
    /// Android 12+: Bluetooth scan and connect grants alongside fine location.
    ScanAndConnect,
    /// Older Android: scanning is gated on the fine-location grant alone.
    FineLocation,
    /// Platforms where the OS Bluetooth consent flow is all that is needed.
    NotRequired,
}

impl PermissionSet {
    /// Required set for an Android host at the given API level.
    pub fn for_android_api(api_level: u32) -> Self {
        if api_level >= 31 {
            PermissionSet::ScanAndConnect
        } else {
            PermissionSet::FineLocation
        }
    }

    /// Required set for the current platform.
    ///
    /// Android hosts know their API level at runtime and should resolve via
    /// [`PermissionSet::for_android_api`] instead.
    pub fn required() -> Self {
        if cfg!(target_os = "android") {
            PermissionSet::ScanAndConnect
        } else {
            PermissionSet::NotRequired
        }
    }
}

/// Host-provided permission gate.
///
/// Asked once before a scan starts; a denial surfaces as an error and is
/// never retried automatically. Implementations resolve the platform prompt
/// before returning.
pub trait PermissionGate: Send + Sync {
    fn request(&self, set: PermissionSet) -> bool;
}

/// Gate that grants everything (desktop hosts, tests).
pub struct AlwaysGranted;

impl PermissionGate for AlwaysGranted {
    fn request(&self, _set: PermissionSet) -> bool {
        true
    }
}
