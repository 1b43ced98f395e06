//! Notification payload decoding.
//!
//! The scale firmware notifies weight readings as base64 text. Decoded, the
//! first four bytes are a little-endian IEEE-754 float in kilograms. Payloads
//! shorter than four bytes mean the scale has no reading yet.

use base64::prelude::*;
use thiserror::Error;

/// Errors decoding a scale notification.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("payload is not valid base64: {0}")]
    NotBase64(#[from] base64::DecodeError),
}

/// Decode a raw notification payload into a weight reading.
///
/// `Ok(None)` means the payload decoded but carries no reading (fewer than
/// four bytes); callers should clear any stale value they hold.
pub fn decode_reading(payload: &[u8]) -> Result<Option<f32>, DecodeError> {
    let text = std::str::from_utf8(payload)?;
    let bytes = BASE64_STANDARD.decode(text)?;
    log::debug!("scale notification: 0x{}", hex::encode(&bytes));

    if bytes.len() < 4 {
        return Ok(None);
    }
    Ok(Some(f32::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3],
    ])))
}
