//! 16-bit integer helpers for Art-Net byte layouts.
//!
//! Art-Net mixes two byte orders inside the same packet:
//!
//! - **Big-endian** (high byte first): protocol version, ESTA/OEM codes,
//!   lengths, counts and nearly every other 16-bit field.
//! - **Little-endian** (low byte first): the opcode and the 15-bit
//!   Port-Address (sub-universe byte, then net byte).
//!
//! Codecs never shift bytes by hand; they pick one of the two named
//! conventions below so a field's byte order is visible at the call site.
//!
//! # Example
//!
//! ```
//! use artnet_dmx::utils::{encode_be16, encode_le16, merge_int16, split_int16};
//!
//! let (low, high) = split_int16(0x1936);
//! assert_eq!((low, high), (0x36, 0x19));
//! assert_eq!(merge_int16(low, high), 0x1936);
//!
//! // Protocol version 14, high byte first
//! assert_eq!(encode_be16(14), [0x00, 0x0E]);
//!
//! // Universe 1 as a Port-Address, low byte first
//! assert_eq!(encode_le16(1), [0x01, 0x00]);
//! ```

/// Splits a 16-bit integer into its `(low, high)` bytes.
///
/// # Example
///
/// ```
/// use artnet_dmx::utils::split_int16;
///
/// assert_eq!(split_int16(0xABCD), (0xCD, 0xAB));
/// ```
#[inline]
pub fn split_int16(value: u16) -> (u8, u8) {
    ((value & 0xFF) as u8, ((value >> 8) & 0xFF) as u8)
}

/// Merges a `(low, high)` byte pair back into a 16-bit integer.
///
/// # Example
///
/// ```
/// use artnet_dmx::utils::merge_int16;
///
/// assert_eq!(merge_int16(0xCD, 0xAB), 0xABCD);
/// ```
#[inline]
pub fn merge_int16(low: u8, high: u8) -> u16 {
    (u16::from(high) << 8) | u16::from(low)
}

/// Encodes a value high byte first.
///
/// Used for protocol versions, manufacturer codes, lengths and counts.
#[inline]
pub fn encode_be16(value: u16) -> [u8; 2] {
    let (low, high) = split_int16(value);
    [high, low]
}

/// Decodes a value transmitted high byte first.
#[inline]
pub fn decode_be16(high: u8, low: u8) -> u16 {
    merge_int16(low, high)
}

/// Encodes a value low byte first.
///
/// Used for the opcode and the Port-Address (sub-universe, then net).
#[inline]
pub fn encode_le16(value: u16) -> [u8; 2] {
    let (low, high) = split_int16(value);
    [low, high]
}

/// Decodes a value transmitted low byte first.
#[inline]
pub fn decode_le16(low: u8, high: u8) -> u16 {
    merge_int16(low, high)
}

/// Formats a byte slice as space separated upper-case hex, e.g. `"41 72 74"`.
///
/// Handy when logging or asserting on raw packets.
///
/// # Example
///
/// ```
/// use artnet_dmx::utils::format_hex;
///
/// assert_eq!(format_hex(b"Art"), "41 72 74");
/// assert_eq!(format_hex(&[]), "");
/// ```
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
