//! Art-Net packet header.
//!
//! Every Art-Net packet starts with the same 10-byte header:
//!
//! | Byte | Field | Description |
//! |------|-------|-------------|
//! | 0-7 | ID | `"Art-Net"` followed by a NUL byte |
//! | 8 | OpCodeLo | Opcode, low byte |
//! | 9 | OpCodeHi | Opcode, high byte |
//!
//! The opcode is kept as a raw `u16` so that opcodes unknown to this crate
//! survive parsing. Message content follows at byte 10.
//!
//! # Example
//!
//! ```
//! use artnet_dmx::{ArtNetHeader, OpCode};
//!
//! let header = ArtNetHeader::new(OpCode::Dmx);
//! let bytes = header.to_bytes();
//! assert_eq!(&bytes[..8], b"Art-Net\0");
//! assert_eq!(&bytes[8..], &[0x00, 0x50]);
//!
//! let parsed = ArtNetHeader::from_bytes(&bytes).unwrap();
//! assert_eq!(parsed.opcode(), Some(OpCode::Dmx));
//! ```

use crate::opcode::OpCode;
use crate::utils::{decode_le16, encode_le16};

/// Header size in bytes.
pub const HEADER_SIZE: usize = 10;

/// Packet identifier, `"Art-Net\0"`.
pub const ARTNET_SIGNATURE: &[u8; 8] = b"Art-Net\0";

/// Art-Net packet header (10 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtNetHeader {
    /// Raw opcode as carried on the wire.
    pub opcode: u16,
}

impl ArtNetHeader {
    /// Creates a header for a known opcode.
    pub fn new(opcode: OpCode) -> Self {
        Self {
            opcode: opcode.as_u16(),
        }
    }

    /// Creates a header from a raw opcode value.
    pub fn from_raw(opcode: u16) -> Self {
        Self { opcode }
    }

    /// Returns the opcode if it is known to this crate.
    pub fn opcode(&self) -> Option<OpCode> {
        OpCode::from_u16(self.opcode)
    }

    /// Serializes the header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..8].copy_from_slice(ARTNET_SIGNATURE);
        bytes[8..].copy_from_slice(&encode_le16(self.opcode));
        bytes
    }

    /// Parses a header from the start of a packet.
    ///
    /// Returns `None` when the buffer is shorter than a header or does not
    /// start with the Art-Net signature.
    ///
    /// # Example
    ///
    /// ```
    /// use artnet_dmx::ArtNetHeader;
    ///
    /// assert!(ArtNetHeader::from_bytes(b"Art-Net\0").is_none());
    /// assert!(ArtNetHeader::from_bytes(b"NotArtNet\0\0").is_none());
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE || &bytes[..8] != ARTNET_SIGNATURE {
            return None;
        }
        Some(Self::from_raw(decode_le16(bytes[8], bytes[9])))
    }
}
