//! DMX streaming: ArtDmx, ArtNzs (with VLC) and ArtSync.
//!
//! The 15-bit Port-Address is sent low byte first: the sub-universe byte
//! (bits 7-0) and then the net byte (bits 14-8).
//!
//! # Example
//!
//! ```
//! use artnet_dmx::{port_address, ArtDmx, PacketContent};
//!
//! let dmx = ArtDmx::new(port_address(1, 0x23), vec![1, 2, 3, 4]);
//! assert_eq!(dmx.net(), 1);
//! assert_eq!(dmx.sub_uni(), 0x23);
//!
//! let bytes = dmx.to_packet();
//! assert_eq!(&bytes[14..18], &[0x23, 0x01, 0x00, 0x04]);
//! ```

use crate::definitions::{VlcFlags, VlcPayloadLanguage};
use crate::opcode::OpCode;
use crate::packet::{PacketContent, PacketReader, PacketWriter, DMX_CHANNELS, PROTOCOL_VERSION};

/// Start code that marks an ArtNzs packet as VLC.
pub const VLC_START_CODE: u8 = 0x91;
/// Magic number opening a VLC packet, `"ALE"`.
pub const VLC_MAGIC: [u8; 3] = [0x41, 0x4C, 0x45];
/// Size of the VLC header that precedes the payload.
pub const VLC_HEADER_SIZE: usize = 22;

/// Combines a net (bits 14-8) and a sub-universe (bits 7-0) into a Port-Address.
pub fn port_address(net: u8, sub_uni: u8) -> u16 {
    (u16::from(net & 0x7F) << 8) | u16::from(sub_uni)
}

/// 16-bit additive checksum of a VLC payload.
pub fn vlc_checksum(payload: &[u8]) -> u16 {
    payload
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// ArtDmx content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtDmx {
    /// Protocol revision.
    pub protocol: u16,
    /// Sequence number, 0 when sequencing is disabled.
    pub sequence: u8,
    /// Physical input port the data came from.
    pub physical: u8,
    /// 15-bit Port-Address.
    pub port_address: u16,
    /// Channel values, at most 512.
    pub data: Vec<u8>,
}

impl ArtDmx {
    /// Creates a frame for a Port-Address.
    pub fn new(port_address: u16, data: Vec<u8>) -> Self {
        Self {
            port_address,
            data,
            ..Self::default()
        }
    }

    /// Returns the net (bits 14-8 of the Port-Address).
    pub fn net(&self) -> u8 {
        ((self.port_address >> 8) & 0x7F) as u8
    }

    /// Returns the sub-universe (bits 7-0 of the Port-Address).
    pub fn sub_uni(&self) -> u8 {
        (self.port_address & 0xFF) as u8
    }
}

impl Default for ArtDmx {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            sequence: 0,
            physical: 0,
            port_address: 0,
            data: Vec::new(),
        }
    }
}

impl PacketContent for ArtDmx {
    const OPCODE: OpCode = OpCode::Dmx;

    fn encode(&self, w: &mut PacketWriter) {
        let data = &self.data[..self.data.len().min(DMX_CHANNELS)];
        w.be16(self.protocol)
            .u8(self.sequence)
            .u8(self.physical)
            .le16(self.port_address)
            .be16(data.len() as u16)
            .bytes(data);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        let length = usize::from(r.be16(16)).min(DMX_CHANNELS);
        Self {
            protocol: r.be16(10),
            sequence: r.u8(12),
            physical: r.u8(13),
            port_address: r.le16(14),
            data: r.bytes(18, length).to_vec(),
        }
    }
}

/// VLC header carried inside an ArtNzs packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vlc {
    /// VLC flags.
    pub flags: VlcFlags,
    /// Transaction number, matches replies to requests.
    pub transaction: u16,
    /// Slot address of the target fixture, 0 for all.
    pub slot_address: u16,
    /// Payload length in bytes.
    pub pay_count: u16,
    /// Additive checksum of the payload.
    pub pay_check: u16,
    /// Modulation depth in percent.
    pub depth: u8,
    /// Modulation frequency in Hz.
    pub frequency: u16,
    /// Modulation type.
    pub modulation: u16,
    /// Payload language.
    pub payload_language: VlcPayloadLanguage,
    /// Beacon repeat frequency in Hz.
    pub beacon_repeat: u16,
}

impl Vlc {
    fn encode(&self, w: &mut PacketWriter) {
        w.bytes(&VLC_MAGIC)
            .u8(self.flags.bits())
            .be16(self.transaction)
            .be16(self.slot_address)
            .be16(self.pay_count)
            .be16(self.pay_check)
            .u8(0)
            .u8(self.depth)
            .be16(self.frequency)
            .be16(self.modulation)
            .be16(self.payload_language.into())
            .be16(self.beacon_repeat);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            flags: VlcFlags::from_bits(r.u8(21)),
            transaction: r.be16(22),
            slot_address: r.be16(24),
            pay_count: r.be16(26),
            pay_check: r.be16(28),
            depth: r.u8(31),
            frequency: r.be16(32),
            modulation: r.be16(34),
            payload_language: VlcPayloadLanguage::from(r.be16(36)),
            beacon_repeat: r.be16(38),
        }
    }
}

/// ArtNzs content.
///
/// When `vlc` is set the packet is a VLC packet: the start code is forced to
/// [`VLC_START_CODE`] and `data` holds the payload that follows the VLC
/// header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtNzs {
    /// Protocol revision.
    pub protocol: u16,
    /// Sequence number, 0 when sequencing is disabled.
    pub sequence: u8,
    /// DMX512 start code.
    pub start_code: u8,
    /// 15-bit Port-Address.
    pub port_address: u16,
    /// Slot data, or the VLC payload.
    pub data: Vec<u8>,
    /// VLC header, if this is a VLC packet.
    pub vlc: Option<Vlc>,
}

impl ArtNzs {
    /// Creates a non-zero start code frame.
    pub fn new(port_address: u16, start_code: u8, data: Vec<u8>) -> Self {
        Self {
            start_code,
            port_address,
            data,
            ..Self::default()
        }
    }

    /// Creates a VLC packet, filling in the payload count and checksum.
    ///
    /// # Example
    ///
    /// ```
    /// use artnet_dmx::{ArtNzs, Vlc, VLC_START_CODE};
    ///
    /// let nzs = ArtNzs::new_vlc(0, Vlc::default(), b"hi".to_vec());
    /// let vlc = nzs.vlc.as_ref().unwrap();
    /// assert_eq!(nzs.start_code, VLC_START_CODE);
    /// assert_eq!(vlc.pay_count, 2);
    /// assert_eq!(vlc.pay_check, u16::from(b'h') + u16::from(b'i'));
    /// ```
    pub fn new_vlc(port_address: u16, vlc: Vlc, payload: Vec<u8>) -> Self {
        let payload_len = payload.len().min(DMX_CHANNELS - VLC_HEADER_SIZE);
        let vlc = Vlc {
            pay_count: payload_len as u16,
            pay_check: vlc_checksum(&payload[..payload_len]),
            ..vlc
        };
        Self {
            start_code: VLC_START_CODE,
            port_address,
            data: payload,
            vlc: Some(vlc),
            ..Self::default()
        }
    }

    /// Returns whether the packet carries VLC data.
    pub fn is_vlc(&self) -> bool {
        self.vlc.is_some()
    }
}

impl Default for ArtNzs {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            sequence: 0,
            start_code: 0,
            port_address: 0,
            data: Vec::new(),
            vlc: None,
        }
    }
}

impl PacketContent for ArtNzs {
    const OPCODE: OpCode = OpCode::Nzs;

    fn encode(&self, w: &mut PacketWriter) {
        let (start_code, header_len) = match self.vlc {
            Some(_) => (VLC_START_CODE, VLC_HEADER_SIZE),
            None => (self.start_code, 0),
        };
        let data = &self.data[..self.data.len().min(DMX_CHANNELS - header_len)];

        w.be16(self.protocol)
            .u8(self.sequence)
            .u8(start_code)
            .le16(self.port_address)
            .be16((header_len + data.len()) as u16);
        if let Some(vlc) = &self.vlc {
            vlc.encode(w);
        }
        w.bytes(data);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        let length = usize::from(r.be16(16)).min(DMX_CHANNELS);
        let start_code = r.u8(13);
        let is_vlc = start_code == VLC_START_CODE && r.bytes(18, 3) == &VLC_MAGIC[..];

        let (vlc, data) = if is_vlc {
            let payload_offset = 18 + VLC_HEADER_SIZE;
            let payload = r.bytes(payload_offset, length.saturating_sub(VLC_HEADER_SIZE));
            (Some(Vlc::decode(r)), payload.to_vec())
        } else {
            (None, r.bytes(18, length).to_vec())
        };

        Self {
            protocol: r.be16(10),
            sequence: r.u8(12),
            start_code,
            port_address: r.le16(14),
            data,
            vlc,
        }
    }
}

/// ArtSync content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtSync {
    /// Protocol revision.
    pub protocol: u16,
}

impl Default for ArtSync {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
        }
    }
}

impl PacketContent for ArtSync {
    const OPCODE: OpCode = OpCode::Sync;

    fn encode(&self, w: &mut PacketWriter) {
        // Aux1, Aux2
        w.be16(self.protocol).zeros(2);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
        }
    }
}
