//! Packet building and parsing.
//!
//! This module is the codec registry: it maps every opcode onto the content
//! type that encodes and decodes it, and wraps content in the Art-Net header.
//!
//! # Packet Structure
//!
//! | Component | Size | Description |
//! |-----------|------|-------------|
//! | Header | 10 bytes | `"Art-Net\0"` and the opcode, low byte first |
//! | Content | Variable | Opcode specific fields at fixed offsets |
//!
//! Content encoders write the bytes after the header. Content decoders read
//! the whole packet and address fields by their absolute offset, so the
//! offsets in each decoder match the Art-Net documentation directly.
//!
//! # Lenient Decoding
//!
//! Decoding never fails. Missing numeric fields read as zero, missing text
//! and byte fields read as empty. Unknown and unimplemented opcodes decode to
//! [`ArtNetMessage::Unsupported`] and encode to no content.
//!
//! # Example
//!
//! ```
//! use artnet_dmx::{build_packet, parse_packet, ArtDmx, ArtNetMessage};
//!
//! let message = ArtNetMessage::Dmx(ArtDmx::new(1, vec![255, 0, 128]));
//! let bytes = build_packet(&message);
//! assert_eq!(bytes.len(), 18 + 3);
//!
//! match parse_packet(&bytes) {
//!     ArtNetMessage::Dmx(dmx) => {
//!         assert_eq!(dmx.port_address, 1);
//!         assert_eq!(dmx.data, vec![255, 0, 128]);
//!     }
//!     other => panic!("unexpected message: {:?}", other),
//! }
//! ```

use crate::header::{ArtNetHeader, HEADER_SIZE};
use crate::messages::{
    ArtAddress, ArtCommand, ArtDataReply, ArtDataRequest, ArtDiagData, ArtDmx, ArtInput,
    ArtIpProg, ArtIpProgReply, ArtNzs, ArtPoll, ArtPollReply, ArtSync, ArtTimeCode, ArtTrigger,
};
use crate::opcode::OpCode;
use crate::utils::{decode_be16, decode_le16, encode_be16, encode_le16};

/// Protocol revision written into every packet by default.
pub const PROTOCOL_VERSION: u16 = 14;

/// Number of channels in a DMX512 universe.
pub const DMX_CHANNELS: usize = 512;

/// Longest text carried by ArtDiagData and ArtCommand, excluding the NUL.
pub const MAX_TEXT_LENGTH: usize = 511;

/// Sequential writer for packet content.
///
/// Writes past the header; the header itself is added by [`build_packet`].
#[derive(Debug, Default, Clone)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Appends a single byte.
    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Appends a 16-bit value, high byte first.
    pub fn be16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&encode_be16(value));
        self
    }

    /// Appends a 16-bit value, low byte first.
    pub fn le16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&encode_le16(value));
        self
    }

    /// Appends raw bytes.
    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Appends `count` zero bytes.
    pub fn zeros(&mut self, count: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + count, 0);
        self
    }

    /// Appends text in a fixed-width field.
    ///
    /// The text is truncated to `width - 1` bytes and padded with zeros, so
    /// the field is always NUL terminated.
    pub fn fixed_text(&mut self, text: &str, width: usize) -> &mut Self {
        let bytes = text.as_bytes();
        let len = bytes.len().min(width.saturating_sub(1));
        self.buf.extend_from_slice(&bytes[..len]);
        self.zeros(width - len)
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the content bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Lenient reader addressing a whole packet by absolute offset.
///
/// Reads beyond the end of the buffer return zeros or empty slices.
#[derive(Debug, Clone, Copy)]
pub struct PacketReader<'a> {
    bytes: &'a [u8],
}

impl<'a> PacketReader<'a> {
    /// Wraps a whole packet, header included.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Returns the packet length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the packet is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns whether the packet contains the byte at `offset`.
    pub fn has(&self, offset: usize) -> bool {
        offset < self.bytes.len()
    }

    /// Reads a byte, or zero when missing.
    pub fn u8(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }

    /// Reads a 16-bit value transmitted high byte first.
    pub fn be16(&self, offset: usize) -> u16 {
        decode_be16(self.u8(offset), self.u8(offset + 1))
    }

    /// Reads a 16-bit value transmitted low byte first.
    pub fn le16(&self, offset: usize) -> u16 {
        decode_le16(self.u8(offset), self.u8(offset + 1))
    }

    /// Reads a fixed-size array, zero filling missing bytes.
    pub fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        let available = self.bytes(offset, N);
        out[..available.len()].copy_from_slice(available);
        out
    }

    /// Returns up to `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> &'a [u8] {
        let start = offset.min(self.bytes.len());
        let end = offset.saturating_add(len).min(self.bytes.len());
        &self.bytes[start..end]
    }

    /// Reads text from a field of `width` bytes, stopping at the first NUL.
    pub fn text(&self, offset: usize, width: usize) -> String {
        let field = self.bytes(offset, width);
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        String::from_utf8_lossy(&field[..end]).into_owned()
    }
}

/// Encode/decode pair for the content of one opcode.
///
/// # Example
///
/// ```
/// use artnet_dmx::{ArtSync, OpCode, PacketContent};
///
/// let bytes = ArtSync::default().to_packet();
/// assert_eq!(bytes, b"Art-Net\0\x00\x52\x00\x0E\x00\x00");
/// assert_eq!(ArtSync::OPCODE, OpCode::Sync);
/// ```
pub trait PacketContent: Sized {
    /// Opcode carried in the header of this content.
    const OPCODE: OpCode;

    /// Writes the content bytes (everything after the header).
    fn encode(&self, writer: &mut PacketWriter);

    /// Reads the content from a whole packet.
    fn decode(reader: &PacketReader<'_>) -> Self;

    /// Serializes the content as a complete packet.
    fn to_packet(&self) -> Vec<u8> {
        let mut writer = PacketWriter::with_capacity(64);
        writer.bytes(&ArtNetHeader::new(Self::OPCODE).to_bytes());
        self.encode(&mut writer);
        writer.into_inner()
    }

    /// Parses the content from a complete packet, ignoring the header.
    fn from_packet(bytes: &[u8]) -> Self {
        Self::decode(&PacketReader::new(bytes))
    }
}

/// A decoded Art-Net message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArtNetMessage {
    /// ArtPoll.
    Poll(ArtPoll),
    /// ArtPollReply.
    PollReply(Box<ArtPollReply>),
    /// ArtDiagData.
    DiagData(ArtDiagData),
    /// ArtCommand.
    Command(ArtCommand),
    /// ArtDataRequest.
    DataRequest(ArtDataRequest),
    /// ArtDataReply.
    DataReply(ArtDataReply),
    /// ArtDmx.
    Dmx(ArtDmx),
    /// ArtNzs, including VLC.
    Nzs(ArtNzs),
    /// ArtSync.
    Sync(ArtSync),
    /// ArtAddress.
    Address(ArtAddress),
    /// ArtInput.
    Input(ArtInput),
    /// ArtTrigger.
    Trigger(ArtTrigger),
    /// ArtTimeCode.
    TimeCode(ArtTimeCode),
    /// ArtIpProg.
    IpProg(ArtIpProg),
    /// ArtIpProgReply.
    IpProgReply(ArtIpProgReply),
    /// An opcode this crate does not encode or decode.
    Unsupported {
        /// Raw opcode.
        opcode: u16,
    },
}

impl ArtNetMessage {
    /// Returns the raw opcode of the message.
    pub fn raw_opcode(&self) -> u16 {
        let op = match self {
            ArtNetMessage::Poll(_) => OpCode::Poll,
            ArtNetMessage::PollReply(_) => OpCode::PollReply,
            ArtNetMessage::DiagData(_) => OpCode::DiagData,
            ArtNetMessage::Command(_) => OpCode::Command,
            ArtNetMessage::DataRequest(_) => OpCode::DataRequest,
            ArtNetMessage::DataReply(_) => OpCode::DataReply,
            ArtNetMessage::Dmx(_) => OpCode::Dmx,
            ArtNetMessage::Nzs(_) => OpCode::Nzs,
            ArtNetMessage::Sync(_) => OpCode::Sync,
            ArtNetMessage::Address(_) => OpCode::Address,
            ArtNetMessage::Input(_) => OpCode::Input,
            ArtNetMessage::Trigger(_) => OpCode::Trigger,
            ArtNetMessage::TimeCode(_) => OpCode::TimeCode,
            ArtNetMessage::IpProg(_) => OpCode::IpProg,
            ArtNetMessage::IpProgReply(_) => OpCode::IpProgReply,
            ArtNetMessage::Unsupported { opcode } => return *opcode,
        };
        op.as_u16()
    }

    /// Returns the opcode of the message if it is known to this crate.
    pub fn opcode(&self) -> Option<OpCode> {
        OpCode::from_u16(self.raw_opcode())
    }

    /// Serializes the message as a complete packet.
    pub fn to_bytes(&self) -> Vec<u8> {
        build_packet(self)
    }
}

macro_rules! impl_from_content {
    ($($variant:ident($content:ty)),* $(,)?) => {
        $(
            impl From<$content> for ArtNetMessage {
                fn from(content: $content) -> Self {
                    ArtNetMessage::$variant(content.into())
                }
            }
        )*
    };
}

impl_from_content!(
    Poll(ArtPoll),
    PollReply(ArtPollReply),
    DiagData(ArtDiagData),
    Command(ArtCommand),
    DataRequest(ArtDataRequest),
    DataReply(ArtDataReply),
    Dmx(ArtDmx),
    Nzs(ArtNzs),
    Sync(ArtSync),
    Address(ArtAddress),
    Input(ArtInput),
    Trigger(ArtTrigger),
    TimeCode(ArtTimeCode),
    IpProg(ArtIpProg),
    IpProgReply(ArtIpProgReply),
);

/// Encodes the content of a message, without the header.
///
/// Unsupported messages encode to no bytes.
pub fn encode_content(message: &ArtNetMessage) -> Vec<u8> {
    let mut writer = PacketWriter::with_capacity(64);
    match message {
        ArtNetMessage::Poll(content) => content.encode(&mut writer),
        ArtNetMessage::PollReply(content) => content.encode(&mut writer),
        ArtNetMessage::DiagData(content) => content.encode(&mut writer),
        ArtNetMessage::Command(content) => content.encode(&mut writer),
        ArtNetMessage::DataRequest(content) => content.encode(&mut writer),
        ArtNetMessage::DataReply(content) => content.encode(&mut writer),
        ArtNetMessage::Dmx(content) => content.encode(&mut writer),
        ArtNetMessage::Nzs(content) => content.encode(&mut writer),
        ArtNetMessage::Sync(content) => content.encode(&mut writer),
        ArtNetMessage::Address(content) => content.encode(&mut writer),
        ArtNetMessage::Input(content) => content.encode(&mut writer),
        ArtNetMessage::Trigger(content) => content.encode(&mut writer),
        ArtNetMessage::TimeCode(content) => content.encode(&mut writer),
        ArtNetMessage::IpProg(content) => content.encode(&mut writer),
        ArtNetMessage::IpProgReply(content) => content.encode(&mut writer),
        ArtNetMessage::Unsupported { .. } => {}
    }
    writer.into_inner()
}

/// Decodes the content of a whole packet for the given opcode.
///
/// Unknown and unimplemented opcodes produce [`ArtNetMessage::Unsupported`].
pub fn decode_content(opcode: u16, packet: &[u8]) -> ArtNetMessage {
    let reader = PacketReader::new(packet);
    let Some(op) = OpCode::from_u16(opcode) else {
        return ArtNetMessage::Unsupported { opcode };
    };

    match op {
        OpCode::Poll => ArtNetMessage::Poll(ArtPoll::decode(&reader)),
        OpCode::PollReply => ArtNetMessage::PollReply(Box::new(ArtPollReply::decode(&reader))),
        OpCode::DiagData => ArtNetMessage::DiagData(ArtDiagData::decode(&reader)),
        OpCode::Command => ArtNetMessage::Command(ArtCommand::decode(&reader)),
        OpCode::DataRequest => ArtNetMessage::DataRequest(ArtDataRequest::decode(&reader)),
        OpCode::DataReply => ArtNetMessage::DataReply(ArtDataReply::decode(&reader)),
        OpCode::Dmx => ArtNetMessage::Dmx(ArtDmx::decode(&reader)),
        OpCode::Nzs => ArtNetMessage::Nzs(ArtNzs::decode(&reader)),
        OpCode::Sync => ArtNetMessage::Sync(ArtSync::decode(&reader)),
        OpCode::Address => ArtNetMessage::Address(ArtAddress::decode(&reader)),
        OpCode::Input => ArtNetMessage::Input(ArtInput::decode(&reader)),
        OpCode::Trigger => ArtNetMessage::Trigger(ArtTrigger::decode(&reader)),
        OpCode::TimeCode => ArtNetMessage::TimeCode(ArtTimeCode::decode(&reader)),
        OpCode::IpProg => ArtNetMessage::IpProg(ArtIpProg::decode(&reader)),
        OpCode::IpProgReply => ArtNetMessage::IpProgReply(ArtIpProgReply::decode(&reader)),
        _ => ArtNetMessage::Unsupported { opcode },
    }
}

/// Builds a complete packet: signature, opcode and content.
pub fn build_packet(message: &ArtNetMessage) -> Vec<u8> {
    let content = encode_content(message);
    let mut packet = Vec::with_capacity(HEADER_SIZE + content.len());
    packet.extend_from_slice(&ArtNetHeader::from_raw(message.raw_opcode()).to_bytes());
    packet.extend_from_slice(&content);
    packet
}

/// Parses a complete packet into a message.
///
/// The signature is not checked; use [`is_artnet_packet`] first when the
/// source is untrusted. Short buffers never panic.
///
/// # Example
///
/// ```
/// use artnet_dmx::{parse_packet, ArtNetMessage};
///
/// // Truncated ArtPoll: only the header and the protocol version
/// let message = parse_packet(b"Art-Net\0\x00\x20\x00\x0E");
/// match message {
///     ArtNetMessage::Poll(poll) => {
///         assert_eq!(poll.protocol, 14);
///         assert_eq!(poll.oem, 0);
///     }
///     other => panic!("unexpected message: {:?}", other),
/// }
///
/// assert!(matches!(parse_packet(&[]), ArtNetMessage::Unsupported { opcode: 0 }));
/// ```
pub fn parse_packet(bytes: &[u8]) -> ArtNetMessage {
    let reader = PacketReader::new(bytes);
    decode_content(reader.le16(8), bytes)
}

/// Returns whether the buffer starts with a complete Art-Net header.
pub fn is_artnet_packet(bytes: &[u8]) -> bool {
    ArtNetHeader::from_bytes(bytes).is_some()
}
