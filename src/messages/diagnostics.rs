//! Diagnostics and product data: ArtDiagData, ArtCommand, ArtDataRequest and ArtDataReply.
//!
//! ArtDiagData and ArtCommand carry NUL terminated text behind a 16-bit
//! length that counts the NUL. Text longer than [`MAX_TEXT_LENGTH`] bytes is
//! truncated.

use crate::definitions::{DataRequestCode, Priority};
use crate::opcode::OpCode;
use crate::packet::{
    PacketContent, PacketReader, PacketWriter, DMX_CHANNELS, MAX_TEXT_LENGTH, PROTOCOL_VERSION,
};

fn write_text(w: &mut PacketWriter, text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(MAX_TEXT_LENGTH);
    w.be16(len as u16 + 1).bytes(&bytes[..len]).u8(0);
}

fn read_text(r: &PacketReader<'_>, length_offset: usize) -> String {
    let length = usize::from(r.be16(length_offset));
    r.text(length_offset + 2, length)
}

/// ArtDiagData content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtDiagData {
    /// Protocol revision.
    pub protocol: u16,
    /// Priority of the message.
    pub priority: Priority,
    /// Logical port the message relates to.
    pub logical_port: u8,
    /// Diagnostics text.
    pub text: String,
}

impl ArtDiagData {
    /// Creates a diagnostics message.
    pub fn new(priority: Priority, text: impl Into<String>) -> Self {
        Self {
            priority,
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Default for ArtDiagData {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            priority: Priority::Low,
            logical_port: 0,
            text: String::new(),
        }
    }
}

impl PacketContent for ArtDiagData {
    const OPCODE: OpCode = OpCode::DiagData;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .u8(0)
            .u8(self.priority.into())
            .u8(self.logical_port)
            .u8(0);
        write_text(w, &self.text);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            priority: Priority::from(r.u8(13)),
            logical_port: r.u8(14),
            text: read_text(r, 16),
        }
    }
}

/// ArtCommand content.
///
/// The text holds `&`-terminated `Property=Value` pairs, e.g.
/// `"SwoutText=Playback&"`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtCommand {
    /// Protocol revision.
    pub protocol: u16,
    /// ESTA manufacturer code, `0xFFFF` for all manufacturers.
    pub esta_manufacturer: u16,
    /// Command text.
    pub text: String,
}

impl ArtCommand {
    /// Creates a command for a manufacturer.
    pub fn new(esta_manufacturer: u16, text: impl Into<String>) -> Self {
        Self {
            esta_manufacturer,
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Default for ArtCommand {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            esta_manufacturer: 0,
            text: String::new(),
        }
    }
}

impl PacketContent for ArtCommand {
    const OPCODE: OpCode = OpCode::Command;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol).be16(self.esta_manufacturer);
        write_text(w, &self.text);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            esta_manufacturer: r.be16(12),
            text: read_text(r, 14),
        }
    }
}

/// ArtDataRequest content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtDataRequest {
    /// Protocol revision.
    pub protocol: u16,
    /// ESTA manufacturer code.
    pub esta_manufacturer: u16,
    /// OEM code.
    pub oem: u16,
    /// Requested data.
    pub request: DataRequestCode,
}

impl Default for ArtDataRequest {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            esta_manufacturer: 0,
            oem: 0,
            request: DataRequestCode::Poll,
        }
    }
}

impl PacketContent for ArtDataRequest {
    const OPCODE: OpCode = OpCode::DataRequest;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .be16(self.esta_manufacturer)
            .be16(self.oem)
            .be16(self.request.into())
            .zeros(22);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            esta_manufacturer: r.be16(12),
            oem: r.be16(14),
            request: DataRequestCode::from(r.be16(16)),
        }
    }
}

/// ArtDataReply content.
///
/// The payload is raw bytes, usually a URL, of at most 512 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtDataReply {
    /// Protocol revision.
    pub protocol: u16,
    /// ESTA manufacturer code.
    pub esta_manufacturer: u16,
    /// OEM code.
    pub oem: u16,
    /// Request this reply answers.
    pub request: DataRequestCode,
    /// Reply payload.
    pub payload: Vec<u8>,
}

impl Default for ArtDataReply {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            esta_manufacturer: 0,
            oem: 0,
            request: DataRequestCode::Poll,
            payload: Vec::new(),
        }
    }
}

impl PacketContent for ArtDataReply {
    const OPCODE: OpCode = OpCode::DataReply;

    fn encode(&self, w: &mut PacketWriter) {
        let payload = &self.payload[..self.payload.len().min(DMX_CHANNELS)];
        w.be16(self.protocol)
            .be16(self.esta_manufacturer)
            .be16(self.oem)
            .be16(self.request.into())
            .be16(payload.len() as u16)
            .bytes(payload);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        let length = usize::from(r.be16(18)).min(DMX_CHANNELS);
        Self {
            protocol: r.be16(10),
            esta_manufacturer: r.be16(12),
            oem: r.be16(14),
            request: DataRequestCode::from(r.be16(16)),
            payload: r.bytes(20, length).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diag_data_layout() {
        let diag = ArtDiagData {
            logical_port: 3,
            ..ArtDiagData::new(Priority::High, "ok")
        };
        let expected = hex::decode("4172742d4e6574000023000e0080030000036f6b00").unwrap();
        assert_eq!(diag.to_packet(), expected);
        assert_eq!(ArtDiagData::from_packet(&expected), diag);
    }

    #[test]
    fn test_diag_data_truncates_text() {
        let diag = ArtDiagData::new(Priority::Low, "x".repeat(600));
        let packet = diag.to_packet();
        assert_eq!(packet.len(), 18 + 512);
        assert_eq!(&packet[16..18], &[0x02, 0x00]);
        assert_eq!(packet[packet.len() - 1], 0);
        assert_eq!(ArtDiagData::from_packet(&packet).text, "x".repeat(511));
    }

    #[test]
    fn test_command_roundtrip() {
        let command = ArtCommand::new(0xFFFF, "SwoutText=Playback&");
        let packet = command.to_packet();
        assert_eq!(&packet[12..14], &[0xFF, 0xFF]);
        assert_eq!(&packet[14..16], &[0x00, 20]);
        assert_eq!(ArtCommand::from_packet(&packet), command);
    }

    #[test]
    fn test_command_length_beyond_packet() {
        let mut packet = ArtCommand::new(0, "abc").to_packet();
        packet.truncate(18);
        assert_eq!(ArtCommand::from_packet(&packet).text, "ab");
    }

    #[test]
    fn test_data_request_layout() {
        let request = ArtDataRequest {
            esta_manufacturer: 0x1234,
            oem: 0x5678,
            request: DataRequestCode::UrlSupport,
            ..ArtDataRequest::default()
        };
        let packet = request.to_packet();
        assert_eq!(packet.len(), 40);
        assert_eq!(&packet[12..18], &[0x12, 0x34, 0x56, 0x78, 0x00, 0x03]);
        assert!(packet[18..].iter().all(|&b| b == 0));
        assert_eq!(ArtDataRequest::from_packet(&packet), request);
    }

    #[test]
    fn test_data_reply_roundtrip() {
        let reply = ArtDataReply {
            request: DataRequestCode::UrlProduct,
            payload: b"https://example.com/product".to_vec(),
            ..ArtDataReply::default()
        };
        let packet = reply.to_packet();
        assert_eq!(&packet[18..20], &[0x00, 27]);
        assert_eq!(ArtDataReply::from_packet(&packet), reply);
    }

    #[test]
    fn test_data_reply_truncates_payload() {
        let reply = ArtDataReply {
            payload: vec![0xAA; 700],
            ..ArtDataReply::default()
        };
        let decoded = ArtDataReply::from_packet(&reply.to_packet());
        assert_eq!(decoded.payload.len(), 512);
    }
}
