//! Show control: ArtTrigger and ArtTimeCode.

use crate::definitions::TimeCodeType;
use crate::opcode::OpCode;
use crate::packet::{PacketContent, PacketReader, PacketWriter, PROTOCOL_VERSION};

/// Size of the ArtTrigger data field.
pub const TRIGGER_DATA_SIZE: usize = 512;

/// ArtTrigger content.
///
/// `key` is interpreted as a [`TriggerKey`](crate::TriggerKey) only when
/// `oem` is `0xFFFF`; otherwise it is manufacturer specific. Data is padded
/// to 512 bytes on the wire and trailing zeros are dropped when decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtTrigger {
    /// Protocol revision.
    pub protocol: u16,
    /// OEM code of the targeted product, `0xFFFF` for all.
    pub oem: u16,
    /// Trigger key.
    pub key: u8,
    /// Trigger sub-key.
    pub sub_key: u8,
    /// Trigger data.
    pub data: Vec<u8>,
}

impl Default for ArtTrigger {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            oem: 0,
            key: 0,
            sub_key: 0,
            data: Vec::new(),
        }
    }
}

impl PacketContent for ArtTrigger {
    const OPCODE: OpCode = OpCode::Trigger;

    fn encode(&self, w: &mut PacketWriter) {
        let data = &self.data[..self.data.len().min(TRIGGER_DATA_SIZE)];
        w.be16(self.protocol)
            .zeros(2)
            .be16(self.oem)
            .u8(self.key)
            .u8(self.sub_key)
            .bytes(data)
            .zeros(TRIGGER_DATA_SIZE - data.len());
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        let data = r.bytes(18, TRIGGER_DATA_SIZE);
        let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Self {
            protocol: r.be16(10),
            oem: r.be16(14),
            key: r.u8(16),
            sub_key: r.u8(17),
            data: data[..end].to_vec(),
        }
    }
}

/// ArtTimeCode content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtTimeCode {
    /// Protocol revision.
    pub protocol: u16,
    /// Stream identifier, 0 for the master stream.
    pub stream_id: u8,
    /// Frames, 0-29 depending on the frame rate.
    pub frames: u8,
    /// Seconds, 0-59.
    pub seconds: u8,
    /// Minutes, 0-59.
    pub minutes: u8,
    /// Hours, 0-23.
    pub hours: u8,
    /// Frame rate family.
    pub kind: TimeCodeType,
}

impl ArtTimeCode {
    /// Creates a time code on the master stream.
    ///
    /// # Example
    ///
    /// ```
    /// use artnet_dmx::{ArtTimeCode, PacketContent, TimeCodeType};
    ///
    /// let tc = ArtTimeCode::new(1, 2, 3, 4, TimeCodeType::Ebu);
    /// assert_eq!(&tc.to_packet()[13..], &[0, 4, 3, 2, 1, 1]);
    /// ```
    pub fn new(hours: u8, minutes: u8, seconds: u8, frames: u8, kind: TimeCodeType) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            frames,
            kind,
            ..Self::default()
        }
    }
}

impl Default for ArtTimeCode {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            stream_id: 0,
            frames: 0,
            seconds: 0,
            minutes: 0,
            hours: 0,
            kind: TimeCodeType::Film,
        }
    }
}

impl PacketContent for ArtTimeCode {
    const OPCODE: OpCode = OpCode::TimeCode;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .u8(0)
            .u8(self.stream_id)
            .u8(self.frames)
            .u8(self.seconds)
            .u8(self.minutes)
            .u8(self.hours)
            .u8(self.kind.into());
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            stream_id: r.u8(13),
            frames: r.u8(14),
            seconds: r.u8(15),
            minutes: r.u8(16),
            hours: r.u8(17),
            kind: TimeCodeType::from(r.u8(18)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::TriggerKey;

    #[test]
    fn test_trigger_layout() {
        let trigger = ArtTrigger {
            oem: 0xFFFF,
            key: TriggerKey::Macro.into(),
            sub_key: 12,
            data: vec![1, 2, 3],
            ..ArtTrigger::default()
        };
        let packet = trigger.to_packet();

        assert_eq!(packet.len(), 18 + TRIGGER_DATA_SIZE);
        assert_eq!(&packet[12..18], &[0x00, 0x00, 0xFF, 0xFF, 0x01, 12]);
        assert_eq!(&packet[18..21], &[1, 2, 3]);
        assert!(packet[21..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_trigger_decode_trims_trailing_zeros() {
        let trigger = ArtTrigger {
            key: 0xFF,
            data: vec![0, 5, 0, 7],
            ..ArtTrigger::default()
        };
        let decoded = ArtTrigger::from_packet(&trigger.to_packet());
        assert_eq!(decoded, trigger);
    }

    #[test]
    fn test_trigger_truncated_packet() {
        let decoded = ArtTrigger::from_packet(b"Art-Net\0\x00\x99\x00\x0E\x00\x00\xFF");
        assert_eq!(decoded.oem, 0xFF00);
        assert_eq!(decoded.key, 0);
        assert!(decoded.data.is_empty());
    }

    #[test]
    fn test_time_code_roundtrip() {
        let tc = ArtTimeCode {
            stream_id: 2,
            ..ArtTimeCode::new(23, 59, 58, 29, TimeCodeType::Smpte)
        };
        let packet = tc.to_packet();
        let expected = hex::decode("4172742d4e6574000097000e00021d3a3b1703").unwrap();
        assert_eq!(packet, expected);
        assert_eq!(ArtTimeCode::from_packet(&packet), tc);
    }
}
