//! ArtPoll and ArtPollReply.
//!
//! A controller broadcasts ArtPoll; every node answers with one ArtPollReply
//! per bound IP address.

use std::net::Ipv4Addr;

use crate::definitions::{DeviceStyle, PollFlags, Priority};
use crate::opcode::OpCode;
use crate::packet::{PacketContent, PacketReader, PacketWriter, PROTOCOL_VERSION};
use crate::transport::DEFAULT_ARTNET_PORT;

/// Width of the short name field, NUL included.
pub const SHORT_NAME_SIZE: usize = 18;
/// Width of the long name field, NUL included.
pub const LONG_NAME_SIZE: usize = 64;
/// Width of the node report field, NUL included.
pub const NODE_REPORT_SIZE: usize = 64;

/// ArtPoll content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtPoll {
    /// Protocol revision.
    pub protocol: u16,
    /// Behaviour flags.
    pub flags: PollFlags,
    /// Lowest priority of diagnostics messages to send.
    pub diag_priority: Priority,
    /// Top of the targeted Port-Address range.
    pub target_top: u16,
    /// Bottom of the targeted Port-Address range.
    pub target_bottom: u16,
    /// ESTA manufacturer code.
    pub esta_manufacturer: u16,
    /// OEM code.
    pub oem: u16,
}

impl Default for ArtPoll {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            flags: PollFlags::empty(),
            diag_priority: Priority::Low,
            target_top: 0,
            target_bottom: 0,
            esta_manufacturer: 0,
            oem: 0,
        }
    }
}

impl PacketContent for ArtPoll {
    const OPCODE: OpCode = OpCode::Poll;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .u8(self.flags.bits())
            .u8(self.diag_priority.into())
            .be16(self.target_top)
            .be16(self.target_bottom)
            .be16(self.esta_manufacturer)
            .be16(self.oem);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        let diag_priority = if r.has(13) {
            Priority::from(r.u8(13))
        } else {
            Priority::Low
        };

        Self {
            protocol: r.be16(10),
            flags: PollFlags::from_bits(r.u8(12)),
            diag_priority,
            target_top: r.be16(14),
            target_bottom: r.be16(16),
            esta_manufacturer: r.be16(18),
            oem: r.be16(20),
        }
    }
}

/// ArtPollReply content.
///
/// Unlike every other 16-bit field, the UDP port is transmitted low byte
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtPollReply {
    /// Node IP address.
    pub ip_address: Ipv4Addr,
    /// Node UDP port, normally `0x1936`.
    pub port: u16,
    /// Firmware revision.
    pub version_info: u16,
    /// Bits 14-8 of the Port-Address.
    pub net_switch: u8,
    /// Bits 7-4 of the Port-Address.
    pub sub_switch: u8,
    /// OEM code.
    pub oem: u16,
    /// UBEA firmware revision.
    pub ubea_version: u8,
    /// General status register.
    pub status1: u8,
    /// ESTA manufacturer code.
    pub esta_manufacturer: u16,
    /// Short node name, at most 17 bytes.
    pub short_name: String,
    /// Long node name, at most 63 bytes.
    pub long_name: String,
    /// Textual node report, at most 63 bytes.
    pub node_report: String,
    /// Number of input or output ports.
    pub num_ports: u16,
    /// Port types.
    pub port_types: [u8; 4],
    /// Input status per port.
    pub good_input: [u8; 4],
    /// Output status per port.
    pub good_output_a: [u8; 4],
    /// Input universe per port (bits 3-0).
    pub sw_in: [u8; 4],
    /// Output universe per port (bits 3-0).
    pub sw_out: [u8; 4],
    /// sACN priority.
    pub acn_priority: u8,
    /// Macro key inputs.
    pub sw_macro: u8,
    /// Remote trigger inputs.
    pub sw_remote: u8,
    /// Product style.
    pub style: DeviceStyle,
    /// Node MAC address.
    pub mac_address: [u8; 6],
    /// IP of the root device when the node is part of a larger product.
    pub bind_ip: Ipv4Addr,
    /// Order of bound devices.
    pub bind_index: u8,
    /// Extended status register.
    pub status2: u8,
    /// Additional output status per port.
    pub good_output_b: [u8; 4],
    /// General status register.
    pub status3: u8,
    /// RDM UID of the default responder.
    pub default_responder_uid: [u8; 6],
    /// User specific data.
    pub user: u16,
    /// Maximum DMX refresh rate in Hz.
    pub refresh_rate: u16,
    /// Background queue policy.
    pub background_queue_policy: u8,
}

impl Default for ArtPollReply {
    fn default() -> Self {
        Self {
            ip_address: Ipv4Addr::UNSPECIFIED,
            port: DEFAULT_ARTNET_PORT,
            version_info: 0,
            net_switch: 0,
            sub_switch: 0,
            oem: 0,
            ubea_version: 0,
            status1: 0,
            esta_manufacturer: 0,
            short_name: String::new(),
            long_name: String::new(),
            node_report: String::new(),
            num_ports: 0,
            port_types: [0; 4],
            good_input: [0; 4],
            good_output_a: [0; 4],
            sw_in: [0; 4],
            sw_out: [0; 4],
            acn_priority: 0,
            sw_macro: 0,
            sw_remote: 0,
            style: DeviceStyle::Node,
            mac_address: [0; 6],
            bind_ip: Ipv4Addr::UNSPECIFIED,
            bind_index: 0,
            status2: 0,
            good_output_b: [0; 4],
            status3: 0,
            default_responder_uid: [0; 6],
            user: 0,
            refresh_rate: 0,
            background_queue_policy: 0,
        }
    }
}

impl PacketContent for ArtPollReply {
    const OPCODE: OpCode = OpCode::PollReply;

    fn encode(&self, w: &mut PacketWriter) {
        w.bytes(&self.ip_address.octets())
            .le16(self.port)
            .be16(self.version_info)
            .u8(self.net_switch)
            .u8(self.sub_switch)
            .be16(self.oem)
            .u8(self.ubea_version)
            .u8(self.status1)
            .be16(self.esta_manufacturer)
            .fixed_text(&self.short_name, SHORT_NAME_SIZE)
            .fixed_text(&self.long_name, LONG_NAME_SIZE)
            .fixed_text(&self.node_report, NODE_REPORT_SIZE)
            .be16(self.num_ports)
            .bytes(&self.port_types)
            .bytes(&self.good_input)
            .bytes(&self.good_output_a)
            .bytes(&self.sw_in)
            .bytes(&self.sw_out)
            .u8(self.acn_priority)
            .u8(self.sw_macro)
            .u8(self.sw_remote)
            .zeros(3)
            .u8(self.style.into())
            .bytes(&self.mac_address)
            .bytes(&self.bind_ip.octets())
            .u8(self.bind_index)
            .u8(self.status2)
            .bytes(&self.good_output_b)
            .u8(self.status3)
            .bytes(&self.default_responder_uid)
            .be16(self.user)
            .be16(self.refresh_rate)
            .u8(self.background_queue_policy)
            .zeros(10);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            ip_address: Ipv4Addr::from(r.array::<4>(10)),
            port: r.le16(14),
            version_info: r.be16(16),
            net_switch: r.u8(18),
            sub_switch: r.u8(19),
            oem: r.be16(20),
            ubea_version: r.u8(22),
            status1: r.u8(23),
            esta_manufacturer: r.be16(24),
            short_name: r.text(26, SHORT_NAME_SIZE),
            long_name: r.text(44, LONG_NAME_SIZE),
            node_report: r.text(108, NODE_REPORT_SIZE),
            num_ports: r.be16(172),
            port_types: r.array(174),
            good_input: r.array(178),
            good_output_a: r.array(182),
            sw_in: r.array(186),
            sw_out: r.array(190),
            acn_priority: r.u8(194),
            sw_macro: r.u8(195),
            sw_remote: r.u8(196),
            style: DeviceStyle::from(r.u8(200)),
            mac_address: r.array(201),
            bind_ip: Ipv4Addr::from(r.array::<4>(207)),
            bind_index: r.u8(211),
            status2: r.u8(212),
            good_output_b: r.array(213),
            status3: r.u8(217),
            default_responder_uid: r.array(218),
            user: r.be16(224),
            refresh_rate: r.be16(226),
            background_queue_policy: r.u8(228),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{parse_packet, ArtNetMessage};

    #[test]
    fn test_poll_wire_layout() {
        let poll = ArtPoll {
            flags: PollFlags::DIAGNOSTICS | PollFlags::REPLY_ON_CHANGE,
            diag_priority: Priority::High,
            target_top: 0x7FFF,
            target_bottom: 0x0001,
            esta_manufacturer: 0x1234,
            oem: 0xFFFF,
            ..ArtPoll::default()
        };
        let expected =
            hex::decode("4172742d4e6574000020000e06807fff00011234ffff").unwrap();
        assert_eq!(poll.to_packet(), expected);
        assert_eq!(ArtPoll::from_packet(&expected), poll);
    }

    #[test]
    fn test_poll_short_packet_defaults() {
        let poll = ArtPoll::from_packet(b"Art-Net\0\x00\x20\x00\x0E\x02");
        assert_eq!(poll.protocol, 14);
        assert_eq!(poll.flags, PollFlags::REPLY_ON_CHANGE);
        assert_eq!(poll.diag_priority, Priority::Low);
        assert_eq!(poll.oem, 0);
    }

    fn sample_reply() -> ArtPollReply {
        ArtPollReply {
            ip_address: Ipv4Addr::new(192, 168, 1, 20),
            version_info: 0x0102,
            net_switch: 1,
            sub_switch: 2,
            oem: 0x2BAD,
            esta_manufacturer: 0x7FF0,
            short_name: "ArtNet device".to_string(),
            long_name: "Art Net device".to_string(),
            node_report: "#0001 [0000] ok".to_string(),
            num_ports: 4,
            port_types: [0x80, 0x80, 0x40, 0x40],
            sw_out: [0, 1, 2, 3],
            style: DeviceStyle::Controller,
            mac_address: [0x00, 0x1B, 0x44, 0x11, 0x3A, 0xB7],
            bind_ip: Ipv4Addr::new(192, 168, 1, 20),
            bind_index: 1,
            default_responder_uid: [1, 2, 3, 4, 5, 6],
            refresh_rate: 44,
            ..ArtPollReply::default()
        }
    }

    #[test]
    fn test_poll_reply_size_and_offsets() {
        let packet = sample_reply().to_packet();
        assert_eq!(packet.len(), 239);
        assert_eq!(&packet[10..14], &[192, 168, 1, 20]);
        // Port is low byte first
        assert_eq!(&packet[14..16], &[0x36, 0x19]);
        assert_eq!(&packet[26..39], b"ArtNet device");
        assert_eq!(packet[39], 0);
        assert_eq!(&packet[44..58], b"Art Net device");
        assert_eq!(packet[200], 0x01);
        assert_eq!(&packet[201..207], &[0x00, 0x1B, 0x44, 0x11, 0x3A, 0xB7]);
        assert_eq!(&packet[226..228], &[0x00, 44]);
    }

    #[test]
    fn test_poll_reply_roundtrip() {
        let reply = sample_reply();
        match parse_packet(&reply.to_packet()) {
            ArtNetMessage::PollReply(decoded) => assert_eq!(*decoded, reply),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_poll_reply_truncates_names() {
        let reply = ArtPollReply {
            short_name: "a".repeat(40),
            long_name: "b".repeat(100),
            node_report: "c".repeat(70),
            ..ArtPollReply::default()
        };
        let packet = reply.to_packet();
        assert_eq!(packet.len(), 239);

        let decoded = ArtPollReply::from_packet(&packet);
        assert_eq!(decoded.short_name, "a".repeat(17));
        assert_eq!(decoded.long_name, "b".repeat(63));
        assert_eq!(decoded.node_report, "c".repeat(63));
    }

    #[test]
    fn test_poll_reply_from_truncated_packet() {
        let packet = sample_reply().to_packet();
        let decoded = ArtPollReply::from_packet(&packet[..50]);
        assert_eq!(decoded.ip_address, Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(decoded.short_name, "ArtNet device");
        assert_eq!(decoded.long_name, "Art Ne");
        assert_eq!(decoded.mac_address, [0; 6]);
    }
}
