//! Node configuration: ArtAddress, ArtInput, ArtIpProg and ArtIpProgReply.

use std::net::Ipv4Addr;

use crate::definitions::{AddressCommand, IpProgCommand, IpProgStatus};
use crate::messages::discovery::{LONG_NAME_SIZE, SHORT_NAME_SIZE};
use crate::opcode::OpCode;
use crate::packet::{PacketContent, PacketReader, PacketWriter, PROTOCOL_VERSION};

/// ArtAddress content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtAddress {
    /// Protocol revision.
    pub protocol: u16,
    /// New net switch, bit 7 set to program.
    pub net_switch: u8,
    /// Bind index of the node being programmed.
    pub bind_index: u8,
    /// New short name, empty for no change.
    pub short_name: String,
    /// New long name, empty for no change.
    pub long_name: String,
    /// New input universes, bit 7 set to program.
    pub sw_in: [u8; 4],
    /// New output universes, bit 7 set to program.
    pub sw_out: [u8; 4],
    /// New sub switch, bit 7 set to program.
    pub sub_switch: u8,
    /// New sACN priority.
    pub acn_priority: u8,
    /// Command to execute.
    pub command: AddressCommand,
}

impl Default for ArtAddress {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            net_switch: 0,
            bind_index: 0,
            short_name: String::new(),
            long_name: String::new(),
            sw_in: [0; 4],
            sw_out: [0; 4],
            sub_switch: 0,
            acn_priority: 0,
            command: AddressCommand::None,
        }
    }
}

impl PacketContent for ArtAddress {
    const OPCODE: OpCode = OpCode::Address;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .u8(self.net_switch)
            .u8(self.bind_index)
            .fixed_text(&self.short_name, SHORT_NAME_SIZE)
            .fixed_text(&self.long_name, LONG_NAME_SIZE)
            .bytes(&self.sw_in)
            .bytes(&self.sw_out)
            .u8(self.sub_switch)
            .u8(self.acn_priority)
            .u8(self.command.into());
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            net_switch: r.u8(12),
            bind_index: r.u8(13),
            short_name: r.text(14, SHORT_NAME_SIZE),
            long_name: r.text(32, LONG_NAME_SIZE),
            sw_in: r.array(96),
            sw_out: r.array(100),
            sub_switch: r.u8(104),
            acn_priority: r.u8(105),
            command: AddressCommand::from(r.u8(106)),
        }
    }
}

/// ArtInput content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtInput {
    /// Protocol revision.
    pub protocol: u16,
    /// Bind index of the node being addressed.
    pub bind_index: u8,
    /// Number of input ports.
    pub num_ports: u16,
    /// Per port input state; bit 0 set disables the input.
    pub input: [u8; 4],
}

impl Default for ArtInput {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            bind_index: 0,
            num_ports: 0,
            input: [0; 4],
        }
    }
}

impl PacketContent for ArtInput {
    const OPCODE: OpCode = OpCode::Input;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .u8(0)
            .u8(self.bind_index)
            .be16(self.num_ports)
            .bytes(&self.input);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            bind_index: r.u8(13),
            num_ports: r.be16(14),
            input: r.array(16),
        }
    }
}

/// ArtIpProg content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtIpProg {
    /// Protocol revision.
    pub protocol: u16,
    /// What to program.
    pub command: IpProgCommand,
    /// IP address to program.
    pub ip_address: Ipv4Addr,
    /// Subnet mask to program.
    pub subnet_mask: Ipv4Addr,
    /// UDP port to program (deprecated).
    pub port: u16,
    /// Default gateway to program.
    pub gateway: Ipv4Addr,
}

impl Default for ArtIpProg {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            command: IpProgCommand::empty(),
            ip_address: Ipv4Addr::UNSPECIFIED,
            subnet_mask: Ipv4Addr::UNSPECIFIED,
            port: 0,
            gateway: Ipv4Addr::UNSPECIFIED,
        }
    }
}

impl PacketContent for ArtIpProg {
    const OPCODE: OpCode = OpCode::IpProg;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .zeros(2)
            .u8(self.command.bits())
            .u8(0)
            .bytes(&self.ip_address.octets())
            .bytes(&self.subnet_mask.octets())
            .be16(self.port)
            .bytes(&self.gateway.octets())
            .zeros(4);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            command: IpProgCommand::from_bits(r.u8(14)),
            ip_address: Ipv4Addr::from(r.array::<4>(16)),
            subnet_mask: Ipv4Addr::from(r.array::<4>(20)),
            port: r.be16(24),
            gateway: Ipv4Addr::from(r.array::<4>(26)),
        }
    }
}

/// ArtIpProgReply content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtIpProgReply {
    /// Protocol revision.
    pub protocol: u16,
    /// Current IP address.
    pub ip_address: Ipv4Addr,
    /// Current subnet mask.
    pub subnet_mask: Ipv4Addr,
    /// Current UDP port.
    pub port: u16,
    /// Node status.
    pub status: IpProgStatus,
    /// Current default gateway.
    pub gateway: Ipv4Addr,
}

impl Default for ArtIpProgReply {
    fn default() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            ip_address: Ipv4Addr::UNSPECIFIED,
            subnet_mask: Ipv4Addr::UNSPECIFIED,
            port: 0,
            status: IpProgStatus::empty(),
            gateway: Ipv4Addr::UNSPECIFIED,
        }
    }
}

impl PacketContent for ArtIpProgReply {
    const OPCODE: OpCode = OpCode::IpProgReply;

    fn encode(&self, w: &mut PacketWriter) {
        w.be16(self.protocol)
            .zeros(4)
            .bytes(&self.ip_address.octets())
            .bytes(&self.subnet_mask.octets())
            .be16(self.port)
            .u8(self.status.bits())
            .u8(0)
            .bytes(&self.gateway.octets())
            .zeros(2);
    }

    fn decode(r: &PacketReader<'_>) -> Self {
        Self {
            protocol: r.be16(10),
            ip_address: Ipv4Addr::from(r.array::<4>(16)),
            subnet_mask: Ipv4Addr::from(r.array::<4>(20)),
            port: r.be16(24),
            status: IpProgStatus::from_bits(r.u8(26)),
            gateway: Ipv4Addr::from(r.array::<4>(28)),
        }
    }
}
