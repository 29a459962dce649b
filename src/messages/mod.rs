//! Typed content for every implemented opcode.
//!
//! Each content type implements [`PacketContent`](crate::PacketContent) and
//! is wrapped by a variant of [`ArtNetMessage`](crate::ArtNetMessage).
//!
//! ## Discovery
//! - [`ArtPoll`] - find nodes on the network
//! - [`ArtPollReply`] - describe a node
//!
//! ## Diagnostics and product data
//! - [`ArtDiagData`] - diagnostics text
//! - [`ArtCommand`] - text based property commands
//! - [`ArtDataRequest`] / [`ArtDataReply`] - product URLs and manufacturer data
//!
//! ## Streaming
//! - [`ArtDmx`] - zero start code DMX512 frames
//! - [`ArtNzs`] - non-zero start code frames, optionally carrying a [`Vlc`] packet
//! - [`ArtSync`] - output synchronisation
//!
//! ## Node configuration
//! - [`ArtAddress`] - remote programming of names, switches and commands
//! - [`ArtInput`] - enable or disable inputs
//! - [`ArtIpProg`] / [`ArtIpProgReply`] - IP address programming
//!
//! ## Show control
//! - [`ArtTrigger`] - macro, key and show triggers
//! - [`ArtTimeCode`] - time code

mod control;
mod diagnostics;
mod discovery;
mod dmx;
mod node;

pub use control::{ArtTimeCode, ArtTrigger, TRIGGER_DATA_SIZE};
pub use diagnostics::{ArtCommand, ArtDataReply, ArtDataRequest, ArtDiagData};
pub use discovery::{ArtPoll, ArtPollReply, LONG_NAME_SIZE, NODE_REPORT_SIZE, SHORT_NAME_SIZE};
pub use dmx::{
    port_address, vlc_checksum, ArtDmx, ArtNzs, ArtSync, Vlc, VLC_HEADER_SIZE, VLC_MAGIC,
    VLC_START_CODE,
};
pub use node::{ArtAddress, ArtInput, ArtIpProg, ArtIpProgReply};
