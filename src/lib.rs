//! # Art-Net DMX Library
//!
//! A Rust library for sending DMX512 lighting data over Art-Net (protocol
//! revision 14) and for encoding and decoding the Art-Net packets a simple
//! controller deals with.
//!
//! ## Features
//!
//! - **Controller**: per-universe channel buffers with dirty tracking, a
//!   25 ms send throttle and a periodic full refresh
//! - **Discovery**: answers ArtPoll with one ArtPollReply per local IPv4 address
//! - **Codec**: typed encoders and total decoders for 15 opcodes, including
//!   VLC payloads carried in ArtNzs
//! - **No panics**: all errors returned as `Result<T, ArtNetError>`; malformed
//!   packets decode to default field values instead of failing
//!
//! ## Quick Start
//!
//! ```no_run
//! use artnet_dmx::{Controller, ControllerConfig};
//!
//! #[tokio::main]
//! async fn main() -> artnet_dmx::Result<()> {
//!     // Broadcast to 255.255.255.255:6454
//!     let controller = Controller::new(ControllerConfig::new())?;
//!     let _inbound = controller.open()?;
//!
//!     // Channel 1 of universe 0 to full
//!     controller.set_channel(0, 1, 255).await?;
//!
//!     // Channels 10-12 of universe 1
//!     controller.set_channels(1, 10, &[255, 127, 0]).await?;
//!
//!     controller.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Addressing
//!
//! How the socket is bound follows from the destination, see [`BindPlan`]:
//!
//! | Destination | Bind |
//! |-------------|------|
//! | `255.255.255.255` with an interface | that interface, broadcast enabled |
//! | `x.x.x.255` | all interfaces, broadcast enabled |
//! | unicast | all interfaces on the Art-Net port, or an ephemeral port when not listening |
//!
//! ## Packets
//!
//! Every packet type implements [`PacketContent`]. [`ArtNetMessage`] wraps
//! them for transport, and [`parse_packet`] decodes whatever arrives:
//!
//! ```
//! use artnet_dmx::{parse_packet, ArtDmx, ArtNetMessage, PacketContent};
//!
//! let packet = ArtDmx::new(0x0102, vec![255, 0, 128]).to_packet();
//! assert_eq!(&packet[..8], b"Art-Net\0");
//!
//! match parse_packet(&packet) {
//!     ArtNetMessage::Dmx(dmx) => {
//!         assert_eq!(dmx.net(), 1);
//!         assert_eq!(dmx.sub_uni(), 2);
//!         assert_eq!(dmx.data, vec![255, 0, 128]);
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use artnet_dmx::{ArtNetError, Controller, ControllerConfig};
//!
//! # async fn run() -> artnet_dmx::Result<()> {
//! let controller = Controller::new(ControllerConfig::new())?;
//! match controller.set_channel(0, 600, 255).await {
//!     Ok(sent) => println!("send requested: {}", sent),
//!     Err(ArtNetError::NotOpen) => println!("open the controller first"),
//!     Err(ArtNetError::InvalidParameter { parameter, reason }) => {
//!         println!("bad {}: {}", parameter, reason);
//!     }
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```
//! use artnet_dmx::{ControllerConfig, DeviceStyle, SocketConfig};
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! let config = ControllerConfig::new()
//!     .with_socket(
//!         SocketConfig::new()
//!             .with_host(Ipv4Addr::new(10, 0, 0, 20)) // Unicast to one node
//!             .with_listen(false),                    // Do not bind port 6454
//!     )
//!     .with_refresh(Duration::from_secs(1))           // Default: 4s
//!     .with_sequence(true)                            // Number ArtDmx packets
//!     .with_node_names("Stage left console", "SL console")
//!     .with_device_style(DeviceStyle::Controller);
//! assert_eq!(config.socket.port, 6454);
//! ```
//!
//! ## Logging
//!
//! The library logs through [`tracing`] and installs no subscriber.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod controller;
mod definitions;
mod error;
mod header;
mod interfaces;
mod messages;
mod opcode;
mod packet;
mod transport;
mod universe;
pub mod utils;

// Public re-exports
pub use controller::{
    Controller, ControllerConfig, TriggerRequest, DEFAULT_REFRESH, MAX_UNIVERSE, THROTTLE_WINDOW,
};
pub use definitions::{
    AddressCommand, DataRequestCode, DeviceStyle, IpProgCommand, IpProgStatus, PollFlags,
    Priority, TimeCodeType, TriggerKey, VlcFlags, VlcPayloadLanguage,
};
pub use error::{ArtNetError, Result};
pub use header::{ArtNetHeader, ARTNET_SIGNATURE, HEADER_SIZE};
pub use interfaces::{InterfaceLister, LocalInterface, StaticInterfaces, SystemInterfaces};
pub use messages::{
    port_address, vlc_checksum, ArtAddress, ArtCommand, ArtDataReply, ArtDataRequest, ArtDiagData,
    ArtDmx, ArtInput, ArtIpProg, ArtIpProgReply, ArtNzs, ArtPoll, ArtPollReply, ArtSync,
    ArtTimeCode, ArtTrigger, Vlc, LONG_NAME_SIZE, NODE_REPORT_SIZE, SHORT_NAME_SIZE,
    TRIGGER_DATA_SIZE, VLC_HEADER_SIZE, VLC_MAGIC, VLC_START_CODE,
};
pub use opcode::OpCode;
pub use packet::{
    build_packet, decode_content, encode_content, is_artnet_packet, parse_packet, ArtNetMessage,
    PacketContent, PacketReader, PacketWriter, DMX_CHANNELS, MAX_TEXT_LENGTH, PROTOCOL_VERSION,
};
pub use transport::{
    ArtNetSocket, BindPlan, InboundMessage, SocketConfig, TransportStats, DEFAULT_ARTNET_PORT,
    INBOUND_CHANNEL_CAPACITY, MAX_PACKET_SIZE,
};
pub use universe::Universe;
