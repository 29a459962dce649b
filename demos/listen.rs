//! Example: Listening to Art-Net traffic
//!
//! Run with: cargo run --example listen
//!
//! This example demonstrates:
//! - Opening a controller that answers ArtPoll
//! - Receiving and printing inbound messages
//! - Inspecting raw packets

use artnet_dmx::{utils::format_hex, ArtNetMessage, Controller, ControllerConfig, DeviceStyle};
use std::time::Duration;

#[tokio::main]
async fn main() -> artnet_dmx::Result<()> {
    let config = ControllerConfig::new()
        .with_node_names("artnet-dmx listener", "listener")
        .with_device_style(DeviceStyle::Visual);
    let controller = Controller::new(config)?;
    let mut inbound = controller.open()?;
    println!("Listening on port 6454 for 30 seconds");

    let deadline = tokio::time::sleep(Duration::from_secs(30));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            received = inbound.recv() => {
                let Some(received) = received else { break };
                match received.message {
                    ArtNetMessage::Dmx(dmx) => println!(
                        "{} DMX net {} sub-uni {} seq {} ({} channels)",
                        received.source,
                        dmx.net(),
                        dmx.sub_uni(),
                        dmx.sequence,
                        dmx.data.len()
                    ),
                    ArtNetMessage::Poll(_) => println!("{} ArtPoll (answered)", received.source),
                    ArtNetMessage::PollReply(reply) => println!(
                        "{} ArtPollReply {} '{}'",
                        received.source, reply.ip_address, reply.long_name
                    ),
                    other => println!(
                        "{} opcode 0x{:04X}: {}",
                        received.source,
                        other.raw_opcode(),
                        format_hex(&received.packet)
                    ),
                }
            }
        }
    }

    controller.close().await;
    Ok(())
}
