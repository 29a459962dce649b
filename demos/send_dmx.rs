//! Example: Sending DMX to a universe
//!
//! Run with: cargo run --example send_dmx -- [host]
//!
//! This example demonstrates:
//! - Configuring and opening a controller
//! - Setting single and consecutive channels
//! - Throttled sends and the periodic refresh
//! - Sending an ArtTrigger

use artnet_dmx::{Controller, ControllerConfig, SocketConfig, TriggerKey, TriggerRequest};
use std::net::Ipv4Addr;
use std::time::Duration;

#[tokio::main]
async fn main() -> artnet_dmx::Result<()> {
    // =========================================================================
    // Open the controller
    // =========================================================================

    // Default destination is the limited broadcast address
    let host = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<Ipv4Addr>().ok())
        .unwrap_or(Ipv4Addr::BROADCAST);

    let config = ControllerConfig::new()
        .with_socket(SocketConfig::new().with_host(host))
        .with_refresh(Duration::from_secs(1))
        .with_sequence(true);
    let controller = Controller::new(config)?;
    let _inbound = controller.open()?;
    println!("Sending to {}:6454", host);

    // =========================================================================
    // Channel writes
    // =========================================================================

    // Only channels up to the highest changed one go out
    controller.set_channel(0, 1, 255).await?;
    controller.set_channels(0, 10, &[255, 127, 0]).await?;
    println!("Universe 0 ch1 = 255, ch10-12 = [255, 127, 0]");

    // =========================================================================
    // A fade, coalesced by the 25 ms throttle
    // =========================================================================

    for level in (0..=255u8).step_by(5) {
        controller.set_channel(1, 1, level).await?;
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    println!("Faded universe 1 ch1 to full");

    // =========================================================================
    // Trigger a macro on every device
    // =========================================================================

    let request = TriggerRequest::new(TriggerKey::Macro.into()).with_sub_key(1);
    controller.trigger(request).await?;
    println!("Sent macro trigger 1");

    // Let a couple of refreshes go out
    tokio::time::sleep(Duration::from_secs(3)).await;

    let stats = controller.stats();
    println!(
        "Sent {} packets ({} bytes)",
        stats.packets_sent, stats.bytes_sent
    );

    controller.close().await;
    Ok(())
}
