//! High-level Art-Net controller.
//!
//! This module provides [`Controller`], which keeps a channel buffer per
//! universe and turns channel writes into ArtDmx packets on the network.
//!
//! # Overview
//!
//! The controller handles:
//! - Dirty tracking, so a normal send only carries the channels up to the
//!   highest one that changed
//! - A 25 ms throttle window per universe; writes during the window are
//!   coalesced into one send when it closes
//! - A periodic refresh that resends all 512 channels of every universe in use
//! - Replies to ArtPoll discovery with one ArtPollReply per local IPv4 address
//!
//! # Example
//!
//! ```no_run
//! use std::net::Ipv4Addr;
//! use artnet_dmx::{Controller, ControllerConfig, SocketConfig, TriggerRequest};
//!
//! # async fn run() -> artnet_dmx::Result<()> {
//! let config = ControllerConfig::new()
//!     .with_socket(SocketConfig::new().with_host(Ipv4Addr::new(2, 255, 255, 255)));
//! let controller = Controller::new(config)?;
//! let _inbound = controller.open()?;
//!
//! // Channel 1 of universe 0 to full
//! controller.set_channel(0, 1, 255).await?;
//!
//! // Channels 10, 11 and 12 of universe 3
//! controller.set_channels(3, 10, &[255, 127, 0]).await?;
//!
//! controller.trigger(TriggerRequest::new(0x02)).await?;
//! controller.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Every method takes `&self`. Timers run as Tokio tasks, so the controller
//! must be opened from within a Tokio runtime.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tracing::{debug, trace, warn};

use crate::definitions::DeviceStyle;
use crate::error::{ArtNetError, Result};
use crate::interfaces::{InterfaceLister, SystemInterfaces};
use crate::messages::{ArtDmx, ArtPollReply, ArtTrigger};
use crate::packet::{ArtNetMessage, DMX_CHANNELS};
use crate::transport::{
    ArtNetSocket, InboundMessage, SocketConfig, TransportStats, DEFAULT_ARTNET_PORT,
    INBOUND_CHANNEL_CAPACITY,
};
use crate::universe::Universe;

/// Minimum spacing between two sends of the same universe.
pub const THROTTLE_WINDOW: Duration = Duration::from_millis(25);

/// Default interval of the full-universe refresh.
pub const DEFAULT_REFRESH: Duration = Duration::from_millis(4000);

/// Highest 15-bit Port-Address.
pub const MAX_UNIVERSE: u16 = 0x7FFF;

/// Configuration for creating a [`Controller`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    /// Socket settings.
    pub socket: SocketConfig,
    /// Interval of the full-universe refresh.
    pub refresh: Duration,
    /// Send all 512 channels on every send instead of the dirty prefix.
    pub send_all: bool,
    /// Number ArtDmx packets 1-255 instead of sending sequence 0.
    pub sequence: bool,
    /// Long name reported in ArtPollReply.
    pub node_name: String,
    /// Short name reported in ArtPollReply.
    pub short_node_name: String,
    /// Style reported in ArtPollReply.
    pub device_style: DeviceStyle,
}

impl ControllerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the socket configuration.
    pub fn with_socket(mut self, socket: SocketConfig) -> Self {
        self.socket = socket;
        self
    }

    /// Sets the refresh interval.
    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    /// Sets whether every send carries all 512 channels.
    pub fn with_send_all(mut self, send_all: bool) -> Self {
        self.send_all = send_all;
        self
    }

    /// Sets whether ArtDmx packets are numbered.
    pub fn with_sequence(mut self, sequence: bool) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sets the long and short names reported to pollers.
    pub fn with_node_names(mut self, long: impl Into<String>, short: impl Into<String>) -> Self {
        self.node_name = long.into();
        self.short_node_name = short.into();
        self
    }

    /// Sets the style reported to pollers.
    pub fn with_device_style(mut self, style: DeviceStyle) -> Self {
        self.device_style = style;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            socket: SocketConfig::default(),
            refresh: DEFAULT_REFRESH,
            send_all: false,
            sequence: false,
            node_name: "Art Net device".to_string(),
            short_node_name: "ArtNet device".to_string(),
            device_style: DeviceStyle::Node,
        }
    }
}

/// Parameters of an ArtTrigger sent by [`Controller::trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerRequest {
    /// OEM code of the targeted product, `0xFFFF` for all.
    pub oem: u16,
    /// Trigger key.
    pub key: u8,
    /// Trigger sub-key.
    pub sub_key: u8,
}

impl TriggerRequest {
    /// Creates a request for all products with the given key.
    pub fn new(key: u8) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    /// Sets the sub-key.
    pub fn with_sub_key(mut self, sub_key: u8) -> Self {
        self.sub_key = sub_key;
        self
    }

    /// Sets the OEM code.
    pub fn with_oem(mut self, oem: u16) -> Self {
        self.oem = oem;
        self
    }
}

impl Default for TriggerRequest {
    fn default() -> Self {
        Self {
            oem: 0xFFFF,
            key: 0xFF,
            sub_key: 0,
        }
    }
}

impl From<TriggerRequest> for ArtTrigger {
    fn from(request: TriggerRequest) -> Self {
        ArtTrigger {
            oem: request.oem,
            key: request.key,
            sub_key: request.sub_key,
            ..ArtTrigger::default()
        }
    }
}

struct Shared {
    config: ControllerConfig,
    socket: ArtNetSocket,
    universes: Mutex<HashMap<u16, Arc<Mutex<Universe>>>>,
    closed: AtomicBool,
    replying: AtomicBool,
    interfaces: Box<dyn InterfaceLister>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
    /// Latest reply burst; replaced by the next one.
    reply_task: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn universe(&self, universe: u16) -> Arc<Mutex<Universe>> {
        Arc::clone(self.universes.lock().entry(universe).or_default())
    }

    /// Runs the per-universe state machine and returns the packet to send now,
    /// if any.
    fn schedule(self: &Arc<Self>, universe: u16, refresh: bool) -> Option<ArtNetMessage> {
        let refresh = refresh || self.config.send_all;
        let entry = self.universe(universe);
        let mut state = entry.lock();
        if self.is_closed() {
            return None;
        }

        if state.refresh.is_none() {
            state.refresh = Some(self.spawn_refresh(universe));
        }

        if state.throttle.is_some() {
            state.pending = Some(state.pending.unwrap_or(false) || refresh);
            trace!(universe, refresh, "send coalesced into throttle window");
            return None;
        }

        state.throttle = Some(self.spawn_throttle(universe));
        let data = state.take_payload(refresh);
        let sequence = if self.config.sequence {
            state.next_sequence()
        } else {
            0
        };
        Some(
            ArtDmx {
                sequence,
                ..ArtDmx::new(universe, data)
            }
            .into(),
        )
    }

    async fn request_send(self: &Arc<Self>, universe: u16, refresh: bool) -> Result<()> {
        if let Some(message) = self.schedule(universe, refresh) {
            self.socket.send(&message).await?;
        }
        Ok(())
    }

    fn spawn_throttle(self: &Arc<Self>, universe: u16) -> JoinHandle<()> {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            sleep(THROTTLE_WINDOW).await;
            if shared.is_closed() {
                return;
            }
            let pending = {
                let entry = shared.universe(universe);
                let mut state = entry.lock();
                state.throttle = None;
                state.pending.take()
            };
            if let Some(refresh) = pending {
                if let Err(e) = shared.request_send(universe, refresh).await {
                    warn!(universe, error = %e, "deferred DMX send failed");
                }
            }
        })
    }

    fn spawn_refresh(self: &Arc<Self>, universe: u16) -> JoinHandle<()> {
        let shared = Arc::clone(self);
        let period = self.config.refresh;
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if shared.is_closed() {
                    break;
                }
                if let Err(e) = shared.request_send(universe, true).await {
                    warn!(universe, error = %e, "DMX refresh failed");
                }
            }
        })
    }

    async fn dispatch(
        self: Arc<Self>,
        mut inbound: mpsc::Receiver<InboundMessage>,
        tx: mpsc::Sender<InboundMessage>,
    ) {
        while let Some(received) = inbound.recv().await {
            if self.is_closed() {
                break;
            }
            if matches!(received.message, ArtNetMessage::Poll(_)) {
                self.handle_poll();
            }
            if let Err(mpsc::error::TrySendError::Full(dropped)) = tx.try_send(received) {
                debug!(source = %dropped.source, "inbound channel full, message dropped");
            }
        }
    }

    /// Starts a reply burst unless one is in flight.
    fn handle_poll(self: &Arc<Self>) {
        if self.replying.swap(true, Ordering::SeqCst) {
            debug!("poll ignored, reply burst in flight");
            return;
        }
        let shared = Arc::clone(self);
        let task = tokio::spawn(async move {
            shared.reply_to_poll().await;
            shared.replying.store(false, Ordering::SeqCst);
        });
        *self.reply_task.lock() = Some(task);
    }

    async fn reply_to_poll(&self) {
        let interfaces = match self.interfaces.ipv4_interfaces() {
            Ok(interfaces) => interfaces,
            Err(e) => {
                warn!(error = %e, "cannot answer poll");
                return;
            }
        };
        debug!(count = interfaces.len(), "answering poll");

        for iface in interfaces {
            if self.is_closed() {
                return;
            }
            let reply = ArtPollReply {
                ip_address: iface.ip,
                port: DEFAULT_ARTNET_PORT,
                net_switch: 0,
                sub_switch: 0,
                short_name: self.config.short_node_name.clone(),
                long_name: self.config.node_name.clone(),
                style: self.config.device_style,
                mac_address: iface.mac,
                ..ArtPollReply::default()
            };
            if let Err(e) = self.socket.send(&reply.into()).await {
                warn!(ip = %iface.ip, error = %e, "poll reply failed");
            }
        }
    }

    /// Marks the controller closed and cancels every timer and task.
    fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        for entry in self.universes.lock().values() {
            entry.lock().cancel_timers();
        }
        for task in [self.dispatcher.lock().take(), self.reply_task.lock().take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}

/// Art-Net controller sending DMX for any number of universes.
///
/// # Example
///
/// ```
/// use artnet_dmx::{Controller, ControllerConfig};
///
/// let controller = Controller::new(ControllerConfig::new()).unwrap();
/// assert!(!controller.is_open());
/// assert_eq!(controller.dirty_count(0), 0);
/// ```
pub struct Controller {
    shared: Arc<Shared>,
}

impl Controller {
    /// Creates a controller answering polls with the system's interfaces.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the refresh interval is zero.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        Self::with_interfaces(config, SystemInterfaces)
    }

    /// Creates a controller answering polls with the given interfaces.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the refresh interval is zero.
    pub fn with_interfaces(
        config: ControllerConfig,
        interfaces: impl InterfaceLister + 'static,
    ) -> Result<Self> {
        if config.refresh.is_zero() {
            return Err(ArtNetError::invalid_parameter(
                "refresh",
                "must be greater than zero",
            ));
        }
        let socket = ArtNetSocket::new(config.socket.clone());
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                socket,
                universes: Mutex::new(HashMap::new()),
                closed: AtomicBool::new(false),
                replying: AtomicBool::new(false),
                interfaces: Box::new(interfaces),
                dispatcher: Mutex::new(None),
                reply_task: Mutex::new(None),
            }),
        })
    }

    /// Opens the socket.
    ///
    /// Every inbound Art-Net message is published on the returned channel.
    /// ArtPoll is answered before it is forwarded. When the channel is full,
    /// messages are dropped.
    ///
    /// # Errors
    ///
    /// Returns `Closed` after [`close`](Self::close), `AlreadyOpen` if open,
    /// or the I/O error from binding the socket.
    pub fn open(&self) -> Result<mpsc::Receiver<InboundMessage>> {
        if self.shared.is_closed() {
            return Err(ArtNetError::Closed);
        }
        let inbound = self.shared.socket.open()?;
        let (tx, rx) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);
        let dispatcher = tokio::spawn(Arc::clone(&self.shared).dispatch(inbound, tx));
        *self.shared.dispatcher.lock() = Some(dispatcher);
        Ok(rx)
    }

    /// Sets one channel (1-512).
    ///
    /// Returns whether the value changed and a send was requested.
    ///
    /// # Errors
    ///
    /// See [`set_channels`](Self::set_channels).
    pub async fn set_channel(&self, universe: u16, channel: u16, value: u8) -> Result<bool> {
        self.set_channels(universe, channel, &[value]).await
    }

    /// Sets a channel (1-512) of universe 0.
    ///
    /// # Errors
    ///
    /// See [`set_channels`](Self::set_channels).
    pub async fn set_universe_channel(&self, channel: u16, value: u8) -> Result<bool> {
        self.set_channels(0, channel, &[value]).await
    }

    /// Sets consecutive channels starting at `channel` (1-512).
    ///
    /// Only values that differ from the buffer mark channels dirty. When
    /// anything changed, a send is requested: it goes out now, or when the
    /// universe's throttle window closes.
    ///
    /// Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// - `Closed` after [`close`](Self::close)
    /// - `NotOpen` before [`open`](Self::open)
    /// - `InvalidParameter` for a universe above 32767, a channel outside
    ///   1-512, or values running past channel 512
    /// - the I/O error of an immediate send
    pub async fn set_channels(&self, universe: u16, channel: u16, values: &[u8]) -> Result<bool> {
        self.ensure_open()?;
        validate_universe(universe)?;
        if channel == 0 || usize::from(channel) > DMX_CHANNELS {
            return Err(ArtNetError::invalid_parameter(
                "channel",
                format!("{} is outside 1-{}", channel, DMX_CHANNELS),
            ));
        }
        let index = usize::from(channel) - 1;
        if index + values.len() > DMX_CHANNELS {
            return Err(ArtNetError::invalid_parameter(
                "values",
                format!(
                    "{} values starting at channel {} exceed {} channels",
                    values.len(),
                    channel,
                    DMX_CHANNELS
                ),
            ));
        }

        let changed = self.shared.universe(universe).lock().write(index, values);
        if changed {
            self.shared.request_send(universe, false).await?;
        }
        Ok(changed)
    }

    /// Sends an ArtTrigger immediately.
    ///
    /// # Errors
    ///
    /// Returns `Closed`, `NotOpen` or the I/O error of the send.
    pub async fn trigger(&self, request: TriggerRequest) -> Result<()> {
        self.ensure_open()?;
        let trigger: ArtTrigger = request.into();
        self.shared.socket.send(&trigger.into()).await?;
        Ok(())
    }

    /// Closes the controller.
    ///
    /// Cancels every timer and task, then releases the socket. The
    /// controller cannot be reopened.
    pub async fn close(&self) {
        self.shared.shutdown();
        self.shared.socket.close().await;
    }

    /// Changes the destination host while closed.
    ///
    /// # Errors
    ///
    /// See [`ArtNetSocket::set_host`].
    pub fn set_host(&self, host: Ipv4Addr) -> Result<()> {
        self.shared.socket.set_host(host)
    }

    /// Changes the destination port while closed.
    ///
    /// # Errors
    ///
    /// See [`ArtNetSocket::set_port`].
    pub fn set_port(&self, port: u16) -> Result<()> {
        self.shared.socket.set_port(port)
    }

    /// Returns the channel buffer of a universe that has been written.
    pub fn channels(&self, universe: u16) -> Option<[u8; DMX_CHANNELS]> {
        let entry = self.shared.universes.lock().get(&universe).cloned()?;
        let channels = *entry.lock().channels();
        Some(channels)
    }

    /// Returns the number of leading channels of a universe waiting to be sent.
    pub fn dirty_count(&self, universe: u16) -> usize {
        let entry = self.shared.universes.lock().get(&universe).cloned();
        entry.map_or(0, |entry| entry.lock().dirty_count())
    }

    /// Returns whether the socket is open.
    pub fn is_open(&self) -> bool {
        self.shared.socket.is_open()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.shared.config
    }

    /// Returns the socket's transfer statistics.
    pub fn stats(&self) -> TransportStats {
        self.shared.socket.stats()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.shared.is_closed() {
            Err(ArtNetError::Closed)
        } else if !self.shared.socket.is_open() {
            Err(ArtNetError::NotOpen)
        } else {
            Ok(())
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shared.shutdown();
        self.shared.socket.release();
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.shared.config)
            .field("socket", &self.shared.socket)
            .field("closed", &self.shared.is_closed())
            .finish()
    }
}

fn validate_universe(universe: u16) -> Result<()> {
    if universe > MAX_UNIVERSE {
        return Err(ArtNetError::invalid_parameter(
            "universe",
            format!("{} exceeds {}", universe, MAX_UNIVERSE),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{LocalInterface, StaticInterfaces};
    use crate::messages::ArtPoll;
    use crate::packet::{parse_packet, PacketContent};
    use crate::transport::MAX_PACKET_SIZE;

    fn receiver() -> (std::net::UdpSocket, u16) {
        let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = socket.local_addr().unwrap().port();
        (socket, port)
    }

    fn free_port() -> u16 {
        receiver().1
    }

    fn local_config(port: u16) -> ControllerConfig {
        ControllerConfig::new().with_socket(
            SocketConfig::new()
                .with_host(Ipv4Addr::LOCALHOST)
                .with_port(port)
                .with_listen(false),
        )
    }

    fn next_dmx(receiver: &std::net::UdpSocket) -> ArtDmx {
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let (len, _) = receiver.recv_from(&mut buffer).unwrap();
        match parse_packet(&buffer[..len]) {
            ArtNetMessage::Dmx(dmx) => dmx,
            other => panic!("expected ArtDmx, got {:?}", other),
        }
    }

    /// Lets spawned tasks run without moving the paused clock.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.socket.host, Ipv4Addr::BROADCAST);
        assert_eq!(config.socket.port, 6454);
        assert_eq!(config.refresh, Duration::from_millis(4000));
        assert!(!config.send_all);
        assert!(!config.sequence);
        assert_eq!(config.node_name, "Art Net device");
        assert_eq!(config.short_node_name, "ArtNet device");
        assert_eq!(config.device_style, DeviceStyle::Node);
    }

    #[test]
    fn test_trigger_request_defaults() {
        let request = TriggerRequest::default();
        assert_eq!((request.oem, request.key, request.sub_key), (0xFFFF, 0xFF, 0));

        let trigger: ArtTrigger = TriggerRequest::new(2).with_sub_key(5).with_oem(0x10).into();
        assert_eq!((trigger.oem, trigger.key, trigger.sub_key), (0x10, 2, 5));
        assert!(trigger.data.is_empty());
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let config = ControllerConfig::new().with_refresh(Duration::ZERO);
        assert!(matches!(
            Controller::new(config),
            Err(ArtNetError::InvalidParameter { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_requires_open() {
        let controller = Controller::new(local_config(free_port())).unwrap();
        assert!(matches!(
            controller.set_channel(0, 1, 255).await,
            Err(ArtNetError::NotOpen)
        ));
        assert!(matches!(
            controller.trigger(TriggerRequest::default()).await,
            Err(ArtNetError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_closed_controller_rejects_everything() {
        let controller = Controller::new(local_config(free_port())).unwrap();
        let _rx = controller.open().unwrap();
        controller.close().await;

        assert!(!controller.is_open());
        assert!(matches!(controller.open(), Err(ArtNetError::Closed)));
        assert!(matches!(
            controller.set_channel(0, 1, 255).await,
            Err(ArtNetError::Closed)
        ));
        // Closing twice is harmless
        controller.close().await;
    }

    #[tokio::test]
    async fn test_parameter_validation() {
        let controller = Controller::new(local_config(free_port())).unwrap();
        let _rx = controller.open().unwrap();

        for (universe, channel, values) in [
            (0u16, 0u16, &[1u8][..]),
            (0, 513, &[1][..]),
            (0x8000, 1, &[1][..]),
            (0, 511, &[1, 2, 3][..]),
        ] {
            let result = controller.set_channels(universe, channel, values).await;
            assert!(
                matches!(result, Err(ArtNetError::InvalidParameter { .. })),
                "universe {} channel {} accepted",
                universe,
                channel
            );
        }
        assert_eq!(controller.stats().packets_sent, 0);
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_value_set() {
        let (receiver, port) = receiver();
        let controller = Controller::new(local_config(port)).unwrap();
        let _rx = controller.open().unwrap();

        assert!(controller.set_channels(3, 10, &[255, 127, 1]).await.unwrap());
        let channels = controller.channels(3).unwrap();
        assert_eq!(&channels[9..12], &[255, 127, 1]);
        assert_eq!(controller.dirty_count(3), 0);

        let dmx = next_dmx(&receiver);
        assert_eq!(dmx.port_address, 3);
        assert_eq!(dmx.data.len(), 12);
        assert_eq!(&dmx.data[9..], &[255, 127, 1]);
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_coalesces_sends() {
        let (receiver, port) = receiver();
        let controller = Controller::new(local_config(port)).unwrap();
        let _rx = controller.open().unwrap();

        assert!(controller.set_channel(1, 1, 255).await.unwrap());
        assert!(controller.set_channel(1, 1, 0).await.unwrap());
        assert_eq!(controller.stats().packets_sent, 1);
        assert_eq!(controller.dirty_count(1), 1);

        tokio::time::advance(THROTTLE_WINDOW).await;
        settle().await;
        assert_eq!(controller.stats().packets_sent, 2);

        tokio::time::advance(THROTTLE_WINDOW).await;
        settle().await;
        assert_eq!(controller.stats().packets_sent, 2);

        assert_eq!(next_dmx(&receiver).data, vec![255]);
        assert_eq!(next_dmx(&receiver).data, vec![0]);
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_value_does_not_send() {
        let (_receiver, port) = receiver();
        let controller = Controller::new(local_config(port)).unwrap();
        let _rx = controller.open().unwrap();

        assert!(controller.set_universe_channel(5, 9).await.unwrap());
        tokio::time::advance(THROTTLE_WINDOW).await;
        settle().await;

        assert!(!controller.set_universe_channel(5, 9).await.unwrap());
        assert_eq!(controller.stats().packets_sent, 1);
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_resends_full_universe() {
        let (receiver, port) = receiver();
        let config = local_config(port).with_refresh(Duration::from_millis(1000));
        let controller = Controller::new(config).unwrap();
        let _rx = controller.open().unwrap();

        controller.set_channel(7, 2, 42).await.unwrap();
        assert_eq!(controller.stats().packets_sent, 1);

        for expected in 2..=4 {
            tokio::time::advance(Duration::from_millis(1000)).await;
            settle().await;
            assert_eq!(controller.stats().packets_sent, expected);
        }

        assert_eq!(next_dmx(&receiver).data.len(), 2);
        let refreshed = next_dmx(&receiver);
        assert_eq!(refreshed.data.len(), 512);
        assert_eq!(refreshed.data[1], 42);
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_refresh() {
        let (_receiver, port) = receiver();
        let config = local_config(port).with_refresh(Duration::from_millis(100));
        let controller = Controller::new(config).unwrap();
        let _rx = controller.open().unwrap();

        controller.set_channel(0, 1, 1).await.unwrap();
        controller.close().await;

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(controller.stats().packets_sent, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_all_sends_full_universe() {
        let (receiver, port) = receiver();
        let controller = Controller::new(local_config(port).with_send_all(true)).unwrap();
        let _rx = controller.open().unwrap();

        controller.set_channel(0, 1, 1).await.unwrap();
        assert_eq!(next_dmx(&receiver).data.len(), 512);
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_numbers() {
        let (receiver, port) = receiver();
        let controller = Controller::new(local_config(port).with_sequence(true)).unwrap();
        let _rx = controller.open().unwrap();

        controller.set_channel(0, 1, 1).await.unwrap();
        tokio::time::advance(THROTTLE_WINDOW).await;
        settle().await;
        controller.set_channel(0, 1, 2).await.unwrap();

        assert_eq!(next_dmx(&receiver).sequence, 1);
        assert_eq!(next_dmx(&receiver).sequence, 2);
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_is_not_throttled() {
        let (receiver, port) = receiver();
        let controller = Controller::new(local_config(port)).unwrap();
        let _rx = controller.open().unwrap();

        controller.set_channel(0, 1, 1).await.unwrap();
        controller
            .trigger(TriggerRequest::new(1).with_sub_key(3))
            .await
            .unwrap();
        assert_eq!(controller.stats().packets_sent, 2);

        next_dmx(&receiver);
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let (len, _) = receiver.recv_from(&mut buffer).unwrap();
        let trigger = ArtTrigger::from_packet(&buffer[..len]);
        assert_eq!((trigger.oem, trigger.key, trigger.sub_key), (0xFFFF, 1, 3));
        assert_eq!(len, 18 + 512);
        controller.close().await;
    }

    #[tokio::test]
    async fn test_poll_is_answered_and_forwarded() {
        let port = free_port();
        let config = ControllerConfig::new()
            .with_socket(
                SocketConfig::new()
                    .with_host(Ipv4Addr::LOCALHOST)
                    .with_port(port),
            )
            .with_node_names("Test console", "Console")
            .with_device_style(DeviceStyle::Controller);
        let mac = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
        let interfaces = StaticInterfaces::new(vec![LocalInterface::new(Ipv4Addr::LOCALHOST, mac)]);
        let controller = Controller::with_interfaces(config, interfaces).unwrap();
        let mut rx = controller.open().unwrap();

        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(&ArtPoll::default().to_packet(), ("127.0.0.1", port))
            .unwrap();

        let mut saw_poll = false;
        let reply = loop {
            let inbound = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();
            match inbound.message {
                ArtNetMessage::Poll(_) => saw_poll = true,
                ArtNetMessage::PollReply(reply) => break reply,
                _ => {}
            }
        };

        assert!(saw_poll);
        assert_eq!(reply.ip_address, Ipv4Addr::LOCALHOST);
        assert_eq!(reply.port, 0x1936);
        assert_eq!(reply.mac_address, mac);
        assert_eq!(reply.long_name, "Test console");
        assert_eq!(reply.short_name, "Console");
        assert_eq!(reply.style, DeviceStyle::Controller);
        controller.close().await;
    }

    async fn next_poll_reply(rx: &mut mpsc::Receiver<InboundMessage>) -> ArtPollReply {
        loop {
            let inbound = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();
            if let ArtNetMessage::PollReply(reply) = inbound.message {
                return *reply;
            }
        }
    }

    #[tokio::test]
    async fn test_poll_answered_again_after_burst() {
        let port = free_port();
        let config = ControllerConfig::new().with_socket(
            SocketConfig::new()
                .with_host(Ipv4Addr::LOCALHOST)
                .with_port(port),
        );
        let interfaces = StaticInterfaces::new(vec![LocalInterface::new(Ipv4Addr::LOCALHOST, [0; 6])]);
        let controller = Controller::with_interfaces(config, interfaces).unwrap();
        let mut rx = controller.open().unwrap();
        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();

        for round in 1..=5u64 {
            sender
                .send_to(&ArtPoll::default().to_packet(), ("127.0.0.1", port))
                .unwrap();
            next_poll_reply(&mut rx).await;

            tokio::time::timeout(Duration::from_secs(2), async {
                while controller.shared.replying.load(Ordering::SeqCst) {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
            .await
            .unwrap();
            assert_eq!(controller.stats().packets_sent, round);
        }

        // Only the latest burst is kept
        assert!(controller.shared.reply_task.lock().as_ref().unwrap().is_finished());
        controller.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_during_throttle_window_is_deferred_in_full() {
        let (receiver, port) = receiver();
        let config = local_config(port).with_refresh(Duration::from_millis(1000));
        let controller = Controller::new(config).unwrap();
        let _rx = controller.open().unwrap();

        controller.set_channel(0, 1, 10).await.unwrap();
        tokio::time::advance(Duration::from_millis(990)).await;
        settle().await;

        // Opens a window that is still open when the refresh is due
        controller.set_channel(0, 2, 20).await.unwrap();
        assert_eq!(controller.stats().packets_sent, 2);

        tokio::time::advance(Duration::from_millis(10)).await;
        settle().await;
        assert_eq!(controller.stats().packets_sent, 2);

        tokio::time::advance(Duration::from_millis(15)).await;
        settle().await;
        assert_eq!(controller.stats().packets_sent, 3);

        assert_eq!(next_dmx(&receiver).data, vec![10]);
        assert_eq!(next_dmx(&receiver).data, vec![10, 20]);
        let deferred = next_dmx(&receiver);
        assert_eq!(deferred.data.len(), 512);
        assert_eq!(&deferred.data[..2], &[10, 20]);
        controller.close().await;
    }

    #[tokio::test]
    async fn test_drop_without_close_frees_port() {
        let port = free_port();
        let config = ControllerConfig::new().with_socket(
            SocketConfig::new()
                .with_host(Ipv4Addr::LOCALHOST)
                .with_port(port),
        );
        let controller = Controller::new(config).unwrap();
        let _rx = controller.open().unwrap();
        drop(controller);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(std::net::UdpSocket::bind(("127.0.0.1", port)).is_ok());
    }

    #[tokio::test]
    async fn test_poll_ignored_during_reply_burst() {
        let controller = Controller::new(local_config(free_port())).unwrap();
        controller.shared.replying.store(true, Ordering::SeqCst);
        controller.shared.handle_poll();
        assert!(controller.shared.reply_task.lock().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_roundtrip() {
        let config = ControllerConfig::new()
            .with_send_all(true)
            .with_device_style(DeviceStyle::Media);
        let json = serde_json::to_string(&config).unwrap();
        let decoded: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_controller_debug() {
        let controller = Controller::new(ControllerConfig::new()).unwrap();
        let debug_str = format!("{:?}", controller);
        assert!(debug_str.contains("Controller"));
        assert!(debug_str.contains("Art Net device"));
    }
}
