//! UDP transport layer for Art-Net communication.
//!
//! This module provides [`ArtNetSocket`], which owns the UDP socket, decides
//! how to bind it, serializes outbound messages and publishes inbound ones on
//! a channel.
//!
//! # Addressing
//!
//! How the socket is bound depends on the destination host, see
//! [`BindPlan::resolve`]:
//!
//! | Host | Interface | Listen | Plan |
//! |------|-----------|--------|------|
//! | `255.255.255.255` | set | - | [`BindPlan::Interface`] |
//! | `x.x.x.255` | - | - | [`BindPlan::Broadcast`] |
//! | unicast | - | `true` | [`BindPlan::Listen`] |
//! | unicast | - | `false` | [`BindPlan::SendOnly`] |
//!
//! All plans except `SendOnly` bind the Art-Net port with address reuse, so
//! several Art-Net programs can share it, and receive packets.
//!
//! # Constants
//!
//! - [`DEFAULT_ARTNET_PORT`] - Default Art-Net UDP port (6454)
//! - [`MAX_PACKET_SIZE`] - Receive buffer size (2048 bytes)
//!
//! # Example
//!
//! ```no_run
//! use artnet_dmx::{ArtDmx, ArtNetSocket, SocketConfig};
//!
//! # async fn run() -> artnet_dmx::Result<()> {
//! let socket = ArtNetSocket::new(SocketConfig::new());
//! let mut inbound = socket.open()?;
//!
//! socket.send(&ArtDmx::new(0, vec![255; 512]).into()).await?;
//!
//! if let Some(received) = inbound.recv().await {
//!     println!("{} sent {:?}", received.source, received.message.opcode());
//! }
//! socket.close().await;
//! # Ok(())
//! # }
//! ```

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use parking_lot::Mutex;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{ArtNetError, Result};
use crate::packet::{build_packet, is_artnet_packet, parse_packet, ArtNetMessage};

/// Default Art-Net UDP port.
pub const DEFAULT_ARTNET_PORT: u16 = 6454;

/// Maximum UDP packet size accepted from the network.
pub const MAX_PACKET_SIZE: usize = 2048;

/// Capacity of the inbound message channel.
pub const INBOUND_CHANNEL_CAPACITY: usize = 256;

/// Socket settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketConfig {
    /// Destination host.
    pub host: Ipv4Addr,
    /// Destination port, also the local port for receiving plans.
    pub port: u16,
    /// Local interface to bind when broadcasting to `255.255.255.255`.
    pub interface: Option<Ipv4Addr>,
    /// Whether a unicast socket should bind the Art-Net port to receive.
    pub listen: bool,
}

impl SocketConfig {
    /// Creates the default configuration: broadcast to port 6454.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the destination host.
    pub fn with_host(mut self, host: Ipv4Addr) -> Self {
        self.host = host;
        self
    }

    /// Sets the destination port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the local interface.
    pub fn with_interface(mut self, interface: Ipv4Addr) -> Self {
        self.interface = Some(interface);
        self
    }

    /// Sets whether a unicast socket binds the Art-Net port.
    pub fn with_listen(mut self, listen: bool) -> Self {
        self.listen = listen;
        self
    }

    /// Returns whether the host is the limited broadcast address.
    pub fn is_limited_broadcast(&self) -> bool {
        self.host == Ipv4Addr::BROADCAST
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::BROADCAST,
            port: DEFAULT_ARTNET_PORT,
            interface: None,
            listen: true,
        }
    }
}

/// How the socket is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindPlan {
    /// Bind a specific interface with broadcast enabled.
    Interface {
        /// Interface address.
        addr: Ipv4Addr,
        /// Local port.
        port: u16,
    },
    /// Bind all interfaces with broadcast enabled.
    Broadcast {
        /// Local port.
        port: u16,
    },
    /// Bind all interfaces to receive unicast traffic.
    Listen {
        /// Local port.
        port: u16,
    },
    /// Ephemeral local port, nothing is received.
    SendOnly,
}

impl BindPlan {
    /// Chooses a plan for a configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use artnet_dmx::{BindPlan, SocketConfig};
    ///
    /// let config = SocketConfig::new().with_host(Ipv4Addr::new(192, 168, 1, 255));
    /// assert_eq!(BindPlan::resolve(&config), BindPlan::Broadcast { port: 6454 });
    ///
    /// let config = SocketConfig::new()
    ///     .with_host(Ipv4Addr::new(192, 168, 1, 10))
    ///     .with_listen(false);
    /// assert_eq!(BindPlan::resolve(&config), BindPlan::SendOnly);
    /// ```
    pub fn resolve(config: &SocketConfig) -> Self {
        let port = config.port;
        match config.interface {
            Some(addr) if config.is_limited_broadcast() => BindPlan::Interface { addr, port },
            _ if config.host.octets()[3] == 255 => BindPlan::Broadcast { port },
            _ if config.listen => BindPlan::Listen { port },
            _ => BindPlan::SendOnly,
        }
    }

    /// Returns the local address to bind.
    pub fn local_addr(&self) -> SocketAddrV4 {
        match *self {
            BindPlan::Interface { addr, port } => SocketAddrV4::new(addr, port),
            BindPlan::Broadcast { port } | BindPlan::Listen { port } => {
                SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port)
            }
            BindPlan::SendOnly => SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0),
        }
    }

    /// Returns whether broadcast is enabled on the socket.
    pub fn broadcast(&self) -> bool {
        matches!(self, BindPlan::Interface { .. } | BindPlan::Broadcast { .. })
    }

    /// Returns whether the socket receives packets.
    pub fn receives(&self) -> bool {
        !matches!(self, BindPlan::SendOnly)
    }
}

/// A decoded packet received from the network.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Decoded message.
    pub message: ArtNetMessage,
    /// Raw datagram.
    pub packet: Vec<u8>,
    /// Sender address.
    pub source: SocketAddr,
}

/// Transfer statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Packets sent.
    pub packets_sent: u64,
    /// Bytes sent.
    pub bytes_sent: u64,
    /// Packets received, including dropped ones.
    pub packets_received: u64,
    /// Bytes received.
    pub bytes_received: u64,
    /// Datagrams dropped because they were not Art-Net.
    pub packets_dropped: u64,
    /// Send errors.
    pub send_errors: u64,
    /// Receive errors.
    pub recv_errors: u64,
}

struct OpenSocket {
    socket: Arc<UdpSocket>,
    plan: BindPlan,
    destination: SocketAddrV4,
    recv_task: Option<JoinHandle<()>>,
}

/// UDP socket speaking Art-Net.
///
/// Every method takes `&self`, so the socket can be shared between tasks
/// behind an `Arc`.
pub struct ArtNetSocket {
    config: Mutex<SocketConfig>,
    state: Mutex<Option<OpenSocket>>,
    stats: Arc<Mutex<TransportStats>>,
}

impl ArtNetSocket {
    /// Creates a closed socket.
    pub fn new(config: SocketConfig) -> Self {
        Self {
            config: Mutex::new(config),
            state: Mutex::new(None),
            stats: Arc::new(Mutex::new(TransportStats::default())),
        }
    }

    /// Binds the socket and starts receiving.
    ///
    /// Returns the channel on which inbound messages are published. For the
    /// [`BindPlan::SendOnly`] plan the channel is closed from the start.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` if the socket is open, or an I/O error if the
    /// socket cannot be created or bound.
    pub fn open(&self) -> Result<mpsc::Receiver<InboundMessage>> {
        let mut state = self.state.lock();
        if state.is_some() {
            return Err(ArtNetError::AlreadyOpen);
        }

        let config = self.config.lock().clone();
        let plan = BindPlan::resolve(&config);
        let socket = Arc::new(UdpSocket::from_std(bind_socket(&plan)?)?);
        let (tx, rx) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);

        let recv_task = plan.receives().then(|| {
            tokio::spawn(receive_loop(
                Arc::clone(&socket),
                tx,
                Arc::clone(&self.stats),
            ))
        });

        info!(
            ?plan,
            host = %config.host,
            port = config.port,
            local = ?socket.local_addr().ok(),
            "Art-Net socket opened"
        );

        *state = Some(OpenSocket {
            socket,
            plan,
            destination: SocketAddrV4::new(config.host, config.port),
            recv_task,
        });
        Ok(rx)
    }

    /// Encodes and sends a message to the configured host and port.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `NotOpen` if the socket is closed, or the I/O error reported
    /// by the operating system.
    pub async fn send(&self, message: &ArtNetMessage) -> Result<usize> {
        let (socket, destination) = {
            let state = self.state.lock();
            let open = state.as_ref().ok_or(ArtNetError::NotOpen)?;
            (Arc::clone(&open.socket), open.destination)
        };

        let packet = build_packet(message);
        match socket.send_to(&packet, destination).await {
            Ok(n) => {
                let mut stats = self.stats.lock();
                stats.packets_sent += 1;
                stats.bytes_sent += n as u64;
                debug!(opcode = message.raw_opcode(), bytes = n, %destination, "sent");
                Ok(n)
            }
            Err(e) => {
                self.stats.lock().send_errors += 1;
                Err(ArtNetError::Io(e))
            }
        }
    }

    /// Stops receiving and releases the socket. Does nothing when closed.
    pub async fn close(&self) {
        let open = self.state.lock().take();
        let Some(open) = open else {
            return;
        };

        if let Some(task) = open.recv_task {
            task.abort();
            let _ = task.await;
        }
        info!(plan = ?open.plan, "Art-Net socket closed");
    }

    /// Stops the receive task and releases the socket without waiting for
    /// the task to finish. Used where `close` cannot be awaited.
    pub(crate) fn release(&self) {
        let open = self.state.lock().take();
        if let Some(open) = open {
            if let Some(task) = open.recv_task {
                task.abort();
            }
            debug!(plan = ?open.plan, "Art-Net socket released");
        }
    }

    /// Changes the destination host.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLocked` while the socket is open.
    pub fn set_host(&self, host: Ipv4Addr) -> Result<()> {
        if self.is_open() {
            return Err(ArtNetError::config_locked("host"));
        }
        self.config.lock().host = host;
        Ok(())
    }

    /// Changes the destination port.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLocked` while the socket is open and `BroadcastPort`
    /// while the host is `255.255.255.255`.
    pub fn set_port(&self, port: u16) -> Result<()> {
        if self.is_open() {
            return Err(ArtNetError::config_locked("port"));
        }
        let mut config = self.config.lock();
        if config.is_limited_broadcast() {
            return Err(ArtNetError::BroadcastPort);
        }
        config.port = port;
        Ok(())
    }

    /// Returns whether the socket is open.
    pub fn is_open(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> SocketConfig {
        self.config.lock().clone()
    }

    /// Returns the plan the socket was bound with, if open.
    pub fn bind_plan(&self) -> Option<BindPlan> {
        self.state.lock().as_ref().map(|open| open.plan)
    }

    /// Returns the local address, if open.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.state
            .lock()
            .as_ref()
            .and_then(|open| open.socket.local_addr().ok())
    }

    /// Returns transfer statistics.
    pub fn stats(&self) -> TransportStats {
        *self.stats.lock()
    }
}

impl Drop for ArtNetSocket {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ArtNetSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtNetSocket")
            .field("config", &*self.config.lock())
            .field("plan", &self.bind_plan())
            .field("local_addr", &self.local_addr())
            .finish()
    }
}

fn bind_socket(plan: &BindPlan) -> io::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(plan.broadcast())?;
    socket.set_nonblocking(true)?;
    socket.bind(&SockAddr::from(plan.local_addr()))?;
    Ok(socket.into())
}

async fn receive_loop(
    socket: Arc<UdpSocket>,
    tx: mpsc::Sender<InboundMessage>,
    stats: Arc<Mutex<TransportStats>>,
) {
    let mut buffer = vec![0u8; MAX_PACKET_SIZE];
    loop {
        let (len, source) = match socket.recv_from(&mut buffer).await {
            Ok(received) => received,
            Err(e) => {
                stats.lock().recv_errors += 1;
                warn!(error = %e, "receive failed");
                continue;
            }
        };

        {
            let mut stats = stats.lock();
            stats.packets_received += 1;
            stats.bytes_received += len as u64;
        }

        let packet = &buffer[..len];
        if !is_artnet_packet(packet) {
            stats.lock().packets_dropped += 1;
            debug!(%source, len, "dropping non Art-Net datagram");
            continue;
        }

        let inbound = InboundMessage {
            message: parse_packet(packet),
            packet: packet.to_vec(),
            source,
        };
        if tx.send(inbound).await.is_err() {
            debug!("inbound channel closed, stopping receive loop");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{ArtDmx, ArtPoll};
    use crate::packet::PacketContent;
    use std::time::Duration;

    fn free_port() -> u16 {
        std::net::UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    fn receiver() -> (std::net::UdpSocket, u16) {
        let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = socket.local_addr().unwrap().port();
        (socket, port)
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_ARTNET_PORT, 6454);
        assert_eq!(DEFAULT_ARTNET_PORT, 0x1936);
        assert_eq!(MAX_PACKET_SIZE, 2048);
    }

    #[test]
    fn test_bind_plan_default_host_broadcasts() {
        let plan = BindPlan::resolve(&SocketConfig::new());
        assert_eq!(plan, BindPlan::Broadcast { port: 6454 });
        assert!(plan.broadcast());
        assert_eq!(
            plan.local_addr(),
            SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 6454)
        );
    }

    #[test]
    fn test_bind_plan_subnet_broadcast() {
        let config = SocketConfig::new().with_host(Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(BindPlan::resolve(&config), BindPlan::Broadcast { port: 6454 });
    }

    #[test]
    fn test_bind_plan_unicast() {
        let config = SocketConfig::new().with_host(Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(BindPlan::resolve(&config), BindPlan::Listen { port: 6454 });
        assert!(!BindPlan::resolve(&config).broadcast());

        let config = config.with_listen(false);
        let plan = BindPlan::resolve(&config);
        assert_eq!(plan, BindPlan::SendOnly);
        assert!(!plan.receives());
        assert_eq!(plan.local_addr().port(), 0);
    }

    #[test]
    fn test_bind_plan_interface() {
        let iface = Ipv4Addr::new(10, 0, 0, 2);
        let config = SocketConfig::new().with_interface(iface);
        assert_eq!(
            BindPlan::resolve(&config),
            BindPlan::Interface {
                addr: iface,
                port: 6454
            }
        );

        // The interface only matters for the limited broadcast address
        let config = config.with_host(Ipv4Addr::new(10, 0, 0, 255));
        assert_eq!(BindPlan::resolve(&config), BindPlan::Broadcast { port: 6454 });
    }

    #[test]
    fn test_set_port_rejected_for_broadcast_host() {
        let socket = ArtNetSocket::new(SocketConfig::new());
        assert!(matches!(socket.set_port(7000), Err(ArtNetError::BroadcastPort)));

        socket.set_host(Ipv4Addr::LOCALHOST).unwrap();
        socket.set_port(7000).unwrap();
        assert_eq!(socket.config().port, 7000);
    }

    #[tokio::test]
    async fn test_send_requires_open() {
        let socket = ArtNetSocket::new(SocketConfig::new());
        let result = socket.send(&ArtPoll::default().into()).await;
        assert!(matches!(result, Err(ArtNetError::NotOpen)));
    }

    #[tokio::test]
    async fn test_open_locks_configuration() {
        let config = SocketConfig::new()
            .with_host(Ipv4Addr::LOCALHOST)
            .with_listen(false);
        let socket = ArtNetSocket::new(config);
        let _rx = socket.open().unwrap();

        assert!(socket.is_open());
        assert_eq!(socket.bind_plan(), Some(BindPlan::SendOnly));
        assert!(matches!(socket.open(), Err(ArtNetError::AlreadyOpen)));
        assert!(matches!(
            socket.set_host(Ipv4Addr::new(10, 0, 0, 1)),
            Err(ArtNetError::ConfigLocked { setting: "host" })
        ));
        assert!(matches!(
            socket.set_port(1),
            Err(ArtNetError::ConfigLocked { setting: "port" })
        ));

        socket.close().await;
        socket.close().await;
        assert!(!socket.is_open());
        socket.set_port(1).unwrap();
    }

    #[tokio::test]
    async fn test_send_reaches_destination() {
        let (receiver, port) = receiver();
        let config = SocketConfig::new()
            .with_host(Ipv4Addr::LOCALHOST)
            .with_port(port)
            .with_listen(false);
        let socket = ArtNetSocket::new(config);
        let _rx = socket.open().unwrap();

        let message = ArtDmx::new(1, vec![10, 20, 30]).into();
        let sent = socket.send(&message).await.unwrap();
        assert_eq!(sent, 21);

        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let (len, _) = receiver.recv_from(&mut buffer).unwrap();
        assert_eq!(&buffer[..len], build_packet(&message).as_slice());

        let stats = socket.stats();
        assert_eq!(stats.packets_sent, 1);
        assert_eq!(stats.bytes_sent, 21);
        socket.close().await;
    }

    #[tokio::test]
    async fn test_receive_publishes_artnet_packets_only() {
        let port = free_port();
        let config = SocketConfig::new()
            .with_host(Ipv4Addr::LOCALHOST)
            .with_port(port);
        let socket = ArtNetSocket::new(config);
        let mut rx = socket.open().unwrap();
        assert_eq!(socket.bind_plan(), Some(BindPlan::Listen { port }));

        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(b"not art-net", ("127.0.0.1", port)).unwrap();
        sender
            .send_to(&ArtPoll::default().to_packet(), ("127.0.0.1", port))
            .unwrap();

        let inbound = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(inbound.message, ArtNetMessage::Poll(_)));
        assert_eq!(inbound.packet, ArtPoll::default().to_packet());
        assert_eq!(inbound.source, sender.local_addr().unwrap());

        let stats = socket.stats();
        assert_eq!(stats.packets_received, 2);
        assert_eq!(stats.packets_dropped, 1);
        socket.close().await;
    }

    #[tokio::test]
    async fn test_drop_frees_port() {
        let port = free_port();
        let config = SocketConfig::new()
            .with_host(Ipv4Addr::LOCALHOST)
            .with_port(port);
        let socket = ArtNetSocket::new(config);
        let _rx = socket.open().unwrap();
        drop(socket);

        // Let the runtime drop the aborted receive task
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(std::net::UdpSocket::bind(("127.0.0.1", port)).is_ok());
    }

    #[test]
    fn test_socket_debug() {
        let socket = ArtNetSocket::new(SocketConfig::new());
        let debug_str = format!("{:?}", socket);
        assert!(debug_str.contains("ArtNetSocket"));
        assert!(debug_str.contains("255.255.255.255"));
    }
}
