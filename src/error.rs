//! Error types for Art-Net communication.

use std::io;
use thiserror::Error;

/// Result type alias for Art-Net operations.
pub type Result<T> = std::result::Result<T, ArtNetError>;

/// Errors that can occur while configuring or using an Art-Net socket or controller.
///
/// Decoding is total and never produces an error: malformed or truncated
/// packets decode with zeroed fields instead.
#[derive(Debug, Error)]
pub enum ArtNetError {
    /// The socket was opened twice.
    #[error("Socket is already open; close it first")]
    AlreadyOpen,

    /// An operation required an open socket.
    #[error("Socket is not open; open it first")]
    NotOpen,

    /// A setting was changed after the socket was opened.
    #[error("Cannot change {setting} while the socket is open")]
    ConfigLocked {
        /// Name of the locked setting.
        setting: &'static str,
    },

    /// The port was changed while the host is the limited broadcast address.
    #[error("Cannot change port while using the broadcast address 255.255.255.255")]
    BroadcastPort,

    /// The controller was closed and cannot be used again.
    #[error("Controller is closed")]
    Closed,

    /// Invalid parameter provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// Local network interfaces could not be enumerated.
    #[error("Interface lookup failed: {reason}")]
    InterfaceLookup {
        /// Description of the failure.
        reason: String,
    },

    /// I/O error from the underlying socket.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ArtNetError {
    /// Creates a new `ConfigLocked` error.
    ///
    /// # Example
    ///
    /// ```
    /// use artnet_dmx::ArtNetError;
    ///
    /// let err = ArtNetError::config_locked("host");
    /// assert_eq!(err.to_string(), "Cannot change host while the socket is open");
    /// ```
    pub fn config_locked(setting: &'static str) -> Self {
        Self::ConfigLocked { setting }
    }

    /// Creates a new `InvalidParameter` error.
    ///
    /// # Example
    ///
    /// ```
    /// use artnet_dmx::ArtNetError;
    ///
    /// let err = ArtNetError::invalid_parameter("channel", "must be 1-512");
    /// ```
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `InterfaceLookup` error.
    pub fn interface_lookup(reason: impl Into<String>) -> Self {
        Self::InterfaceLookup {
            reason: reason.into(),
        }
    }

    /// Returns whether this error comes from misconfiguration rather than I/O.
    ///
    /// # Example
    ///
    /// ```
    /// use artnet_dmx::ArtNetError;
    ///
    /// assert!(ArtNetError::BroadcastPort.is_configuration());
    /// assert!(!ArtNetError::interface_lookup("no such device").is_configuration());
    /// ```
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::AlreadyOpen
                | Self::NotOpen
                | Self::ConfigLocked { .. }
                | Self::BroadcastPort
                | Self::Closed
                | Self::InvalidParameter { .. }
        )
    }
}
