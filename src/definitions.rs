//! Enumerations and flag sets carried inside Art-Net messages.
//!
//! Fields that the wire format allows to hold any byte are modelled as enums
//! with an `Other` catch-all, so decoding an unexpected value never fails and
//! re-encoding reproduces the original byte.
//!
//! # Example
//!
//! ```
//! use artnet_dmx::{AddressCommand, DeviceStyle, PollFlags};
//!
//! assert_eq!(u8::from(DeviceStyle::Controller), 0x01);
//! assert_eq!(DeviceStyle::from(0x42), DeviceStyle::Other(0x42));
//!
//! assert_eq!(u8::from(AddressCommand::MergeLtp(2)), 0x12);
//! assert_eq!(AddressCommand::from(0xE5), AddressCommand::BackgroundQueuePolicy(5));
//!
//! let flags = PollFlags::DIAGNOSTICS | PollFlags::REPLY_ON_CHANGE;
//! assert_eq!(flags.bits(), 0b0000_0110);
//! assert!(flags.contains(PollFlags::DIAGNOSTICS));
//! ```

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        $name:ident($repr:ty) {
            $( $(#[$flag_meta:meta])* const $flag:ident = $value:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name($repr);

        impl $name {
            $( $(#[$flag_meta])* pub const $flag: $name = $name($value); )*

            /// Returns a set with no flags.
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Creates a set from raw bits, keeping unknown bits.
            pub const fn from_bits(bits: $repr) -> Self {
                Self(bits)
            }

            /// Returns the raw bits.
            pub const fn bits(self) -> $repr {
                self.0
            }

            /// Returns whether every flag in `other` is set.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Returns whether no flag is set.
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

/// Product style reported in ArtPollReply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceStyle {
    /// A DMX to/from Art-Net device.
    #[default]
    Node,
    /// A lighting console.
    Controller,
    /// A media server.
    Media,
    /// A network routing device.
    Route,
    /// A backup device.
    Backup,
    /// A configuration or diagnostic tool.
    Config,
    /// A visualiser.
    Visual,
    /// Any value not defined above.
    Other(u8),
}

impl From<u8> for DeviceStyle {
    fn from(value: u8) -> Self {
        match value {
            0x00 => DeviceStyle::Node,
            0x01 => DeviceStyle::Controller,
            0x02 => DeviceStyle::Media,
            0x03 => DeviceStyle::Route,
            0x04 => DeviceStyle::Backup,
            0x05 => DeviceStyle::Config,
            0x06 => DeviceStyle::Visual,
            other => DeviceStyle::Other(other),
        }
    }
}

impl From<DeviceStyle> for u8 {
    fn from(style: DeviceStyle) -> u8 {
        match style {
            DeviceStyle::Node => 0x00,
            DeviceStyle::Controller => 0x01,
            DeviceStyle::Media => 0x02,
            DeviceStyle::Route => 0x03,
            DeviceStyle::Backup => 0x04,
            DeviceStyle::Config => 0x05,
            DeviceStyle::Visual => 0x06,
            DeviceStyle::Other(value) => value,
        }
    }
}

/// Diagnostics priority used by ArtPoll and ArtDiagData.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// Low priority message.
    #[default]
    Low,
    /// Medium priority message.
    Medium,
    /// High priority message.
    High,
    /// Critical priority message.
    Critical,
    /// Volatile message, displayed on a single line.
    Volatile,
    /// Any value not defined above.
    Other(u8),
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        match value {
            0x10 => Priority::Low,
            0x40 => Priority::Medium,
            0x80 => Priority::High,
            0xE0 => Priority::Critical,
            0xF0 => Priority::Volatile,
            other => Priority::Other(other),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        match priority {
            Priority::Low => 0x10,
            Priority::Medium => 0x40,
            Priority::High => 0x80,
            Priority::Critical => 0xE0,
            Priority::Volatile => 0xF0,
            Priority::Other(value) => value,
        }
    }
}

/// Command field of ArtAddress.
///
/// Port-specific commands carry the port index (0-3) in their low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressCommand {
    /// No action.
    #[default]
    None,
    /// Cancel merge mode on the next ArtDmx.
    CancelMerge,
    /// Front panel indicators operate normally.
    LedNormal,
    /// Front panel indicators are muted.
    LedMute,
    /// Rapid flashing of indicators to locate the node.
    LedLocate,
    /// Reset receive error flags.
    ResetRx,
    /// Enable analysis and debugging mode.
    AnalysisOn,
    /// Disable analysis and debugging mode.
    AnalysisOff,
    /// Failsafe: hold last state.
    FailHold,
    /// Failsafe: outputs to zero.
    FailZero,
    /// Failsafe: outputs to full.
    FailFull,
    /// Failsafe: play the recorded failsafe scene.
    FailScene,
    /// Failsafe: record the current output as the failsafe scene.
    FailRecord,
    /// Set the port to LTP merge mode.
    MergeLtp(u8),
    /// Set the port direction to transmit.
    DirectionTx(u8),
    /// Set the port direction to receive.
    DirectionRx(u8),
    /// Set the port to HTP merge mode.
    MergeHtp(u8),
    /// Set the port to output Art-Net.
    ArtNetSelect(u8),
    /// Set the port to output sACN.
    AcnSelect(u8),
    /// Clear the port's DMX output buffer.
    ClearOutput(u8),
    /// Set the port to delta (changes only) output style.
    StyleDelta(u8),
    /// Set the port to constant (continuous) output style.
    StyleConstant(u8),
    /// Enable RDM on the port.
    RdmEnable(u8),
    /// Disable RDM on the port.
    RdmDisable(u8),
    /// Set the background queue policy (0-15).
    BackgroundQueuePolicy(u8),
    /// Any value not defined above.
    Other(u8),
}

impl From<u8> for AddressCommand {
    fn from(value: u8) -> Self {
        let port = value & 0x0F;
        match value {
            0x00 => AddressCommand::None,
            0x01 => AddressCommand::CancelMerge,
            0x02 => AddressCommand::LedNormal,
            0x03 => AddressCommand::LedMute,
            0x04 => AddressCommand::LedLocate,
            0x05 => AddressCommand::ResetRx,
            0x06 => AddressCommand::AnalysisOn,
            0x07 => AddressCommand::AnalysisOff,
            0x08 => AddressCommand::FailHold,
            0x09 => AddressCommand::FailZero,
            0x0A => AddressCommand::FailFull,
            0x0B => AddressCommand::FailScene,
            0x0C => AddressCommand::FailRecord,
            0x10..=0x13 => AddressCommand::MergeLtp(port),
            0x20..=0x23 => AddressCommand::DirectionTx(port),
            0x30..=0x33 => AddressCommand::DirectionRx(port),
            0x50..=0x53 => AddressCommand::MergeHtp(port),
            0x60..=0x63 => AddressCommand::ArtNetSelect(port),
            0x70..=0x73 => AddressCommand::AcnSelect(port),
            0x80..=0x83 => AddressCommand::ClearOutput(port),
            0xA0..=0xA3 => AddressCommand::StyleDelta(port),
            0xB0..=0xB3 => AddressCommand::StyleConstant(port),
            0xC0..=0xC3 => AddressCommand::RdmEnable(port),
            0xD0..=0xD3 => AddressCommand::RdmDisable(port),
            0xE0..=0xEF => AddressCommand::BackgroundQueuePolicy(port),
            other => AddressCommand::Other(other),
        }
    }
}

impl From<AddressCommand> for u8 {
    fn from(command: AddressCommand) -> u8 {
        match command {
            AddressCommand::None => 0x00,
            AddressCommand::CancelMerge => 0x01,
            AddressCommand::LedNormal => 0x02,
            AddressCommand::LedMute => 0x03,
            AddressCommand::LedLocate => 0x04,
            AddressCommand::ResetRx => 0x05,
            AddressCommand::AnalysisOn => 0x06,
            AddressCommand::AnalysisOff => 0x07,
            AddressCommand::FailHold => 0x08,
            AddressCommand::FailZero => 0x09,
            AddressCommand::FailFull => 0x0A,
            AddressCommand::FailScene => 0x0B,
            AddressCommand::FailRecord => 0x0C,
            AddressCommand::MergeLtp(port) => 0x10 | (port & 0x03),
            AddressCommand::DirectionTx(port) => 0x20 | (port & 0x03),
            AddressCommand::DirectionRx(port) => 0x30 | (port & 0x03),
            AddressCommand::MergeHtp(port) => 0x50 | (port & 0x03),
            AddressCommand::ArtNetSelect(port) => 0x60 | (port & 0x03),
            AddressCommand::AcnSelect(port) => 0x70 | (port & 0x03),
            AddressCommand::ClearOutput(port) => 0x80 | (port & 0x03),
            AddressCommand::StyleDelta(port) => 0xA0 | (port & 0x03),
            AddressCommand::StyleConstant(port) => 0xB0 | (port & 0x03),
            AddressCommand::RdmEnable(port) => 0xC0 | (port & 0x03),
            AddressCommand::RdmDisable(port) => 0xD0 | (port & 0x03),
            AddressCommand::BackgroundQueuePolicy(policy) => 0xE0 | (policy & 0x0F),
            AddressCommand::Other(value) => value,
        }
    }
}

/// Key field of ArtTrigger when the OEM code is `0xFFFF`.
///
/// For any other OEM code the key is manufacturer specific, so ArtTrigger
/// stores the raw byte and this enum is only a convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerKey {
    /// SubKey is an ASCII key press.
    Ascii,
    /// SubKey is a macro number.
    Macro,
    /// SubKey is a soft key number.
    Soft,
    /// SubKey is a show number.
    Show,
}

impl TriggerKey {
    /// Looks up a key from its wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TriggerKey::Ascii),
            1 => Some(TriggerKey::Macro),
            2 => Some(TriggerKey::Soft),
            3 => Some(TriggerKey::Show),
            _ => None,
        }
    }
}

impl From<TriggerKey> for u8 {
    fn from(key: TriggerKey) -> u8 {
        match key {
            TriggerKey::Ascii => 0,
            TriggerKey::Macro => 1,
            TriggerKey::Soft => 2,
            TriggerKey::Show => 3,
        }
    }
}

/// Frame rate family of ArtTimeCode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeCodeType {
    /// Film, 24 fps.
    #[default]
    Film,
    /// EBU, 25 fps.
    Ebu,
    /// DF, 29.97 fps.
    DropFrame,
    /// SMPTE, 30 fps.
    Smpte,
    /// Any value not defined above.
    Other(u8),
}

impl From<u8> for TimeCodeType {
    fn from(value: u8) -> Self {
        match value {
            0 => TimeCodeType::Film,
            1 => TimeCodeType::Ebu,
            2 => TimeCodeType::DropFrame,
            3 => TimeCodeType::Smpte,
            other => TimeCodeType::Other(other),
        }
    }
}

impl From<TimeCodeType> for u8 {
    fn from(kind: TimeCodeType) -> u8 {
        match kind {
            TimeCodeType::Film => 0,
            TimeCodeType::Ebu => 1,
            TimeCodeType::DropFrame => 2,
            TimeCodeType::Smpte => 3,
            TimeCodeType::Other(value) => value,
        }
    }
}

/// Request code of ArtDataRequest / ArtDataReply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataRequestCode {
    /// Controller polls whether ArtDataRequest is supported.
    #[default]
    Poll,
    /// URL of the manufacturer product page.
    UrlProduct,
    /// URL of the product user guide.
    UrlUserGuide,
    /// URL of the manufacturer support page.
    UrlSupport,
    /// URL of the UDR personality.
    UrlPersonalityUdr,
    /// URL of the GDTF personality.
    UrlPersonalityGdtf,
    /// Manufacturer specific request (`0x8000..=0xFFFF`).
    ManufacturerSpecific(u16),
    /// Any other value.
    Other(u16),
}

impl From<u16> for DataRequestCode {
    fn from(value: u16) -> Self {
        match value {
            0x0000 => DataRequestCode::Poll,
            0x0001 => DataRequestCode::UrlProduct,
            0x0002 => DataRequestCode::UrlUserGuide,
            0x0003 => DataRequestCode::UrlSupport,
            0x0004 => DataRequestCode::UrlPersonalityUdr,
            0x0005 => DataRequestCode::UrlPersonalityGdtf,
            0x8000..=0xFFFF => DataRequestCode::ManufacturerSpecific(value),
            other => DataRequestCode::Other(other),
        }
    }
}

impl From<DataRequestCode> for u16 {
    fn from(code: DataRequestCode) -> u16 {
        match code {
            DataRequestCode::Poll => 0x0000,
            DataRequestCode::UrlProduct => 0x0001,
            DataRequestCode::UrlUserGuide => 0x0002,
            DataRequestCode::UrlSupport => 0x0003,
            DataRequestCode::UrlPersonalityUdr => 0x0004,
            DataRequestCode::UrlPersonalityGdtf => 0x0005,
            DataRequestCode::ManufacturerSpecific(value) | DataRequestCode::Other(value) => value,
        }
    }
}

/// Payload language of a VLC packet embedded in ArtNzs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VlcPayloadLanguage {
    /// Payload is a beacon URL.
    #[default]
    BeaconUrl,
    /// Payload is plain text.
    Text,
    /// Payload is a location identifier.
    LocationId,
    /// Any value not defined above.
    Other(u16),
}

impl From<u16> for VlcPayloadLanguage {
    fn from(value: u16) -> Self {
        match value {
            0x0000 => VlcPayloadLanguage::BeaconUrl,
            0x0001 => VlcPayloadLanguage::Text,
            0x0002 => VlcPayloadLanguage::LocationId,
            other => VlcPayloadLanguage::Other(other),
        }
    }
}

impl From<VlcPayloadLanguage> for u16 {
    fn from(language: VlcPayloadLanguage) -> u16 {
        match language {
            VlcPayloadLanguage::BeaconUrl => 0x0000,
            VlcPayloadLanguage::Text => 0x0001,
            VlcPayloadLanguage::LocationId => 0x0002,
            VlcPayloadLanguage::Other(value) => value,
        }
    }
}

flag_set! {
    /// Flags field of ArtPoll.
    PollFlags(u8) {
        /// Only nodes within the target Port-Address range reply.
        const TARGETED_MODE = 0b0010_0000;
        /// Disable VLC transmission.
        const DISABLE_VLC = 0b0001_0000;
        /// Diagnostics are unicast to the poller instead of broadcast.
        const DIAGNOSTICS_UNICAST = 0b0000_1000;
        /// Send diagnostics messages.
        const DIAGNOSTICS = 0b0000_0100;
        /// Send ArtPollReply whenever node conditions change.
        const REPLY_ON_CHANGE = 0b0000_0010;
    }
}

flag_set! {
    /// Flags field of a VLC packet.
    VlcFlags(u8) {
        /// Payload is an IEEE VLC packet.
        const IEEE = 0b1000_0000;
        /// Reply requested.
        const REPLY = 0b0100_0000;
        /// Transmit continuously as a beacon.
        const BEACON = 0b0010_0000;
    }
}

flag_set! {
    /// Command field of ArtIpProg.
    IpProgCommand(u8) {
        /// Any programming at all is enabled.
        const ENABLE_PROGRAMMING = 0b1000_0000;
        /// Enable DHCP (overrides the address fields).
        const ENABLE_DHCP = 0b0100_0000;
        /// Program the default gateway.
        const PROGRAM_DEFAULT_GATEWAY = 0b0001_0000;
        /// Return IP, subnet mask and port to defaults.
        const RESET_TO_DEFAULT = 0b0000_1000;
        /// Program the IP address.
        const PROGRAM_IP_ADDRESS = 0b0000_0100;
        /// Program the subnet mask.
        const PROGRAM_SUBNET_MASK = 0b0000_0010;
        /// Program the UDP port (deprecated).
        const PROGRAM_PORT = 0b0000_0001;
    }
}

flag_set! {
    /// Status field of ArtIpProgReply.
    IpProgStatus(u8) {
        /// DHCP is enabled on the node.
        const DHCP_ENABLED = 0b0100_0000;
    }
}
