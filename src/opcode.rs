//! Art-Net opcode definitions.
//!
//! Every Art-Net packet carries a 16-bit opcode right after the 8-byte
//! signature, transmitted low byte first. This module maps the opcodes known to
//! the protocol onto the [`OpCode`] enum and records which of them this crate
//! implements.
//!
//! | Group | Opcodes | Implemented |
//! |-------|---------|:-----------:|
//! | Discovery | Poll, PollReply | ✓ |
//! | Diagnostics | DiagData, Command, DataRequest, DataReply | ✓ |
//! | Streaming | Dmx, Nzs, Sync | ✓ |
//! | Configuration | Address, Input, IpProg, IpProgReply | ✓ |
//! | Show control | Trigger, TimeCode | ✓ |
//! | RDM | TodRequest, TodData, TodControl, Rdm, RdmSub | ✗ |
//! | Media / video / files / firmware | ... | ✗ |
//!
//! Unimplemented opcodes still round-trip through the codec with empty content.
//!
//! # Example
//!
//! ```
//! use artnet_dmx::OpCode;
//!
//! assert_eq!(OpCode::from_u16(0x5000), Some(OpCode::Dmx));
//! assert_eq!(OpCode::Dmx.as_u16(), 0x5000);
//! assert!(OpCode::Dmx.is_implemented());
//! assert!(!OpCode::Rdm.is_implemented());
//! assert_eq!(OpCode::Dmx.to_string(), "OpDmx");
//! ```

/// Art-Net opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCode {
    /// ArtPoll - discovery request.
    Poll,
    /// ArtPollReply - discovery response.
    PollReply,
    /// ArtDiagData - diagnostics text.
    DiagData,
    /// ArtCommand - text based property set command.
    Command,
    /// ArtDataRequest - request for product data.
    DataRequest,
    /// ArtDataReply - product data reply.
    DataReply,
    /// ArtDmx - zero start code DMX512 data.
    Dmx,
    /// ArtNzs - non-zero start code DMX512 data (and VLC).
    Nzs,
    /// ArtSync - synchronises DMX output across nodes.
    Sync,
    /// ArtAddress - remote node programming.
    Address,
    /// ArtInput - enables/disables node inputs.
    Input,
    /// ArtTodRequest (RDM).
    TodRequest,
    /// ArtTodData (RDM).
    TodData,
    /// ArtTodControl (RDM).
    TodControl,
    /// ArtRdm (RDM).
    Rdm,
    /// ArtRdmSub (RDM).
    RdmSub,
    /// ArtVideoSetup.
    VideoSetup,
    /// ArtVideoPalette.
    VideoPalette,
    /// ArtVideoData.
    VideoData,
    /// ArtMacMaster (deprecated).
    MacMaster,
    /// ArtMacSlave (deprecated).
    MacSlave,
    /// ArtFirmwareMaster.
    FirmwareMaster,
    /// ArtFirmwareReply.
    FirmwareReply,
    /// ArtFileTnMaster.
    FileTnMaster,
    /// ArtFileFnMaster.
    FileFnMaster,
    /// ArtFileFnReply.
    FileFnReply,
    /// ArtIpProg - IP address programming.
    IpProg,
    /// ArtIpProgReply - IP address programming reply.
    IpProgReply,
    /// ArtMedia.
    Media,
    /// ArtMediaPatch.
    MediaPatch,
    /// ArtMediaControl.
    MediaControl,
    /// ArtMediaControlReply.
    MediaControlReply,
    /// ArtTimeCode - time code transport.
    TimeCode,
    /// ArtTimeSync.
    TimeSync,
    /// ArtTrigger - show control triggers.
    Trigger,
    /// ArtDirectory.
    Directory,
    /// ArtDirectoryReply.
    DirectoryReply,
}

impl OpCode {
    /// All opcodes known to this crate.
    pub const ALL: [OpCode; 37] = [
        OpCode::Poll,
        OpCode::PollReply,
        OpCode::DiagData,
        OpCode::Command,
        OpCode::DataRequest,
        OpCode::DataReply,
        OpCode::Dmx,
        OpCode::Nzs,
        OpCode::Sync,
        OpCode::Address,
        OpCode::Input,
        OpCode::TodRequest,
        OpCode::TodData,
        OpCode::TodControl,
        OpCode::Rdm,
        OpCode::RdmSub,
        OpCode::VideoSetup,
        OpCode::VideoPalette,
        OpCode::VideoData,
        OpCode::MacMaster,
        OpCode::MacSlave,
        OpCode::FirmwareMaster,
        OpCode::FirmwareReply,
        OpCode::FileTnMaster,
        OpCode::FileFnMaster,
        OpCode::FileFnReply,
        OpCode::IpProg,
        OpCode::IpProgReply,
        OpCode::Media,
        OpCode::MediaPatch,
        OpCode::MediaControl,
        OpCode::MediaControlReply,
        OpCode::TimeCode,
        OpCode::TimeSync,
        OpCode::Trigger,
        OpCode::Directory,
        OpCode::DirectoryReply,
    ];

    /// Returns the 16-bit wire value of this opcode.
    pub fn as_u16(self) -> u16 {
        match self {
            OpCode::Poll => 0x2000,
            OpCode::PollReply => 0x2100,
            OpCode::DiagData => 0x2300,
            OpCode::Command => 0x2400,
            OpCode::DataRequest => 0x2700,
            OpCode::DataReply => 0x2800,
            OpCode::Dmx => 0x5000,
            OpCode::Nzs => 0x5100,
            OpCode::Sync => 0x5200,
            OpCode::Address => 0x6000,
            OpCode::Input => 0x7000,
            OpCode::TodRequest => 0x8000,
            OpCode::TodData => 0x8100,
            OpCode::TodControl => 0x8200,
            OpCode::Rdm => 0x8300,
            OpCode::RdmSub => 0x8400,
            OpCode::VideoSetup => 0xA010,
            OpCode::VideoPalette => 0xA020,
            OpCode::VideoData => 0xA040,
            OpCode::MacMaster => 0xF000,
            OpCode::MacSlave => 0xF100,
            OpCode::FirmwareMaster => 0xF200,
            OpCode::FirmwareReply => 0xF300,
            OpCode::FileTnMaster => 0xF400,
            OpCode::FileFnMaster => 0xF500,
            OpCode::FileFnReply => 0xF600,
            OpCode::IpProg => 0xF800,
            OpCode::IpProgReply => 0xF900,
            OpCode::Media => 0x9000,
            OpCode::MediaPatch => 0x9100,
            OpCode::MediaControl => 0x9200,
            OpCode::MediaControlReply => 0x9300,
            OpCode::TimeCode => 0x9700,
            OpCode::TimeSync => 0x9800,
            OpCode::Trigger => 0x9900,
            OpCode::Directory => 0x9A00,
            OpCode::DirectoryReply => 0x9B00,
        }
    }

    /// Looks up an opcode by its wire value.
    ///
    /// Returns `None` for values that are not Art-Net opcodes.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_u16() == value)
    }

    /// Returns whether this crate encodes and decodes the opcode's content.
    ///
    /// Unimplemented opcodes are passed through with empty content.
    pub fn is_implemented(self) -> bool {
        matches!(
            self,
            OpCode::Poll
                | OpCode::PollReply
                | OpCode::DiagData
                | OpCode::Command
                | OpCode::DataRequest
                | OpCode::DataReply
                | OpCode::Dmx
                | OpCode::Nzs
                | OpCode::Sync
                | OpCode::Address
                | OpCode::Input
                | OpCode::Trigger
                | OpCode::TimeCode
                | OpCode::IpProg
                | OpCode::IpProgReply
        )
    }

    fn name(self) -> &'static str {
        match self {
            OpCode::Poll => "OpPoll",
            OpCode::PollReply => "OpPollReply",
            OpCode::DiagData => "OpDiagData",
            OpCode::Command => "OpCommand",
            OpCode::DataRequest => "OpDataRequest",
            OpCode::DataReply => "OpDataReply",
            OpCode::Dmx => "OpDmx",
            OpCode::Nzs => "OpNzs",
            OpCode::Sync => "OpSync",
            OpCode::Address => "OpAddress",
            OpCode::Input => "OpInput",
            OpCode::TodRequest => "OpTodRequest",
            OpCode::TodData => "OpTodData",
            OpCode::TodControl => "OpTodControl",
            OpCode::Rdm => "OpRdm",
            OpCode::RdmSub => "OpRdmSub",
            OpCode::VideoSetup => "OpVideoSetup",
            OpCode::VideoPalette => "OpVideoPalette",
            OpCode::VideoData => "OpVideoData",
            OpCode::MacMaster => "OpMacMaster",
            OpCode::MacSlave => "OpMacSlave",
            OpCode::FirmwareMaster => "OpFirmwareMaster",
            OpCode::FirmwareReply => "OpFirmwareReply",
            OpCode::FileTnMaster => "OpFileTnMaster",
            OpCode::FileFnMaster => "OpFileFnMaster",
            OpCode::FileFnReply => "OpFileFnReply",
            OpCode::IpProg => "OpIpProg",
            OpCode::IpProgReply => "OpIpProgReply",
            OpCode::Media => "OpMedia",
            OpCode::MediaPatch => "OpMediaPatch",
            OpCode::MediaControl => "OpMediaControl",
            OpCode::MediaControlReply => "OpMediaContrlReply",
            OpCode::TimeCode => "OpTimeCode",
            OpCode::TimeSync => "OpTimeSync",
            OpCode::Trigger => "OpTrigger",
            OpCode::Directory => "OpDirectory",
            OpCode::DirectoryReply => "OpDirectoryReply",
        }
    }
}

impl From<OpCode> for u16 {
    fn from(op: OpCode) -> u16 {
        op.as_u16()
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
