//! Common types used in the protocol.

use crate::constants::*;
use crate::error::ProtocolError;

/// Kind of frame, identified by its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageHeader {
    /// Radio configuration.
    Config,
    /// Radio payload.
    Payload,
    /// Positive acknowledgement.
    Ack,
    /// Negative acknowledgement.
    Nack,
    /// Device reset notification.
    Reset,
}

impl MessageHeader {
    /// Classify a header byte. Returns `None` for unknown tags.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            HEADER_CONFIG => Some(MessageHeader::Config),
            HEADER_PAYLOAD => Some(MessageHeader::Payload),
            HEADER_ACK => Some(MessageHeader::Ack),
            HEADER_NACK => Some(MessageHeader::Nack),
            HEADER_RESET => Some(MessageHeader::Reset),
            _ => None,
        }
    }

    /// The tag byte written on the wire.
    pub const fn to_byte(self) -> u8 {
        match self {
            MessageHeader::Config => HEADER_CONFIG,
            MessageHeader::Payload => HEADER_PAYLOAD,
            MessageHeader::Ack => HEADER_ACK,
            MessageHeader::Nack => HEADER_NACK,
            MessageHeader::Reset => HEADER_RESET,
        }
    }

    /// Total frame length, header included.
    pub const fn wire_len(self) -> usize {
        match self {
            MessageHeader::Config => CONFIG_WIRE_LEN,
            MessageHeader::Payload => PAYLOAD_WIRE_LEN,
            MessageHeader::Ack | MessageHeader::Nack | MessageHeader::Reset => SIGNAL_WIRE_LEN,
        }
    }

    /// Lowercase name, used for log lines and metric labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageHeader::Config => "config",
            MessageHeader::Payload => "payload",
            MessageHeader::Ack => "ack",
            MessageHeader::Nack => "nack",
            MessageHeader::Reset => "reset",
        }
    }
}

impl std::fmt::Display for MessageHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for MessageHeader {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        MessageHeader::from_byte(byte).ok_or(ProtocolError::UnknownHeader(byte))
    }
}

/// A 5-byte radio address.
pub type Address = [u8; ADDRESS_SIZE];

/// RX pipe enable bits. Bit `n` enables reception on pipe `n`.
///
/// Bits above pipe 5 are carried through untouched; the radio driver decides
/// what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PipeFlags(pub u8);

impl PipeFlags {
    /// No pipes enabled.
    pub const NONE: PipeFlags = PipeFlags(0);
    /// RX pipe 0.
    pub const RX_PIPE_0: PipeFlags = PipeFlags(1 << 0);
    /// RX pipe 1.
    pub const RX_PIPE_1: PipeFlags = PipeFlags(1 << 1);
    /// RX pipe 2.
    pub const RX_PIPE_2: PipeFlags = PipeFlags(1 << 2);
    /// RX pipe 3.
    pub const RX_PIPE_3: PipeFlags = PipeFlags(1 << 3);
    /// RX pipe 4.
    pub const RX_PIPE_4: PipeFlags = PipeFlags(1 << 4);
    /// RX pipe 5.
    pub const RX_PIPE_5: PipeFlags = PipeFlags(1 << 5);

    /// Build flags from a list of pipe indices. Indices above 5 are ignored.
    pub fn from_pipes(pipes: &[u8]) -> Self {
        pipes
            .iter()
            .filter(|&&pipe| pipe < PIPE_COUNT)
            .fold(PipeFlags::NONE, |flags, &pipe| flags | PipeFlags(1 << pipe))
    }

    /// Check whether the given pipe is enabled.
    pub fn is_enabled(self, pipe: u8) -> bool {
        pipe < PIPE_COUNT && self.0 & (1 << pipe) != 0
    }

    /// Iterate over the enabled pipe indices.
    pub fn pipes(self) -> impl Iterator<Item = u8> {
        (0..PIPE_COUNT).filter(move |&pipe| self.is_enabled(pipe))
    }

    /// Raw flag byte.
    pub fn to_byte(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for PipeFlags {
    type Output = PipeFlags;

    fn bitor(self, rhs: PipeFlags) -> PipeFlags {
        PipeFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for PipeFlags {
    fn bitor_assign(&mut self, rhs: PipeFlags) {
        self.0 |= rhs.0;
    }
}

/// Transmit power amplifier level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaLevel {
    /// Minimum output power.
    Min,
    /// Low output power.
    #[default]
    Low,
    /// High output power.
    High,
    /// Maximum output power.
    Max,
}

impl TryFrom<u8> for PaLevel {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PaLevel::Min),
            1 => Ok(PaLevel::Low),
            2 => Ok(PaLevel::High),
            3 => Ok(PaLevel::Max),
            other => Err(ProtocolError::InvalidPaLevel(other)),
        }
    }
}

impl From<PaLevel> for u8 {
    fn from(level: PaLevel) -> Self {
        match level {
            PaLevel::Min => 0,
            PaLevel::Low => 1,
            PaLevel::High => 2,
            PaLevel::Max => 3,
        }
    }
}

/// Over-the-air data rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataRate {
    /// 1 Mbps.
    Rate1Mbps,
    /// 2 Mbps.
    #[default]
    Rate2Mbps,
    /// 250 kbps.
    Rate250Kbps,
}

impl TryFrom<u8> for DataRate {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataRate::Rate1Mbps),
            1 => Ok(DataRate::Rate2Mbps),
            2 => Ok(DataRate::Rate250Kbps),
            other => Err(ProtocolError::InvalidDataRate(other)),
        }
    }
}

impl From<DataRate> for u8 {
    fn from(rate: DataRate) -> Self {
        match rate {
            DataRate::Rate1Mbps => 0,
            DataRate::Rate2Mbps => 1,
            DataRate::Rate250Kbps => 2,
        }
    }
}
