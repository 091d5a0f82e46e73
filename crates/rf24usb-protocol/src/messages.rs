//! Typed messages and their fixed wire layouts.
//!
//! ```text
//! Config : 'C' flags tx[5] rx_primary[5] rx_lsb[5] channel pa_level data_rate
//!          retry_delay retry_count
//! Payload: 'P' pipe size data[32]
//! Ack    : 'A'
//! Nack   : 'N'
//! Reset  : 'R'
//! ```
//!
//! All fields are single bytes or byte arrays, so there is no endianness to
//! worry about.

use bytes::{Buf, BufMut};

use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::*;

/// A message with a fixed-length wire encoding.
pub trait WireMessage: Sized {
    /// Header tag that starts the frame.
    const HEADER: MessageHeader;
    /// Total frame length, header included.
    const WIRE_LEN: usize = Self::HEADER.wire_len();

    /// Write the frame into `buf`, returning the number of bytes written.
    fn serialize<B: BufMut>(&self, buf: &mut B) -> usize;

    /// Parse a frame. `buf` must start with the header byte.
    fn deserialize(buf: &[u8]) -> ProtocolResult<Self>;
}

/// Check length and header of a frame and return the bytes after the header.
fn frame_body(buf: &[u8], header: MessageHeader) -> ProtocolResult<&[u8]> {
    let expected = header.wire_len();
    if buf.len() < expected {
        return Err(ProtocolError::FrameTooShort {
            expected,
            actual: buf.len(),
        });
    }
    if buf[0] != header.to_byte() {
        return Err(ProtocolError::HeaderMismatch {
            expected: header.to_byte(),
            actual: buf[0],
        });
    }
    Ok(&buf[HEADER_SIZE..expected])
}

// ============================================================================
// Config
// ============================================================================

/// Radio configuration sent by the host before any payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigMessage {
    /// RX pipes to enable.
    pub flags: PipeFlags,
    /// Address used for transmission (and pipe 0 auto-ack).
    pub tx_address: Address,
    /// Full address of the primary RX pipe.
    pub rx_address_primary: Address,
    /// Last address byte for each secondary RX pipe.
    pub rx_address_lsb: [u8; ADDRESS_LSB_COUNT],
    /// RF channel.
    pub channel: u8,
    /// Power amplifier level.
    pub pa_level: PaLevel,
    /// Over-the-air data rate.
    pub data_rate: DataRate,
    /// Auto-retransmit delay, in radio units of 250 us.
    pub retry_delay: u8,
    /// Auto-retransmit count.
    pub retry_count: u8,
}

impl WireMessage for ConfigMessage {
    const HEADER: MessageHeader = MessageHeader::Config;

    fn serialize<B: BufMut>(&self, buf: &mut B) -> usize {
        buf.put_u8(Self::HEADER.to_byte());
        buf.put_u8(self.flags.to_byte());
        buf.put_slice(&self.tx_address);
        buf.put_slice(&self.rx_address_primary);
        buf.put_slice(&self.rx_address_lsb);
        buf.put_u8(self.channel);
        buf.put_u8(self.pa_level.into());
        buf.put_u8(self.data_rate.into());
        buf.put_u8(self.retry_delay);
        buf.put_u8(self.retry_count);
        Self::WIRE_LEN
    }

    fn deserialize(buf: &[u8]) -> ProtocolResult<Self> {
        let mut body = frame_body(buf, Self::HEADER)?;

        let flags = PipeFlags(body.get_u8());
        let mut tx_address = [0u8; ADDRESS_SIZE];
        body.copy_to_slice(&mut tx_address);
        let mut rx_address_primary = [0u8; ADDRESS_SIZE];
        body.copy_to_slice(&mut rx_address_primary);
        let mut rx_address_lsb = [0u8; ADDRESS_LSB_COUNT];
        body.copy_to_slice(&mut rx_address_lsb);
        let channel = body.get_u8();
        let pa_level = PaLevel::try_from(body.get_u8())?;
        let data_rate = DataRate::try_from(body.get_u8())?;
        let retry_delay = body.get_u8();
        let retry_count = body.get_u8();

        Ok(ConfigMessage {
            flags,
            tx_address,
            rx_address_primary,
            rx_address_lsb,
            channel,
            pa_level,
            data_rate,
            retry_delay,
            retry_count,
        })
    }
}

// ============================================================================
// Payload
// ============================================================================

/// A radio payload, in either direction.
///
/// Only the first `size` bytes of the data block are meaningful. The rest is
/// always zero so equal payloads encode identically.
#[derive(Debug, Clone, Copy, Eq)]
pub struct PayloadMessage {
    pipe: u8,
    size: u8,
    data: [u8; MAX_PAYLOAD_SIZE],
}

impl PayloadMessage {
    /// Create a payload for `pipe` carrying `data`.
    pub fn new(pipe: u8, data: &[u8]) -> ProtocolResult<Self> {
        if data.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: data.len(),
            });
        }
        let mut block = [0u8; MAX_PAYLOAD_SIZE];
        block[..data.len()].copy_from_slice(data);
        Self::from_raw(pipe, data.len() as u8, block)
    }

    /// Create a payload from the raw radio representation: a size and a full
    /// 32-byte block. Bytes beyond `size` are discarded.
    pub fn from_raw(pipe: u8, size: u8, data: [u8; MAX_PAYLOAD_SIZE]) -> ProtocolResult<Self> {
        if pipe >= PIPE_COUNT {
            return Err(ProtocolError::InvalidPipe(pipe));
        }
        if size as usize > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: size as usize,
            });
        }
        let mut block = [0u8; MAX_PAYLOAD_SIZE];
        block[..size as usize].copy_from_slice(&data[..size as usize]);
        Ok(PayloadMessage {
            pipe,
            size,
            data: block,
        })
    }

    /// Radio pipe the payload came from or is addressed to.
    pub fn pipe(&self) -> u8 {
        self.pipe
    }

    /// Number of meaningful data bytes.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// The meaningful data bytes.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.size as usize]
    }

    /// The full zero-padded data block, as handed to the radio driver.
    pub fn raw_data(&self) -> &[u8; MAX_PAYLOAD_SIZE] {
        &self.data
    }
}

impl PartialEq for PayloadMessage {
    fn eq(&self, other: &Self) -> bool {
        self.pipe == other.pipe && self.data() == other.data()
    }
}

impl WireMessage for PayloadMessage {
    const HEADER: MessageHeader = MessageHeader::Payload;

    fn serialize<B: BufMut>(&self, buf: &mut B) -> usize {
        buf.put_u8(Self::HEADER.to_byte());
        buf.put_u8(self.pipe);
        buf.put_u8(self.size);
        buf.put_slice(&self.data);
        Self::WIRE_LEN
    }

    fn deserialize(buf: &[u8]) -> ProtocolResult<Self> {
        let mut body = frame_body(buf, Self::HEADER)?;

        let pipe = body.get_u8();
        let size = body.get_u8();
        let mut data = [0u8; MAX_PAYLOAD_SIZE];
        body.copy_to_slice(&mut data);

        Self::from_raw(pipe, size, data)
    }
}

// ============================================================================
// Header-only messages
// ============================================================================

macro_rules! header_only_message {
    ($(#[$meta:meta])* $name:ident, $header:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl WireMessage for $name {
            const HEADER: MessageHeader = $header;

            fn serialize<B: BufMut>(&self, buf: &mut B) -> usize {
                buf.put_u8(Self::HEADER.to_byte());
                Self::WIRE_LEN
            }

            fn deserialize(buf: &[u8]) -> ProtocolResult<Self> {
                frame_body(buf, Self::HEADER)?;
                Ok($name)
            }
        }
    };
}

header_only_message!(
    /// The last Config or Payload was applied / delivered.
    AckMessage,
    MessageHeader::Ack
);

header_only_message!(
    /// The last Config was rejected or the last Payload was not delivered.
    NackMessage,
    MessageHeader::Nack
);

header_only_message!(
    /// The device recovered from a failure and must be reconfigured.
    ResetMessage,
    MessageHeader::Reset
);

// ============================================================================
// Message
// ============================================================================

/// Any message that can appear on the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Radio configuration.
    Config(ConfigMessage),
    /// Radio payload.
    Payload(PayloadMessage),
    /// Positive acknowledgement.
    Ack,
    /// Negative acknowledgement.
    Nack,
    /// Device reset notification.
    Reset,
}

impl Message {
    /// Header of this message.
    pub fn header(&self) -> MessageHeader {
        match self {
            Message::Config(_) => MessageHeader::Config,
            Message::Payload(_) => MessageHeader::Payload,
            Message::Ack => MessageHeader::Ack,
            Message::Nack => MessageHeader::Nack,
            Message::Reset => MessageHeader::Reset,
        }
    }

    /// Total frame length of this message.
    pub fn wire_len(&self) -> usize {
        self.header().wire_len()
    }

    /// Write the frame into `buf`, returning the number of bytes written.
    pub fn serialize<B: BufMut>(&self, buf: &mut B) -> usize {
        match self {
            Message::Config(config) => config.serialize(buf),
            Message::Payload(payload) => payload.serialize(buf),
            Message::Ack => AckMessage.serialize(buf),
            Message::Nack => NackMessage.serialize(buf),
            Message::Reset => ResetMessage.serialize(buf),
        }
    }

    /// Encode to a freshly allocated frame.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_len());
        self.serialize(&mut buf);
        buf
    }

    /// Decode a frame of any kind.
    pub fn decode(buf: &[u8]) -> ProtocolResult<Self> {
        let first = *buf.first().ok_or(ProtocolError::FrameTooShort {
            expected: HEADER_SIZE,
            actual: 0,
        })?;
        let message = match MessageHeader::try_from(first)? {
            MessageHeader::Config => Message::Config(ConfigMessage::deserialize(buf)?),
            MessageHeader::Payload => Message::Payload(PayloadMessage::deserialize(buf)?),
            MessageHeader::Ack => AckMessage::deserialize(buf).map(|_| Message::Ack)?,
            MessageHeader::Nack => NackMessage::deserialize(buf).map(|_| Message::Nack)?,
            MessageHeader::Reset => ResetMessage::deserialize(buf).map(|_| Message::Reset)?,
        };
        Ok(message)
    }
}

impl From<ConfigMessage> for Message {
    fn from(config: ConfigMessage) -> Self {
        Message::Config(config)
    }
}

impl From<PayloadMessage> for Message {
    fn from(payload: PayloadMessage) -> Self {
        Message::Payload(payload)
    }
}
