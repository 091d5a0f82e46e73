//! Incremental frame decoder for the host → device direction.
//!
//! Bytes arrive one at a time from the serial interrupt path. The first byte
//! of a frame identifies its kind and therefore its length, so the decoder can
//! tell "not enough bytes yet" apart from "this is not a frame at all" as soon
//! as the header is in.
//!
//! ```text
//! +--------+---------------------------+
//! | header | body (fixed per header)   |
//! +--------+---------------------------+
//! ```

use bytes::BytesMut;

use crate::constants::MAX_MESSAGE_SIZE;
use crate::error::ProtocolResult;
use crate::messages::{ConfigMessage, Message, PayloadMessage, WireMessage};
use crate::types::MessageHeader;

/// Accumulates the bytes of the frame currently in progress.
#[derive(Debug)]
pub struct Decoder {
    /// Bytes of the in-progress frame. Never grows past `MAX_MESSAGE_SIZE`.
    buffer: BytesMut,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Decoder {
            buffer: BytesMut::with_capacity(MAX_MESSAGE_SIZE),
        }
    }

    /// Append one byte to the in-progress frame.
    ///
    /// The byte is dropped without error when the buffer is full, when the
    /// current frame is already complete, or when its header is invalid.
    pub fn push_byte(&mut self, byte: u8) {
        if self.buffer.len() >= MAX_MESSAGE_SIZE
            || !self.header_valid()
            || self.message_complete()
        {
            log::trace!("decoder dropped byte 0x{:02X}", byte);
            return;
        }
        self.buffer.extend_from_slice(&[byte]);
    }

    /// Header of the in-progress frame, once its first byte is in.
    ///
    /// Returns `None` when the decoder is empty or the header is unknown.
    pub fn current_header(&self) -> Option<MessageHeader> {
        self.buffer.first().copied().and_then(MessageHeader::from_byte)
    }

    /// Whether the first byte is a known header tag. An empty decoder is valid.
    pub fn header_valid(&self) -> bool {
        self.buffer.is_empty() || self.current_header().is_some()
    }

    /// Whether exactly as many bytes as the header implies have been pushed.
    pub fn message_complete(&self) -> bool {
        self.current_header()
            .is_some_and(|header| self.buffer.len() == header.wire_len())
    }

    /// Decode the in-progress frame as a Config message.
    ///
    /// Returns `Ok(None)` if the frame is incomplete or is not a Config frame.
    pub fn try_decode_config(&self) -> ProtocolResult<Option<ConfigMessage>> {
        self.try_decode_as::<ConfigMessage>()
    }

    /// Decode the in-progress frame as a Payload message.
    ///
    /// Returns `Ok(None)` if the frame is incomplete or is not a Payload frame.
    pub fn try_decode_payload(&self) -> ProtocolResult<Option<PayloadMessage>> {
        self.try_decode_as::<PayloadMessage>()
    }

    /// Decode the in-progress frame whatever its kind.
    ///
    /// Returns `Ok(None)` while more bytes are needed.
    pub fn try_decode(&self) -> ProtocolResult<Option<Message>> {
        if !self.message_complete() {
            return Ok(None);
        }
        Message::decode(&self.buffer).map(Some)
    }

    fn try_decode_as<M: WireMessage>(&self) -> ProtocolResult<Option<M>> {
        if !self.message_complete() || self.current_header() != Some(M::HEADER) {
            return Ok(None);
        }
        M::deserialize(&self.buffer).map(Some)
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no bytes of a frame are buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard the in-progress frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
