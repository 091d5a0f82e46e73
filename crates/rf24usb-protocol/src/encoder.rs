//! Frame encoder for the device → host direction.

use bytes::BytesMut;

use crate::constants::MAX_MESSAGE_SIZE;
use crate::messages::{Message, WireMessage};

/// Serializes messages into wire frames.
///
/// The encoder holds no state between calls; every frame is produced from the
/// message alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder;

impl Encoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Encoder
    }

    /// Serialize a typed message into its frame.
    pub fn serialize<M: WireMessage>(&self, message: &M) -> BytesMut {
        let mut buf = BytesMut::with_capacity(M::WIRE_LEN);
        message.serialize(&mut buf);
        buf
    }

    /// Serialize any [`Message`] into its frame.
    pub fn encode(&self, message: &Message) -> BytesMut {
        let mut buf = BytesMut::with_capacity(MAX_MESSAGE_SIZE);
        message.serialize(&mut buf);
        buf
    }
}
