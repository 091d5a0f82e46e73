//! RF24 USB Bridge Serial Protocol
//!
//! This crate provides the message types and framing codec used on the serial
//! link between a host and the RF24 bridge firmware.
//!
//! # Protocol Overview
//!
//! Every frame starts with a one-byte header tag. The tag alone determines the
//! frame length; there is no length prefix and no checksum.
//!
//! - **Config** (`'C'`, host → device): radio addresses, channel, power, rate, retries
//! - **Payload** (`'P'`, both directions): pipe, size and a 32-byte data block
//! - **Ack** / **Nack** (`'A'` / `'N'`, device → host): outcome of the last Config or Payload
//! - **Reset** (`'R'`, device → host): the device recovered from a failure
//!
//! # Example
//!
//! ```rust
//! use rf24usb_protocol::{Decoder, Encoder, Message, PayloadMessage};
//!
//! let payload = PayloadMessage::new(0, b"hello").unwrap();
//! let frame = Encoder::new().encode(&Message::Payload(payload));
//!
//! let mut decoder = Decoder::new();
//! for &byte in frame.iter() {
//!     decoder.push_byte(byte);
//! }
//! assert_eq!(decoder.try_decode_payload(), Ok(Some(payload)));
//! ```

mod constants;
mod decoder;
mod encoder;
mod error;
mod messages;
mod types;

pub use constants::*;
pub use decoder::*;
pub use encoder::*;
pub use error::*;
pub use messages::*;
pub use types::*;
