//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when decoding frames from the serial link.
///
/// Every variant is a framing error from the device's point of view: the link
/// carries no checksum, so a frame that does not parse is treated as corrupt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// First byte is not any known header tag.
    #[error("unknown header tag: 0x{0:02X}")]
    UnknownHeader(u8),

    /// Frame is shorter than the fixed length of its kind.
    #[error("frame too short: expected {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Fixed wire length of the frame kind.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Frame header does not match the message kind being decoded.
    #[error("header mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    HeaderMismatch {
        /// Tag of the kind being decoded.
        expected: u8,
        /// Tag found in the frame.
        actual: u8,
    },

    /// Payload size field exceeds the radio payload limit.
    #[error("payload too large: maximum {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum allowed payload size.
        max: usize,
        /// Declared size.
        actual: usize,
    },

    /// Pipe index outside 0..=5.
    #[error("invalid pipe index: {0}")]
    InvalidPipe(u8),

    /// Power level byte is not a known level.
    #[error("invalid power level: {0}")]
    InvalidPaLevel(u8),

    /// Data rate byte is not a known rate.
    #[error("invalid data rate: {0}")]
    InvalidDataRate(u8),
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
