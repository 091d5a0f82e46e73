//! Protocol constants
//!
//! Header tags and fixed frame sizes used on the serial link between the host
//! and the bridge firmware.

// ============================================================================
// Header Tags
// ============================================================================

/// Radio configuration (host → device).
pub const HEADER_CONFIG: u8 = b'C';
/// Radio payload (host → device to transmit, device → host on receive).
pub const HEADER_PAYLOAD: u8 = b'P';
/// Positive acknowledgement (device → host).
pub const HEADER_ACK: u8 = b'A';
/// Negative acknowledgement (device → host).
pub const HEADER_NACK: u8 = b'N';
/// Device left failure lockout and needs reconfiguration (device → host).
pub const HEADER_RESET: u8 = b'R';

// ============================================================================
// Field Sizes
// ============================================================================

/// Size of the one-byte header tag that starts every frame.
pub const HEADER_SIZE: usize = 1;
/// Radio address width in bytes.
pub const ADDRESS_SIZE: usize = 5;
/// Number of one-byte address suffixes carried for the secondary RX pipes.
pub const ADDRESS_LSB_COUNT: usize = 5;
/// Largest radio payload.
pub const MAX_PAYLOAD_SIZE: usize = 32;
/// Number of radio pipes.
pub const PIPE_COUNT: u8 = 6;

// ============================================================================
// Frame Sizes
// ============================================================================

/// Config frame: header, flags, tx address, primary rx address, rx suffixes,
/// channel, pa level, data rate, retry delay, retry count.
pub const CONFIG_WIRE_LEN: usize =
    HEADER_SIZE + 1 + ADDRESS_SIZE + ADDRESS_SIZE + ADDRESS_LSB_COUNT + 1 + 1 + 1 + 1 + 1;
/// Payload frame: header, pipe, size, fixed data block.
pub const PAYLOAD_WIRE_LEN: usize = HEADER_SIZE + 1 + 1 + MAX_PAYLOAD_SIZE;
/// Ack, Nack and Reset frames carry nothing but the header.
pub const SIGNAL_WIRE_LEN: usize = HEADER_SIZE;

/// Largest frame on the link; bounds the decoder buffer.
pub const MAX_MESSAGE_SIZE: usize = PAYLOAD_WIRE_LEN;
