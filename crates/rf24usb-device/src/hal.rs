//! Collaborator interfaces consumed by the device.
//!
//! The device never touches hardware directly. The serial port, the radio
//! driver and the one-shot timer are injected at construction as
//! implementations of [`Serial`], [`Radio`] and [`Timer`]. Every method is
//! non-blocking.

use std::sync::Arc;
use std::time::Duration;

use rf24usb_protocol::{ConfigMessage, MAX_PAYLOAD_SIZE};
use thiserror::Error;

/// Byte-level serial link to the host.
pub trait Serial {
    /// Poll for one received byte. Returns `None` when nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue bytes for transmission to the host.
    fn write(&mut self, bytes: &[u8]);

    /// Discard any buffered or partially received input.
    fn flush(&mut self);
}

/// A packet read from the radio receive FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioPacket {
    /// Pipe the packet arrived on (0..=5).
    pub pipe: u8,
    /// Number of meaningful bytes in `data`.
    pub size: u8,
    /// Raw payload block.
    pub data: [u8; MAX_PAYLOAD_SIZE],
}

impl RadioPacket {
    /// Build a packet from a data slice. Bytes past 32 are dropped.
    pub fn new(pipe: u8, data: &[u8]) -> Self {
        let size = data.len().min(MAX_PAYLOAD_SIZE);
        let mut block = [0u8; MAX_PAYLOAD_SIZE];
        block[..size].copy_from_slice(&data[..size]);
        RadioPacket {
            pipe,
            size: size as u8,
            data: block,
        }
    }
}

/// Cause of the last radio interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventCause {
    /// A transmission was acknowledged.
    pub tx_ok: bool,
    /// A transmission ran out of retries.
    pub tx_fail: bool,
    /// At least one packet is waiting in the receive FIFO.
    pub rx_ok: bool,
}

/// Radio transceiver driver.
pub trait Radio {
    /// Pop one packet from the receive FIFO.
    fn read_packet(&mut self) -> Option<RadioPacket>;

    /// Transmit `size` bytes of `data`. Returns true when the peer acknowledged.
    fn write(&mut self, size: u8, data: &[u8; MAX_PAYLOAD_SIZE]) -> bool;

    /// Apply a configuration. Returns false if the radio rejects it.
    fn configure(&mut self, config: &ConfigMessage) -> bool;

    /// Put the radio into power-down mode.
    fn power_down(&mut self);

    /// Read and clear the interrupt cause.
    fn event_cause(&mut self) -> EventCause;
}

/// Opaque identifier of an armed deadline, owned by the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Invoked from the timer's own context when a deadline elapses.
pub type TimerCallback = Arc<dyn Fn(TimerHandle) + Send + Sync>;

/// Errors reported by a [`Timer`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// No timer slot is free.
    #[error("no timer slot available")]
    Exhausted,

    /// The requested duration cannot be represented by the timer.
    #[error("duration out of range: {0:?}")]
    OutOfRange(Duration),
}

/// One-shot deadline facility.
pub trait Timer {
    /// Arm a deadline that invokes `callback` once after `duration`.
    fn arm(
        &mut self,
        duration: Duration,
        callback: TimerCallback,
    ) -> Result<TimerHandle, TimerError>;

    /// Cancel a deadline. Cancelling an elapsed or unknown handle does nothing.
    fn cancel(&mut self, handle: TimerHandle);
}
