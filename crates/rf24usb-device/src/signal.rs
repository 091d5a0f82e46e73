//! Single-slot mailboxes shared between interrupt context and `tick()`.
//!
//! Producers only ever call [`Signal::raise`]; the single consumer drains with
//! [`Signal::take`]. Neither side blocks, and a raise that races with a take is
//! either consumed by that take or left for the next one, never both.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A one-bit event flag.
#[derive(Debug, Default)]
pub struct Signal(AtomicBool);

impl Signal {
    /// Create a cleared signal.
    pub const fn new() -> Self {
        Signal(AtomicBool::new(false))
    }

    /// Set the flag. Safe to call from any context.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Peek at the flag without clearing it.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The four event flags of a device.
#[derive(Debug, Default)]
pub struct Signals {
    /// The serial port has received bytes.
    pub serial_data_ready: Signal,
    /// The serial port reported a line error.
    pub serial_error: Signal,
    /// The radio raised an interrupt.
    pub radio_event: Signal,
    /// The armed deadline elapsed.
    pub timer_expired: Signal,
}

/// Cloneable handle for raising a device's signals from other contexts.
///
/// Interrupt handlers or driver threads hold one of these instead of a
/// reference to the device.
#[derive(Debug, Clone)]
pub struct SignalHandle(Arc<Signals>);

impl SignalHandle {
    pub(crate) fn new(signals: Arc<Signals>) -> Self {
        SignalHandle(signals)
    }

    /// Serial receive interrupt.
    pub fn on_serial_data_ready(&self) {
        self.0.serial_data_ready.raise();
    }

    /// Serial line error (parity, framing, overrun).
    pub fn on_serial_error(&self) {
        self.0.serial_error.raise();
    }

    /// Radio interrupt.
    pub fn on_radio_event(&self) {
        self.0.radio_event.raise();
    }
}
