//! # rf24usb-device
//!
//! Protocol engine of the RF24 USB bridge firmware.
//!
//! A [`Device`] owns the serial decoder and encoder and drives three injected
//! collaborators: a [`Serial`] link to the host, a [`Radio`] transceiver and a
//! one-shot [`Timer`]. Interrupt handlers only raise signals (directly on the
//! device or through a [`SignalHandle`]); the runtime calls [`Device::tick`]
//! to process them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rf24usb_device::{Device, DeviceConfig, StartupPolicy};
//!
//! let config = DeviceConfig::default().with_startup(StartupPolicy::AnnounceReset);
//! let mut device = Device::with_config(uart, radio, timer, config);
//! let signals = device.signal_handle();
//!
//! // In the UART RX interrupt:
//! signals.on_serial_data_ready();
//!
//! // In the main loop:
//! loop {
//!     device.tick();
//! }
//! ```

mod config;
mod device;
mod fault;
mod hal;
mod signal;

pub use config::*;
pub use device::*;
pub use fault::*;
pub use hal::*;
pub use signal::*;
