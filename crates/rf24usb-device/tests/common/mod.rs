//! In-memory collaborators for driving a `Device` in tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use rf24usb_device::{
    Device, EventCause, Radio, RadioPacket, Serial, SignalHandle, Timer, TimerCallback,
    TimerError, TimerHandle,
};
use rf24usb_protocol::{
    ConfigMessage, DataRate, Decoder, Message, PaLevel, PayloadMessage, PipeFlags,
    MAX_PAYLOAD_SIZE,
};

// ============================================================================
// Serial
// ============================================================================

/// Queue-backed serial port.
#[derive(Default)]
pub struct QueueSerial {
    /// Host → device bytes not yet read.
    pub rx: VecDeque<u8>,
    /// Device → host bytes.
    pub tx: Vec<u8>,
    pub flushes: usize,
    /// Raise a line error after this many more reads.
    pub error_after: Option<(usize, SignalHandle)>,
}

impl Serial for QueueSerial {
    fn read_byte(&mut self) -> Option<u8> {
        if let Some((remaining, handle)) = self.error_after.as_mut() {
            if *remaining == 0 {
                handle.on_serial_error();
                self.error_after = None;
            } else {
                *remaining -= 1;
            }
        }
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.tx.extend_from_slice(bytes);
    }

    fn flush(&mut self) {
        self.flushes += 1;
        self.rx.clear();
    }
}

// ============================================================================
// Radio
// ============================================================================

/// Radio with scripted outcomes that records what it was asked to do.
#[derive(Default)]
pub struct ScriptedRadio {
    /// Outcomes for successive `configure` calls; empty means accept.
    pub config_results: VecDeque<bool>,
    /// Outcomes for successive `write` calls; empty means accept.
    pub write_results: VecDeque<bool>,
    /// Packets waiting in the receive FIFO.
    pub inbox: VecDeque<RadioPacket>,
    pub configs: Vec<ConfigMessage>,
    pub writes: Vec<Vec<u8>>,
    pub power_downs: usize,
    pub cause_queries: usize,
}

impl Radio for ScriptedRadio {
    fn read_packet(&mut self) -> Option<RadioPacket> {
        self.inbox.pop_front()
    }

    fn write(&mut self, size: u8, data: &[u8; MAX_PAYLOAD_SIZE]) -> bool {
        self.writes.push(data[..size as usize].to_vec());
        self.write_results.pop_front().unwrap_or(true)
    }

    fn configure(&mut self, config: &ConfigMessage) -> bool {
        self.configs.push(*config);
        self.config_results.pop_front().unwrap_or(true)
    }

    fn power_down(&mut self) {
        self.power_downs += 1;
    }

    fn event_cause(&mut self) -> EventCause {
        self.cause_queries += 1;
        EventCause {
            tx_ok: false,
            tx_fail: false,
            rx_ok: !self.inbox.is_empty(),
        }
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Timer that only fires when the test says so.
#[derive(Default)]
pub struct ManualTimer {
    next: u64,
    pub armed: Option<(TimerHandle, Duration, TimerCallback)>,
    pub arms: Vec<Duration>,
    pub cancels: usize,
}

impl ManualTimer {
    /// Elapse the outstanding deadline, if any.
    pub fn fire(&mut self) {
        if let Some((handle, _, callback)) = self.armed.take() {
            callback(handle);
        }
    }

    /// Duration of the outstanding deadline.
    pub fn armed_for(&self) -> Option<Duration> {
        self.armed.as_ref().map(|(_, duration, _)| *duration)
    }
}

impl Timer for ManualTimer {
    fn arm(
        &mut self,
        duration: Duration,
        callback: TimerCallback,
    ) -> Result<TimerHandle, TimerError> {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.armed = Some((handle, duration, callback));
        self.arms.push(duration);
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancels += 1;
        if self.armed.as_ref().is_some_and(|(armed, _, _)| *armed == handle) {
            self.armed = None;
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub type TestDevice = Device<QueueSerial, ScriptedRadio, ManualTimer>;

pub fn new_device() -> TestDevice {
    Device::new(
        QueueSerial::default(),
        ScriptedRadio::default(),
        ManualTimer::default(),
    )
}

pub fn sample_config() -> ConfigMessage {
    ConfigMessage {
        flags: PipeFlags::RX_PIPE_3 | PipeFlags::RX_PIPE_5,
        tx_address: *b"PHTS0",
        rx_address_primary: *b"PHTC0",
        rx_address_lsb: *b"ABCDE",
        channel: 0xAB,
        pa_level: PaLevel::Low,
        data_rate: DataRate::Rate2Mbps,
        retry_delay: 8,
        retry_count: 12,
    }
}

/// Host payload on pipe 0 carrying `size` bytes counting up from `offset`.
pub fn host_payload(size: usize, offset: u8) -> PayloadMessage {
    let data: Vec<u8> = (0..size).map(|i| offset.wrapping_add(i as u8)).collect();
    PayloadMessage::new(0, &data).expect("valid payload")
}

pub fn frame(message: impl Into<Message>) -> Vec<u8> {
    message.into().encode()
}

/// Queue bytes from the host without signalling.
pub fn queue(device: &mut TestDevice, bytes: &[u8]) {
    device.serial_mut().rx.extend(bytes.iter().copied());
}

/// Queue bytes from the host, raise the receive interrupt and tick.
pub fn feed(device: &mut TestDevice, bytes: &[u8]) {
    queue(device, bytes);
    device.on_serial_data_ready();
    device.tick();
}

/// Take everything the device wrote to the host.
pub fn take_tx(device: &mut TestDevice) -> Vec<u8> {
    std::mem::take(&mut device.serial_mut().tx)
}

/// Split a device → host byte stream into messages.
pub fn parse_stream(bytes: &[u8]) -> Vec<Message> {
    let mut decoder = Decoder::new();
    let mut messages = Vec::new();
    for &byte in bytes {
        decoder.push_byte(byte);
        assert!(decoder.header_valid(), "device wrote an unknown header");
        if let Some(message) = decoder.try_decode().expect("device wrote a corrupt frame") {
            messages.push(message);
            decoder.reset();
        }
    }
    assert!(decoder.is_empty(), "device wrote a truncated frame");
    messages
}
