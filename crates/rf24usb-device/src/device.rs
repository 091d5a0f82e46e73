//! The bridge state machine.
//!
//! A [`Device`] sits between the host serial link and the radio. Interrupt
//! handlers only raise signals; all work happens in [`Device::tick`], which
//! drains the signals in a fixed order:
//!
//! 1. failure lockout: stay silent until the lockout deadline elapses, then
//!    announce a Reset and carry on
//! 2. serial data: feed bytes through the decoder and dispatch frames
//! 3. inactivity deadline bookkeeping
//! 4. serial line error: enter failure lockout
//! 5. deadline elapsed: drop the stalled partial frame
//! 6. radio event: forward received packets to the host

use std::sync::{Arc, Once};
use std::time::Duration;

use rf24usb_metrics::{describe_metrics, metric_defs, metrics};
use rf24usb_protocol::{
    AckMessage, ConfigMessage, Decoder, Encoder, Message, MessageHeader, NackMessage,
    PayloadMessage, ProtocolError, ProtocolResult, ResetMessage,
};

use crate::config::{DeviceConfig, StartupPolicy};
use crate::fault::Fault;
use crate::hal::{Radio, RadioPacket, Serial, Timer, TimerCallback, TimerHandle};
use crate::signal::{SignalHandle, Signals};

/// Observable state of a [`Device`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// No Config has been accepted since startup or the last failure.
    Unconfigured,
    /// The radio accepted the last Config; payloads are forwarded.
    Configured,
    /// A failure was detected; the link is ignored until the lockout elapses.
    FailureLockout,
}

/// Protocol engine bridging a serial host link and a radio.
pub struct Device<S, R, T> {
    serial: S,
    radio: R,
    timer: T,
    config: DeviceConfig,
    signals: Arc<Signals>,
    /// Handed to the timer on every arm; raises `timer_expired`.
    on_timer_elapsed: TimerCallback,
    decoder: Decoder,
    encoder: Encoder,
    configured: bool,
    locked_out: bool,
    /// The single outstanding deadline, if any.
    deadline: Option<TimerHandle>,
}

impl<S: Serial, R: Radio, T: Timer> Device<S, R, T> {
    /// Create a device with the default configuration.
    pub fn new(serial: S, radio: R, timer: T) -> Self {
        Self::with_config(serial, radio, timer, DeviceConfig::default())
    }

    /// Create a device with an explicit configuration.
    ///
    /// The first device created describes the bridge metrics to whichever
    /// recorder is installed at that point.
    pub fn with_config(serial: S, radio: R, timer: T, config: DeviceConfig) -> Self {
        static DESCRIBE_METRICS: Once = Once::new();
        DESCRIBE_METRICS.call_once(describe_metrics);

        let signals = Arc::new(Signals::default());
        let on_timer_elapsed: TimerCallback = {
            let signals = Arc::clone(&signals);
            Arc::new(move |_handle| signals.timer_expired.raise())
        };

        let mut device = Device {
            serial,
            radio,
            timer,
            config,
            signals,
            on_timer_elapsed,
            decoder: Decoder::new(),
            encoder: Encoder::new(),
            configured: false,
            locked_out: false,
            deadline: None,
        };

        if device.config.startup == StartupPolicy::AnnounceReset {
            log::info!("announcing reset on startup");
            device.write_reset();
        }
        device
    }

    // ========================================================================
    // Signals
    // ========================================================================

    /// Handle for raising this device's signals from interrupt context.
    pub fn signal_handle(&self) -> SignalHandle {
        SignalHandle::new(Arc::clone(&self.signals))
    }

    /// Serial receive interrupt.
    pub fn on_serial_data_ready(&self) {
        self.signals.serial_data_ready.raise();
    }

    /// Serial line error.
    pub fn on_serial_error(&self) {
        self.signals.serial_error.raise();
    }

    /// Radio interrupt.
    pub fn on_radio_event(&self) {
        self.signals.radio_event.raise();
    }

    // ========================================================================
    // Supervisory loop
    // ========================================================================

    /// Drain pending signals and advance the state machine.
    pub fn tick(&mut self) {
        if self.locked_out {
            if !self.signals.timer_expired.take() {
                return;
            }
            self.leave_lockout();
        }

        if self.signals.serial_data_ready.take() {
            self.drain_serial();
            if self.locked_out {
                return;
            }
        }

        self.refresh_inactivity_deadline();

        if self.signals.serial_error.take() {
            self.on_error(Fault::SerialLine);
            return;
        }

        if self.signals.timer_expired.take() {
            self.on_inactivity_timeout();
        }

        if self.signals.radio_event.take() {
            self.forward_radio_packets();
        }
    }

    fn drain_serial(&mut self) {
        let mut received = 0u64;
        while let Some(byte) = self.serial.read_byte() {
            // A line error belongs to the byte just read.
            if self.signals.serial_error.is_raised() {
                log::trace!("discarding byte 0x{:02X} read with a line error", byte);
                break;
            }
            received += 1;
            self.arm_deadline(self.config.inactivity_timeout());
            self.on_byte_received(byte);
            if self.locked_out {
                break;
            }
        }
        log::trace!("read {} serial bytes", received);
        metrics::counter!(metric_defs::SERIAL_RX_BYTES.name).increment(received);
    }

    fn on_byte_received(&mut self, byte: u8) {
        self.decoder.push_byte(byte);
        if !self.decoder.header_valid() {
            self.on_error(ProtocolError::UnknownHeader(byte).into());
            return;
        }
        if !self.decoder.message_complete() {
            return;
        }
        let Some(header) = self.decoder.current_header() else {
            return;
        };
        log::debug!("received {} frame", header);
        metrics::counter!(metric_defs::FRAMES_RECEIVED.name, "kind" => header.as_str())
            .increment(1);

        let decoded = match header {
            MessageHeader::Config => {
                decoded(self.decoder.try_decode_config(), header).map(Message::Config)
            }
            MessageHeader::Payload => {
                decoded(self.decoder.try_decode_payload(), header).map(Message::Payload)
            }
            other => Err(Fault::UnexpectedMessage(other)),
        };
        self.decoder.reset();

        match decoded {
            Ok(Message::Config(config)) => self.on_config_received(config),
            Ok(Message::Payload(payload)) => self.on_payload_received(payload),
            Ok(other) => self.on_error(Fault::UnexpectedMessage(other.header())),
            Err(fault) => self.on_error(fault),
        }
    }

    fn on_config_received(&mut self, config: ConfigMessage) {
        let ok = self.radio.configure(&config);
        self.configured = ok;
        if ok {
            log::info!(
                "radio configured: channel {}, rx pipes {:?}",
                config.channel,
                config.flags.pipes().collect::<Vec<_>>()
            );
        } else {
            self.on_error(Fault::RadioConfigurationRejected);
        }
        self.write_ack(ok);
    }

    fn on_payload_received(&mut self, payload: PayloadMessage) {
        if !self.configured {
            self.on_error(Fault::PayloadBeforeConfiguration);
            return;
        }
        let ok = self.radio.write(payload.size(), payload.raw_data());
        let outcome = if ok { "acked" } else { "failed" };
        metrics::counter!(metric_defs::RADIO_TX_PACKETS.name, "outcome" => outcome).increment(1);
        if !ok {
            self.on_error(Fault::RadioTransmitFailed);
        }
        self.write_ack(ok);
    }

    fn on_inactivity_timeout(&mut self) {
        if !self.decoder.is_empty() {
            log::trace!("dropping {} buffered bytes", self.decoder.buffered_len());
            metrics::counter!(metric_defs::INACTIVITY_TIMEOUTS.name).increment(1);
            self.on_error(Fault::MessageInactivityTimeout);
        }
        self.decoder.reset();
        self.cancel_deadline();
    }

    fn forward_radio_packets(&mut self) {
        let cause = self.radio.event_cause();
        log::trace!("radio event: {:?}", cause);
        if !cause.rx_ok {
            return;
        }

        let received: Vec<RadioPacket> = std::iter::from_fn(|| self.radio.read_packet()).collect();
        for packet in received {
            match PayloadMessage::from_raw(packet.pipe, packet.size, packet.data) {
                Ok(payload) => self.write_payload(&payload),
                Err(err) => log::warn!("dropping radio packet: {}", err),
            }
        }
    }

    // ========================================================================
    // Failure lockout
    // ========================================================================

    /// Report a fault. Escalating faults enter failure lockout; the rest are
    /// only logged and the caller answers them.
    fn on_error(&mut self, fault: Fault) {
        if !fault.escalates() {
            log::debug!("{}", fault);
            return;
        }
        log::warn!(
            "{}; entering failure lockout for {:?}",
            fault,
            self.config.lockout_duration()
        );
        metrics::counter!(metric_defs::LOCKOUTS.name, "fault" => fault.as_str()).increment(1);
        metrics::gauge!(metric_defs::LOCKED_OUT.name).set(1.0);

        self.serial.flush();
        self.radio.power_down();
        self.cancel_deadline();
        self.configured = false;
        self.decoder.reset();
        self.locked_out = true;

        // Anything raised before this point refers to input that was just flushed.
        self.signals.timer_expired.take();
        self.signals.serial_error.take();

        if !self.arm_deadline(self.config.lockout_duration()) {
            // No deadline means nothing would ever end the lockout.
            self.signals.timer_expired.raise();
        }
    }

    fn leave_lockout(&mut self) {
        log::info!("failure lockout elapsed, announcing reset");
        metrics::gauge!(metric_defs::LOCKED_OUT.name).set(0.0);

        self.serial.flush();
        self.signals.serial_error.take();
        self.cancel_deadline();
        self.locked_out = false;
        self.write_reset();
    }

    // ========================================================================
    // Deadlines
    // ========================================================================

    /// Replace the outstanding deadline. Returns false if the timer refused.
    fn arm_deadline(&mut self, duration: Duration) -> bool {
        self.cancel_deadline();
        match self.timer.arm(duration, Arc::clone(&self.on_timer_elapsed)) {
            Ok(handle) => {
                self.deadline = Some(handle);
                true
            }
            Err(err) => {
                log::warn!("failed to arm {:?} deadline: {}", duration, err);
                false
            }
        }
    }

    fn cancel_deadline(&mut self) {
        if let Some(handle) = self.deadline.take() {
            self.timer.cancel(handle);
        }
    }

    /// Keep a deadline outstanding exactly while a partial frame is buffered.
    fn refresh_inactivity_deadline(&mut self) {
        if self.locked_out {
            return;
        }
        if self.decoder.is_empty() {
            self.cancel_deadline();
        } else if self.deadline.is_none() {
            self.arm_deadline(self.config.inactivity_timeout());
        }
    }

    // ========================================================================
    // Outbound frames
    // ========================================================================

    fn write_ack(&mut self, ok: bool) {
        let frame = if ok {
            metrics::counter!(metric_defs::ACKS_SENT.name).increment(1);
            self.encoder.serialize(&AckMessage)
        } else {
            metrics::counter!(metric_defs::NACKS_SENT.name).increment(1);
            self.encoder.serialize(&NackMessage)
        };
        self.serial.write(&frame);
    }

    fn write_reset(&mut self) {
        metrics::counter!(metric_defs::RESETS_SENT.name).increment(1);
        let frame = self.encoder.serialize(&ResetMessage);
        self.serial.write(&frame);
    }

    fn write_payload(&mut self, payload: &PayloadMessage) {
        log::trace!(
            "forwarding {} bytes from pipe {}",
            payload.size(),
            payload.pipe()
        );
        metrics::counter!(metric_defs::RADIO_RX_PACKETS.name).increment(1);
        metrics::histogram!(metric_defs::RADIO_RX_PACKET_SIZE.name).record(payload.size() as f64);
        let frame = self.encoder.serialize(payload);
        self.serial.write(&frame);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current state.
    pub fn state(&self) -> DeviceState {
        if self.locked_out {
            DeviceState::FailureLockout
        } else if self.configured {
            DeviceState::Configured
        } else {
            DeviceState::Unconfigured
        }
    }

    /// Whether the radio accepted the last Config.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Whether the device is in failure lockout.
    pub fn is_locked_out(&self) -> bool {
        self.locked_out
    }

    /// The device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Bytes of the partial frame currently buffered.
    pub fn buffered_len(&self) -> usize {
        self.decoder.buffered_len()
    }

    /// The serial collaborator.
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// The serial collaborator, mutably.
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// The radio collaborator.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// The radio collaborator, mutably.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// The timer collaborator.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// The timer collaborator, mutably.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

/// Collapse a typed decode attempt on a complete frame into a message or fault.
fn decoded<M>(result: ProtocolResult<Option<M>>, header: MessageHeader) -> Result<M, Fault> {
    result?.ok_or(Fault::UnexpectedMessage(header))
}
