//! Metrics infrastructure for the RF24 USB bridge.
//!
//! Every metric the bridge records is declared once in [`metric_defs`], with
//! its kind, unit and description. The crate re-exports `metrics`, so
//! recording sites write
//! `metrics::counter!(metric_defs::ACKS_SENT.name).increment(1)`. Without an
//! installed recorder all recording calls are no-ops.
//!
//! ```rust
//! use rf24usb_metrics::{describe_metrics, metric_defs};
//!
//! describe_metrics();
//! metrics::counter!(metric_defs::ACKS_SENT.name).increment(1);
//! ```

pub use metrics;

use metrics::{KeyName, Recorder, SharedString, Unit};

/// How a metric is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

/// A declared metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    /// Name passed to the recording macros.
    pub name: &'static str,
    pub kind: MetricKind,
    pub unit: Option<Unit>,
    pub description: &'static str,
}

impl Metric {
    /// Register the unit and description with the installed recorder.
    pub fn describe(&self) {
        metrics::with_recorder(|recorder| self.describe_to(recorder));
    }

    fn describe_to(&self, recorder: &dyn Recorder) {
        let key = KeyName::from_const_str(self.name);
        let description = SharedString::const_str(self.description);
        match self.kind {
            MetricKind::Counter => recorder.describe_counter(key, self.unit, description),
            MetricKind::Gauge => recorder.describe_gauge(key, self.unit, description),
            MetricKind::Histogram => recorder.describe_histogram(key, self.unit, description),
        }
    }
}

/// Declare metric constants and the `ALL` table listing them.
macro_rules! metric_table {
    ($(
        $(#[$doc:meta])*
        $ident:ident: $kind:ident($name:literal, $unit:expr, $description:literal);
    )*) => {
        $(
            $(#[$doc])*
            pub const $ident: Metric = Metric {
                name: $name,
                kind: MetricKind::$kind,
                unit: $unit,
                description: $description,
            };
        )*

        /// Every declared metric.
        pub const ALL: &[Metric] = &[$($ident),*];
    };
}

/// All metric definitions for the bridge.
pub mod metric_defs {
    use super::{Metric, MetricKind, Unit};

    metric_table! {
        /// Bytes read from the serial link.
        SERIAL_RX_BYTES: Counter(
            "rf24usb.serial.rx_bytes",
            Some(Unit::Bytes),
            "Bytes read from the serial link"
        );
        /// Frames that completed framing. Label: `kind`.
        FRAMES_RECEIVED: Counter(
            "rf24usb.serial.frames_received",
            Some(Unit::Count),
            "Frames received from the host that completed framing"
        );
        ACKS_SENT: Counter(
            "rf24usb.serial.acks_sent",
            Some(Unit::Count),
            "Ack frames written to the host"
        );
        NACKS_SENT: Counter(
            "rf24usb.serial.nacks_sent",
            Some(Unit::Count),
            "Nack frames written to the host"
        );
        RESETS_SENT: Counter(
            "rf24usb.serial.resets_sent",
            Some(Unit::Count),
            "Reset frames written to the host"
        );
        /// Partial frames discarded by the inactivity timeout.
        INACTIVITY_TIMEOUTS: Counter(
            "rf24usb.serial.inactivity_timeouts",
            Some(Unit::Count),
            "Partial frames discarded after the inactivity timeout"
        );
        RADIO_RX_PACKETS: Counter(
            "rf24usb.radio.rx_packets",
            Some(Unit::Count),
            "Radio packets forwarded to the host"
        );
        /// Host payloads handed to the radio. Label: `outcome` (`acked`/`failed`).
        RADIO_TX_PACKETS: Counter(
            "rf24usb.radio.tx_packets",
            Some(Unit::Count),
            "Host payloads handed to the radio"
        );
        RADIO_RX_PACKET_SIZE: Histogram(
            "rf24usb.radio.rx_packet_size_bytes",
            Some(Unit::Bytes),
            "Received radio payload size in bytes"
        );
        /// Failure lockouts entered. Label: `fault`.
        LOCKOUTS: Counter(
            "rf24usb.device.lockouts",
            Some(Unit::Count),
            "Failure lockouts entered"
        );
        /// 1 while the device is locked out, 0 otherwise.
        LOCKED_OUT: Gauge(
            "rf24usb.device.locked_out",
            None,
            "Whether the device is in failure lockout"
        );
    }
}

/// Describe all metrics to the installed recorder.
///
/// Devices call this on construction; call it again after installing a
/// recorder later than that.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
