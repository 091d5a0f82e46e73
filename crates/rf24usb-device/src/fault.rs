//! Faults the device can observe and how each one is resolved.

use rf24usb_protocol::{MessageHeader, ProtocolError};
use thiserror::Error;

/// Something went wrong on the serial link or the radio.
///
/// Escalating faults put the device into failure lockout. The rest are
/// answered directly with a Nack, or in the case of the inactivity timeout,
/// silently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Fault {
    /// A frame could not be parsed.
    #[error("framing error: {0}")]
    Framing(#[from] ProtocolError),

    /// A well-formed frame of a kind the host must not send.
    #[error("unexpected {0} frame from host")]
    UnexpectedMessage(MessageHeader),

    /// The serial port reported a line error.
    #[error("serial line error")]
    SerialLine,

    /// A Payload arrived before any Config was accepted.
    #[error("payload received before configuration")]
    PayloadBeforeConfiguration,

    /// The radio refused a Config.
    #[error("radio rejected configuration")]
    RadioConfigurationRejected,

    /// The radio could not deliver a Payload.
    #[error("radio transmit failed")]
    RadioTransmitFailed,

    /// A partial frame stalled past the inactivity timeout.
    #[error("message inactivity timeout")]
    MessageInactivityTimeout,
}

impl Fault {
    /// Whether this fault puts the device into failure lockout.
    pub fn escalates(&self) -> bool {
        matches!(
            self,
            Fault::Framing(_)
                | Fault::UnexpectedMessage(_)
                | Fault::SerialLine
                | Fault::PayloadBeforeConfiguration
        )
    }

    /// Short snake_case name, used as a metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Fault::Framing(_) | Fault::UnexpectedMessage(_) => "framing",
            Fault::SerialLine => "serial_line",
            Fault::PayloadBeforeConfiguration => "payload_before_configuration",
            Fault::RadioConfigurationRejected => "radio_configuration_rejected",
            Fault::RadioTransmitFailed => "radio_transmit_failed",
            Fault::MessageInactivityTimeout => "message_inactivity_timeout",
        }
    }
}
