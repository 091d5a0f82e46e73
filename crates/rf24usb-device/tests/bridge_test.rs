//! End-to-end traffic through a configured device.

mod common;

use std::time::Duration;

use common::*;
use rf24usb_device::{Device, DeviceConfig, DeviceState, RadioPacket, StartupPolicy};
use rf24usb_protocol::{Message, PayloadMessage};

#[test]
fn test_normal_sequence() {
    let mut device = new_device();
    let config = frame(sample_config());
    let payload1 = frame(host_payload(10, 0));
    let payload2 = frame(host_payload(32, 100));
    device.radio_mut().write_results.extend([true, false]);

    // Bytes sitting in the port without an interrupt are not read.
    queue(&mut device, &config[..3]);
    device.tick();
    assert!(device.serial().tx.is_empty());
    assert_eq!(device.buffered_len(), 0);

    feed(&mut device, &[]);
    assert!(device.serial().tx.is_empty());
    assert_eq!(device.buffered_len(), 3);

    feed(&mut device, &config[3..]);
    assert_eq!(take_tx(&mut device), b"A");
    assert_eq!(device.state(), DeviceState::Configured);
    assert_eq!(device.radio().configs, vec![sample_config()]);

    feed(&mut device, &payload1[..12]);
    assert!(device.serial().tx.is_empty());
    assert_eq!(device.timer().armed_for(), Some(Duration::from_millis(500)));

    // Finish the first payload, start the second, and receive one radio packet.
    device
        .radio_mut()
        .inbox
        .push_back(RadioPacket::new(3, &[0xAB, 0xCD]));
    device.on_radio_event();
    let mut chunk = payload1[12..].to_vec();
    chunk.extend_from_slice(&payload2[..14]);
    feed(&mut device, &chunk);

    let tx = take_tx(&mut device);
    assert_eq!(tx.len(), 1 + 35);
    assert_eq!(tx[0], b'A');
    let forwarded = PayloadMessage::new(3, &[0xAB, 0xCD]).unwrap();
    assert_eq!(parse_stream(&tx[1..]), vec![Message::Payload(forwarded)]);
    assert_eq!(device.buffered_len(), 14);

    feed(&mut device, &payload2[14..]);
    assert_eq!(take_tx(&mut device), b"N");
    assert_eq!(device.state(), DeviceState::Configured);

    let writes = &device.radio().writes;
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], (0..10).collect::<Vec<u8>>());
    assert_eq!(writes[1], (100..132).collect::<Vec<u8>>());
    assert!(device.timer().armed.is_none());
}

#[test]
fn test_back_to_back_frames_in_one_read() {
    let mut device = new_device();
    let mut bytes = frame(sample_config());
    bytes.extend(frame(host_payload(4, 7)));
    bytes.extend(frame(host_payload(1, 9)));
    device.radio_mut().write_results.extend([true, false]);

    feed(&mut device, &bytes);
    assert_eq!(take_tx(&mut device), b"AAN");
    assert_eq!(device.radio().writes, vec![vec![7, 8, 9, 10], vec![9]]);
}

#[test]
fn test_rejected_config_is_nacked() {
    let mut device = new_device();
    device.radio_mut().config_results.push_back(false);

    feed(&mut device, &frame(sample_config()));
    assert_eq!(take_tx(&mut device), b"N");
    assert_eq!(device.state(), DeviceState::Unconfigured);

    // A later config can still succeed.
    feed(&mut device, &frame(sample_config()));
    assert_eq!(take_tx(&mut device), b"A");
    assert_eq!(device.state(), DeviceState::Configured);
}

#[test]
fn test_radio_packets_forwarded_in_order() {
    let mut device = new_device();
    feed(&mut device, &frame(sample_config()));
    take_tx(&mut device);

    device
        .radio_mut()
        .inbox
        .extend([RadioPacket::new(1, &[1, 2, 3]), RadioPacket::new(5, &[0xFF; 32])]);
    device.on_radio_event();
    device.tick();

    let expected = vec![
        Message::Payload(PayloadMessage::new(1, &[1, 2, 3]).unwrap()),
        Message::Payload(PayloadMessage::new(5, &[0xFF; 32]).unwrap()),
    ];
    let tx = take_tx(&mut device);
    assert_eq!(tx.len(), 2 * 35);
    assert_eq!(parse_stream(&tx), expected);
}

#[test]
fn test_radio_event_without_rx_is_ignored() {
    let mut device = new_device();
    device.on_radio_event();
    device.tick();

    assert_eq!(device.radio().cause_queries, 1);
    assert!(device.serial().tx.is_empty());
}

#[test]
fn test_radio_forwarding_before_configuration() {
    // Received packets are forwarded whatever the host-side state.
    let mut device = new_device();
    device.radio_mut().inbox.push_back(RadioPacket::new(0, &[42]));
    device.on_radio_event();
    device.tick();

    let tx = take_tx(&mut device);
    assert_eq!(&tx[..4], &[b'P', 0, 1, 42]);
    assert_eq!(device.state(), DeviceState::Unconfigured);
}

#[test]
fn test_stalled_frame_is_discarded() {
    let mut device = new_device();
    let config = frame(sample_config());

    feed(&mut device, &config[..5]);
    assert_eq!(device.buffered_len(), 5);

    device.timer_mut().fire();
    device.tick();
    assert_eq!(device.buffered_len(), 0);
    assert!(device.serial().tx.is_empty());
    assert!(!device.is_locked_out());
    assert!(device.timer().armed.is_none());

    // The rest of the stale frame would now be read as garbage, so the host
    // resends the whole thing.
    feed(&mut device, &config);
    assert_eq!(take_tx(&mut device), b"A");
}

#[test]
fn test_deadline_rearmed_per_byte() {
    let mut device = new_device();
    let config = frame(sample_config());

    feed(&mut device, &config[..6]);
    assert_eq!(device.timer().arms.len(), 6);
    assert!(device
        .timer()
        .arms
        .iter()
        .all(|d| *d == Duration::from_millis(500)));
}

#[test]
fn test_custom_inactivity_timeout() {
    let config = DeviceConfig::default().with_inactivity_timeout(Duration::from_millis(120));
    let mut device = Device::with_config(
        QueueSerial::default(),
        ScriptedRadio::default(),
        ManualTimer::default(),
        config,
    );

    feed(&mut device, &frame(sample_config())[..2]);
    assert_eq!(device.timer().armed_for(), Some(Duration::from_millis(120)));
}

#[test]
fn test_idle_tick_is_idempotent() {
    let mut device = new_device();
    feed(&mut device, &frame(sample_config()));
    take_tx(&mut device);

    let arms = device.timer().arms.len();
    let cancels = device.timer().cancels;
    for _ in 0..5 {
        device.tick();
    }

    assert!(device.serial().tx.is_empty());
    assert_eq!(device.timer().arms.len(), arms);
    assert_eq!(device.timer().cancels, cancels);
    assert_eq!(device.serial().flushes, 0);
    assert_eq!(device.radio().cause_queries, 0);
    assert_eq!(device.state(), DeviceState::Configured);
}

#[test]
fn test_startup_announce_reset() {
    let config = DeviceConfig::default().with_startup(StartupPolicy::AnnounceReset);
    let mut device = Device::with_config(
        QueueSerial::default(),
        ScriptedRadio::default(),
        ManualTimer::default(),
        config,
    );
    assert_eq!(take_tx(&mut device), b"R");

    device.tick();
    assert!(device.serial().tx.is_empty());
    assert_eq!(device.state(), DeviceState::Unconfigured);
}

#[test]
fn test_startup_silent_by_default() {
    let device = new_device();
    assert!(device.serial().tx.is_empty());
}

#[test]
fn test_signal_handle_from_another_thread() {
    let mut device = new_device();
    let handle = device.signal_handle();
    queue(&mut device, &frame(sample_config()));

    std::thread::spawn(move || handle.on_serial_data_ready())
        .join()
        .unwrap();

    device.tick();
    assert_eq!(take_tx(&mut device), b"A");
}
