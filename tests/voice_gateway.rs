//! End-to-end voice gateway scenarios: protocol bytes in on a fake port,
//! commands out through a real POSIX queue, queries answered from real
//! snapshot files.

use hearth::config::Config;
use hearth::daemon::DaemonContext;
use hearth::queue::{self, CommandQueue};
use hearth::voice::VoiceGateway;
use hearth::Actuator;
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

/// In-memory duplex stand-in for the voice serial link
struct FakePort {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl FakePort {
    fn new(bytes: &[u8]) -> Self {
        Self {
            input: Cursor::new(bytes.to_vec()),
            output: Vec::new(),
        }
    }
}

impl Read for FakePort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for FakePort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn scratch_config(tag: &str, dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.state_file = dir.join("device_state.txt");
    config.queue.name = format!("/hearth-it-{}-{}", tag, std::process::id());
    config.snapshots.weather = dir.join("weather.json");
    config.snapshots.sensor = dir.join("temperature.json");
    config
}

#[test]
fn voice_light_on_reaches_queue_and_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("light", dir.path());
    let queue_name = config.queue.name.clone();
    let _ = queue::unlink(&queue_name);

    let ctx = Arc::new(DaemonContext::new(config).unwrap());
    let gateway = VoiceGateway::new(ctx.clone());

    let mut port = FakePort::new(&[0x11, 0x01]);
    gateway.listen(&mut port).unwrap();

    // The command must be on the queue, verbatim
    let probe = CommandQueue::create(&queue_name).unwrap();
    assert_eq!(probe.recv().unwrap(), b"L1");

    // And the persisted light field must be set
    assert!(ctx.store().get(Actuator::Light));

    // A command produces no reply frame
    assert!(port.output.is_empty());

    queue::unlink(&queue_name).unwrap();
}

#[test]
fn voice_weather_query_answers_exact_frame() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("weather", dir.path());
    let queue_name = config.queue.name.clone();
    let _ = queue::unlink(&queue_name);

    std::fs::write(
        dir.path().join("weather.json"),
        r#"{"now": {"text": "sunny", "temp": "23", "humidity": "40"}}"#,
    )
    .unwrap();

    let ctx = Arc::new(DaemonContext::new(config).unwrap());
    let gateway = VoiceGateway::new(ctx);

    let mut port = FakePort::new(&[0x11, 0xFF]);
    gateway.listen(&mut port).unwrap();

    assert_eq!(
        port.output,
        [0xAA, 0x55, 0x01, 0x01, 23, 0, 0, 0, 40, 0, 0, 0, 0x55, 0xAA]
    );

    queue::unlink(&queue_name).unwrap();
}

#[test]
fn voice_temperature_query_truncates_float() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("temp", dir.path());
    let queue_name = config.queue.name.clone();
    let _ = queue::unlink(&queue_name);

    std::fs::write(
        dir.path().join("temperature.json"),
        r#"{"temperature": 23.9, "humidity": 40.2, "timestamp": 1723400000}"#,
    )
    .unwrap();

    let ctx = Arc::new(DaemonContext::new(config).unwrap());
    let gateway = VoiceGateway::new(ctx);

    let mut port = FakePort::new(&[0x11, 0x03]);
    gateway.listen(&mut port).unwrap();

    // 23.9 truncates to 23
    assert_eq!(port.output, [0xAA, 0x55, 0x02, 23, 0, 0, 0, 0x55, 0xAA]);

    queue::unlink(&queue_name).unwrap();
}

#[test]
fn voice_noise_and_unknown_codes_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("noise", dir.path());
    let queue_name = config.queue.name.clone();
    let _ = queue::unlink(&queue_name);

    let ctx = Arc::new(DaemonContext::new(config).unwrap());
    let gateway = VoiceGateway::new(ctx.clone());

    // Stray bytes before the lead byte, then an unknown code after it
    let mut port = FakePort::new(&[0x00, 0x42, 0x11, 0x42, 0x7F]);
    gateway.listen(&mut port).unwrap();

    assert!(port.output.is_empty());
    assert!(!ctx.store().get(Actuator::Light));

    queue::unlink(&queue_name).unwrap();
}

#[test]
fn voice_missing_snapshot_answers_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("nosnap", dir.path());
    let queue_name = config.queue.name.clone();
    let _ = queue::unlink(&queue_name);

    let ctx = Arc::new(DaemonContext::new(config).unwrap());
    let gateway = VoiceGateway::new(ctx);

    let mut port = FakePort::new(&[0x11, 0xFF, 0x11, 0x04]);
    gateway.listen(&mut port).unwrap();

    assert!(port.output.is_empty());

    queue::unlink(&queue_name).unwrap();
}
