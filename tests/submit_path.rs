//! The out-of-process submission path against a real named queue.

use hearth::config::Config;
use hearth::error::{QueueError, SubmitError};
use hearth::queue::{self, CommandQueue};
use hearth::submit;
use hearth::Actuator;

fn scratch_config(tag: &str, dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.state_file = dir.join("device_state.txt");
    config.queue.name = format!("/hearth-it-{}-{}", tag, std::process::id());
    config
}

#[test]
fn invalid_token_is_rejected_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("invalid", dir.path());

    for token in ["WIFI1", "l1", "L2", "", "light on"] {
        let err = submit::submit(&config, token).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidCommand(_)), "{:?}", token);
    }

    // No state record was ever created
    assert!(!config.state_file.exists());
}

#[test]
fn missing_queue_is_unreachable_but_requested_state_persists() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("unreachable", dir.path());
    let _ = queue::unlink(&config.queue.name);

    let err = submit::submit(&config, "L1").unwrap_err();
    assert!(matches!(err, SubmitError::Unreachable));

    // State reflects "requested", not "confirmed": the store was updated
    // before delivery failed and is not rolled back.
    assert!(submit::get_state(&config, Actuator::Light));
}

#[test]
fn submitted_token_is_received_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("verbatim", dir.path());
    let _ = queue::unlink(&config.queue.name);

    let daemon_queue = CommandQueue::create(&config.queue.name).unwrap();

    submit::submit(&config, "F1").unwrap();
    assert_eq!(daemon_queue.recv().unwrap(), b"F1");
    assert!(submit::get_state(&config, Actuator::Fan));

    queue::unlink(&config.queue.name).unwrap();
}

#[test]
fn full_queue_reports_send_failed_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config("full", dir.path());
    let _ = queue::unlink(&config.queue.name);

    let _daemon_queue = CommandQueue::create(&config.queue.name).unwrap();

    // Fill the queue to its capacity bound
    for _ in 0..10 {
        submit::submit(&config, "L1").unwrap();
    }

    // The 11th producer is told immediately, without blocking
    let err = submit::submit(&config, "L0").unwrap_err();
    assert!(matches!(err, SubmitError::SendFailed(QueueError::Full)));

    // The rejected command still updated requested state
    assert!(!submit::get_state(&config, Actuator::Light));

    queue::unlink(&config.queue.name).unwrap();
}
