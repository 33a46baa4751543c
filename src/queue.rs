//! Command queue over a POSIX message queue
//!
//! Kernel-mediated, bounded, many-producer/one-consumer. The daemon
//! creates the queue and holds a blocking read/write handle for its
//! lifetime; web-request processes open short-lived write-only,
//! non-blocking handles (see [`send_detached`]) so a full queue surfaces
//! immediately instead of stalling a request.

use crate::error::QueueError;
use nix::errno::Errno;
use nix::mqueue::{self, MQ_OFlag, MqAttr, MqdT};
use nix::sys::stat::{self, Mode};
use std::ffi::CString;

/// Capacity bound: unconsumed messages before producers see backpressure
pub const MAX_MESSAGES: i64 = 10;

/// Payload bound per message (bytes); tokens are far smaller
pub const MAX_MSG_SIZE: usize = 32;

/// Constant message priority. Has no functional meaning; the queue is
/// drained by a single consumer in arrival order.
pub const MSG_PRIORITY: u32 = 1;

fn queue_name(name: &str) -> Result<CString, QueueError> {
    CString::new(name).map_err(|_| QueueError::Unavailable)
}

/// The daemon-side queue handle
///
/// Lives for the process lifetime; the kernel reclaims the descriptor on
/// exit. The named queue itself persists until explicitly unlinked.
pub struct CommandQueue {
    mqd: MqdT,
    name: String,
}

impl CommandQueue {
    /// Create (or attach to) the named queue with the fixed attributes.
    ///
    /// Mode is 0666 under a temporarily cleared umask: the short-lived
    /// producer processes run as a different user than the daemon.
    pub fn create(name: &str) -> Result<Self, QueueError> {
        let cname = queue_name(name)?;
        let attr = MqAttr::new(0, MAX_MESSAGES, MAX_MSG_SIZE as i64, 0);

        let old_mask = stat::umask(Mode::empty());
        let result = mqueue::mq_open(
            cname.as_c_str(),
            MQ_OFlag::O_CREAT | MQ_OFlag::O_RDWR,
            Mode::from_bits_truncate(0o666),
            Some(&attr),
        );
        stat::umask(old_mask);

        let mqd = result.map_err(QueueError::Os)?;
        Ok(Self {
            mqd,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blocking receive; returns one command payload.
    pub fn recv(&self) -> Result<Vec<u8>, QueueError> {
        let mut buffer = [0u8; MAX_MSG_SIZE];
        let mut priority = 0u32;
        let len = mqueue::mq_receive(&self.mqd, &mut buffer, &mut priority)
            .map_err(QueueError::Os)?;
        Ok(buffer[..len].to_vec())
    }

    /// Send on the shared blocking handle. Blocks the calling thread when
    /// the queue is full.
    pub fn send(&self, payload: &[u8]) -> Result<(), QueueError> {
        if payload.len() >= MAX_MSG_SIZE {
            return Err(QueueError::TooLong(payload.len()));
        }
        mqueue::mq_send(&self.mqd, payload, MSG_PRIORITY).map_err(QueueError::Os)
    }
}

/// One-shot send from a process that does not share the daemon's handle.
///
/// Opens a private write-only, non-blocking handle, sends, and closes.
/// A queue the daemon has not yet created reports [`QueueError::Unavailable`];
/// a full queue reports [`QueueError::Full`] immediately.
pub fn send_detached(name: &str, payload: &[u8]) -> Result<(), QueueError> {
    if payload.len() >= MAX_MSG_SIZE {
        return Err(QueueError::TooLong(payload.len()));
    }
    let cname = queue_name(name)?;

    let mqd = match mqueue::mq_open(
        cname.as_c_str(),
        MQ_OFlag::O_WRONLY | MQ_OFlag::O_NONBLOCK,
        Mode::empty(),
        None,
    ) {
        Ok(mqd) => mqd,
        Err(Errno::ENOENT) => return Err(QueueError::Unavailable),
        Err(e) => return Err(QueueError::Os(e)),
    };

    let result = match mqueue::mq_send(&mqd, payload, MSG_PRIORITY) {
        Ok(()) => Ok(()),
        Err(Errno::EAGAIN) => Err(QueueError::Full),
        Err(e) => Err(QueueError::Os(e)),
    };

    let _ = mqueue::mq_close(mqd);
    result
}

/// Remove the named queue from the kernel. Used by tests; the deployed
/// daemon leaves the queue in place across restarts.
pub fn unlink(name: &str) -> Result<(), QueueError> {
    let cname = queue_name(name)?;
    mqueue::mq_unlink(cname.as_c_str()).map_err(QueueError::Os)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_queue_name(tag: &str) -> String {
        format!("/hearth-test-{}-{}", tag, std::process::id())
    }

    #[test]
    fn test_send_to_missing_queue_is_unavailable() {
        let name = test_queue_name("missing");
        let _ = unlink(&name);
        assert!(matches!(
            send_detached(&name, b"L1"),
            Err(QueueError::Unavailable)
        ));
    }

    #[test]
    fn test_oversized_payload_is_rejected_before_open() {
        let name = test_queue_name("oversized");
        let payload = [b'x'; MAX_MSG_SIZE];
        assert!(matches!(
            send_detached(&name, &payload),
            Err(QueueError::TooLong(_))
        ));
    }

    #[test]
    fn test_round_trip_through_named_queue() {
        let name = test_queue_name("roundtrip");
        let _ = unlink(&name);
        let queue = CommandQueue::create(&name).unwrap();

        send_detached(&name, b"F1").unwrap();
        queue.send(b"D0").unwrap();

        assert_eq!(queue.recv().unwrap(), b"F1");
        assert_eq!(queue.recv().unwrap(), b"D0");

        unlink(&name).unwrap();
    }

    #[test]
    fn test_eleventh_detached_send_reports_full_without_blocking() {
        let name = test_queue_name("capacity");
        let _ = unlink(&name);
        let queue = CommandQueue::create(&name).unwrap();

        for _ in 0..MAX_MESSAGES {
            send_detached(&name, b"L1").unwrap();
        }
        assert!(matches!(
            send_detached(&name, b"L1"),
            Err(QueueError::Full)
        ));

        // Drain one; the next producer gets through again.
        queue.recv().unwrap();
        send_detached(&name, b"L0").unwrap();

        unlink(&name).unwrap();
    }
}
