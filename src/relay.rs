//! Serial relay consumer
//!
//! Owns the actuator-bus serial handle and drains the command queue:
//! blocking dequeue, re-validate, write the raw token bytes, pace. The
//! bus is expected to be present at daemon start, so acquisition is a
//! single attempt; on failure the transport is disabled for the rest of
//! the process and the thread exits.

use crate::command::Command;
use crate::daemon::DaemonContext;
use crate::serial;
use crate::status::{LinkStatus, StatusCell};
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct RelayConsumer {
    ctx: Arc<DaemonContext>,
    status: StatusCell,
}

impl RelayConsumer {
    pub fn new(ctx: Arc<DaemonContext>) -> Self {
        Self {
            ctx,
            status: StatusCell::new(),
        }
    }

    /// Observable handle on this transport's status
    pub fn status(&self) -> StatusCell {
        self.status.clone()
    }

    /// Thread body. Returns only when the transport is disabled.
    pub fn run(&self) {
        let cfg = &self.ctx.config().zigbee;

        let mut port = match serial::open_raw(&cfg.device, cfg.baud_rate) {
            Ok(port) => port,
            Err(e) => {
                tracing::error!("Actuator bus unavailable, relay disabled: {}", e);
                self.status.set(LinkStatus::Disabled);
                return;
            }
        };
        self.status.set(LinkStatus::Online);
        tracing::info!(
            "Relay consumer started, draining {} onto {}",
            self.ctx.queue_name(),
            cfg.device.display()
        );

        let pacing = Duration::from_millis(cfg.pacing_ms);
        loop {
            let payload = match self.ctx.recv_command() {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("Queue receive failed: {}", e);
                    continue;
                }
            };
            if relay_one(&payload, &mut port) {
                thread::sleep(pacing);
            }
        }
    }
}

/// Re-validate one dequeued payload and write it to the bus.
///
/// Malformed or unknown payloads are dropped silently, with no
/// dead-letter accounting. Returns whether anything reached the bus.
fn relay_one(payload: &[u8], port: &mut impl Write) -> bool {
    let Ok(token) = std::str::from_utf8(payload) else {
        tracing::debug!("Dropping non-UTF8 queue payload ({} bytes)", payload.len());
        return false;
    };
    let Some(command) = Command::from_token(token) else {
        tracing::debug!("Dropping unrecognized queue payload {:?}", token);
        return false;
    };

    // Raw token bytes, no delimiter; the coordinator wants exact tokens.
    if let Err(e) = port
        .write_all(command.token().as_bytes())
        .and_then(|()| port.flush())
    {
        tracing::warn!("Actuator bus write failed: {}", e);
        return false;
    }

    tracing::info!("Relayed {} to actuator bus", command);
    true
}
