//! Out-of-process command submission and state query surface
//!
//! This is the contract exposed to the web layer. Each web-request
//! process is an independent producer with no shared memory with the
//! daemon: validate, update the state store, then open a private
//! non-blocking handle to the named queue and send. Backpressure is
//! immediate (`SendFailed`) rather than blocking a request.

use crate::command::{Actuator, Command};
use crate::config::Config;
use crate::error::SubmitError;
use crate::queue;
use crate::state::StateStore;

/// Validate a token, persist the requested state, forward to hardware.
///
/// The store is updated before delivery is attempted and is never rolled
/// back: reads reflect "requested" rather than "confirmed" state. A
/// failed validation mutates nothing.
pub fn submit(config: &Config, token: &str) -> Result<(), SubmitError> {
    let command =
        Command::from_token(token).ok_or_else(|| SubmitError::InvalidCommand(token.to_string()))?;

    StateStore::new(&config.state_file).apply(command);

    queue::send_detached(&config.queue.name, command.token().as_bytes())?;
    tracing::debug!("Submitted {} to {}", command, config.queue.name);
    Ok(())
}

/// Last-requested state of one actuator, re-read from the record.
pub fn get_state(config: &Config, actuator: Actuator) -> bool {
    StateStore::new(&config.state_file).get(actuator)
}
