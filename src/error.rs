//! Error types for hearth
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues.

use thiserror::Error;

/// Top-level error type for the hearth application
#[derive(Error, Debug)]
pub enum HearthError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Serial error: {0}")]
    Serial(#[from] SerialError),

    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the POSIX command queue
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Command queue does not exist. Is the hearth daemon running?")]
    Unavailable,

    #[error("Command queue is full")]
    Full,

    #[error("Command payload too large for a queue message ({0} bytes)")]
    TooLong(usize),

    #[error("Message queue error: {0}")]
    Os(nix::errno::Errno),
}

/// Errors related to serial port acquisition and configuration
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("Cannot open serial device '{device}': {source}. Is the user in the 'dialout' group?\n  Run: sudo usermod -aG dialout $USER")]
    Open {
        device: String,
        source: std::io::Error,
    },

    #[error("Failed to configure serial device '{device}': {source}")]
    Configure {
        device: String,
        source: nix::errno::Errno,
    },

    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaud(u32),
}

/// Outcome of a command submission that did not reach the queue.
///
/// Validation failures are rejected before any mutation; the transport
/// variants are reported after the state store has been updated (requested
/// state is never rolled back).
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Unrecognized command token: {0:?}")]
    InvalidCommand(String),

    #[error("Command queue unavailable. Is the hearth daemon running?")]
    Unreachable,

    #[error("Command delivery failed: {0}")]
    SendFailed(QueueError),
}

impl From<QueueError> for SubmitError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::Unavailable => SubmitError::Unreachable,
            other => SubmitError::SendFailed(other),
        }
    }
}

/// Result type alias using HearthError
pub type Result<T> = std::result::Result<T, HearthError>;
