//! Hearth: home-automation hub daemon
//!
//! This library provides the device command relay and state
//! synchronization core:
//! - Validating actuator command tokens against a closed vocabulary
//! - Persisting last-requested actuator states under advisory file locks
//! - Queueing commands from many producers onto a POSIX message queue
//! - Draining the queue onto the Zigbee actuator serial bus
//! - Bridging the voice module's serial link to commands and data queries
//!
//! # Architecture
//!
//! ```text
//!   web-request processes                     hearth daemon
//!   ┌──────────────────┐            ┌─────────────────────────────────┐
//!   │ submit(token)    │            │  ┌──────────────────────────┐   │
//!   │  validate        │            │  │ Voice Gateway thread     │   │
//!   │  update state ───┼──┐     ┌───┼──│  /dev/voice_module       │   │
//!   │  mq_send (nonbl.)│  │     │   │  │  frames ⇄ commands/query │   │
//!   └──────────────────┘  │     │   │  └───────────┬──────────────┘   │
//!                         ▼     ▼   │              │ submit (blocking)│
//!                  ┌────────────────┼──┐           ▼                  │
//!                  │ device_state   │  │   ┌──────────────┐           │
//!                  │ record (flock) │  │   │ /zigbee_cmd  │ POSIX mq  │
//!                  └────────────────┼──┘   │ 10 × 32 B    │           │
//!                                   │      └──────┬───────┘           │
//!                                   │             ▼                   │
//!                                   │  ┌──────────────────────────┐   │
//!                                   │  │ Relay Consumer thread    │   │
//!                                   │  │  /dev/zigbee_module      │   │
//!                                   │  └──────────────────────────┘   │
//!                                   └─────────────────────────────────┘
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod daemon;
pub mod error;
pub mod queue;
pub mod relay;
pub mod serial;
pub mod state;
pub mod status;
pub mod submit;
pub mod voice;

pub use cli::{Cli, Commands};
pub use command::{Actuator, Command};
pub use config::Config;
pub use daemon::{Daemon, DaemonContext};
pub use error::{HearthError, Result, SubmitError};
