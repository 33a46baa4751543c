//! Daemon supervisor
//!
//! Creates the command queue, builds the shared context, spawns the two
//! worker threads (relay consumer, voice gateway), and waits for a
//! shutdown signal. The workers block in `mq_receive` and raw serial
//! reads and are not cancellable; process exit tears them down.

use crate::command::Command;
use crate::config::Config;
use crate::error::{HearthError, QueueError, Result, SubmitError};
use crate::queue::CommandQueue;
use crate::relay::RelayConsumer;
use crate::state::StateStore;
use crate::voice::VoiceGateway;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::signal::unix::{signal, SignalKind};

/// Everything the daemon threads share, constructed once at startup.
///
/// Replaces ambient globals: the queue handle, the send mutex, and the
/// state store live here and are passed by `Arc` to each thread.
pub struct DaemonContext {
    config: Config,
    store: StateStore,
    queue: CommandQueue,
    /// Serializes in-daemon sends on the shared queue handle. The queue
    /// primitive is thread-safe on its own; this keeps daemon-side send
    /// logging and ordering coherent.
    send_lock: Mutex<()>,
}

impl DaemonContext {
    /// Create the named queue and the state store handle.
    pub fn new(config: Config) -> Result<Self> {
        let queue = CommandQueue::create(&config.queue.name)?;
        let store = StateStore::new(&config.state_file);
        Ok(Self {
            config,
            store,
            queue,
            send_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// In-process submission path (voice gateway).
    ///
    /// State is updated before delivery, so reads reflect "requested"
    /// rather than "confirmed"; a queue failure is reported but never
    /// rolled back. Sends on the shared handle block when the queue is
    /// full.
    pub fn submit(&self, command: Command) -> std::result::Result<(), SubmitError> {
        self.store.apply(command);

        let _guard = self
            .send_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.queue.send(command.token().as_bytes())?;
        Ok(())
    }

    /// Blocking dequeue for the relay consumer.
    pub(crate) fn recv_command(&self) -> std::result::Result<Vec<u8>, QueueError> {
        self.queue.recv()
    }

    pub fn queue_name(&self) -> &str {
        self.queue.name()
    }
}

/// Write PID file so deploy tooling can find the daemon
fn write_pid_file() -> Option<PathBuf> {
    let pid_path = Config::runtime_dir().join("pid");

    if let Some(parent) = pid_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create PID file directory: {}", e);
            return None;
        }
    }

    let pid = std::process::id();
    if let Err(e) = std::fs::write(&pid_path, pid.to_string()) {
        tracing::warn!("Failed to write PID file: {}", e);
        return None;
    }

    tracing::debug!("PID file written: {:?} (pid={})", pid_path, pid);
    Some(pid_path)
}

/// Remove PID file on shutdown
fn cleanup_pid_file(path: &PathBuf) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to remove PID file: {}", e);
        }
    }
}

/// Main daemon that owns the worker threads
pub struct Daemon {
    config: Config,
    pid_file_path: Option<PathBuf>,
}

impl Daemon {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pid_file_path: None,
        }
    }

    /// Run until SIGINT or SIGTERM.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting hearth daemon");

        self.pid_file_path = write_pid_file();

        let ctx = Arc::new(DaemonContext::new(self.config.clone())?);
        tracing::info!("Command queue ready: {}", ctx.queue_name());

        let relay = RelayConsumer::new(ctx.clone());
        let relay_status = relay.status();
        thread::Builder::new()
            .name("zigbee-relay".to_string())
            .spawn(move || relay.run())?;

        let gateway = VoiceGateway::new(ctx.clone());
        let voice_status = gateway.status();
        thread::Builder::new()
            .name("voice-gateway".to_string())
            .spawn(move || gateway.run())?;

        let mut sigterm = signal(SignalKind::terminate()).map_err(|e| {
            HearthError::Config(format!("Failed to set up SIGTERM handler: {}", e))
        })?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT, shutting down...");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down...");
            }
        }

        tracing::info!(
            "Transport status at shutdown: relay {}, voice {}",
            relay_status.get(),
            voice_status.get()
        );

        if let Some(ref path) = self.pid_file_path {
            cleanup_pid_file(path);
        }

        tracing::info!("Daemon stopped");

        Ok(())
    }
}
