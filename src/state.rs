//! Device state store
//!
//! File-backed record of the five actuator states, shared between the
//! daemon and the short-lived web-request processes. Coordination is
//! advisory `flock` only (shared for reads, exclusive for writes): the
//! writers may be unrelated processes, so an in-process mutex cannot
//! guard this file.
//!
//! The record holds *requested* state, not confirmed state: every
//! submission path updates it before attempting hardware delivery, and
//! delivery failures are never rolled back.

use crate::command::{Actuator, Command};
use nix::fcntl::{Flock, FlockArg};
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Last-requested state of the five actuators, in persisted-record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub light: bool,
    pub fan: bool,
    pub aircon: bool,
    pub washer: bool,
    pub door: bool,
}

impl Snapshot {
    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Light => self.light,
            Actuator::Fan => self.fan,
            Actuator::Aircon => self.aircon,
            Actuator::Washer => self.washer,
            Actuator::Door => self.door,
        }
    }

    pub fn set(&mut self, actuator: Actuator, value: bool) {
        match actuator {
            Actuator::Light => self.light = value,
            Actuator::Fan => self.fan = value,
            Actuator::Aircon => self.aircon = value,
            Actuator::Washer => self.washer = value,
            Actuator::Door => self.door = value,
        }
    }

    /// One line, five space-separated 0/1 fields
    fn to_record(self) -> String {
        let fields: Vec<&str> = Actuator::ALL
            .into_iter()
            .map(|a| if self.get(a) { "1" } else { "0" })
            .collect();
        format!("{}\n", fields.join(" "))
    }

    fn parse_record(contents: &str) -> Option<Snapshot> {
        let line = contents.lines().next()?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != Actuator::ALL.len() {
            return None;
        }
        let mut snapshot = Snapshot::default();
        for (actuator, field) in Actuator::ALL.into_iter().zip(fields) {
            let value: i32 = field.parse().ok()?;
            snapshot.set(actuator, value != 0);
        }
        Some(snapshot)
    }
}

/// Handle on the persisted state record
///
/// Cheap to construct; every operation opens and locks the file
/// independently, so a `StateStore` per process (or per request) is the
/// expected usage.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the current snapshot under a shared lock.
    ///
    /// Any failure (missing file, lock failure, short or malformed
    /// record) reads as all-off. This silent fallback is intentional:
    /// the record is created lazily on first successful command, and
    /// readers must not error before that.
    pub fn load(&self) -> Snapshot {
        let Ok(file) = File::open(&self.path) else {
            return Snapshot::default();
        };
        let Ok(mut locked) = Flock::lock(file, FlockArg::LockShared) else {
            return Snapshot::default();
        };
        let mut contents = String::new();
        if locked.read_to_string(&mut contents).is_err() {
            return Snapshot::default();
        }
        Snapshot::parse_record(&contents).unwrap_or_default()
    }

    /// Flip the one field implied by the command and persist the record.
    ///
    /// The load and the save are separate lock acquisitions, not one
    /// critical section: two concurrent updaters can interleave between
    /// them and one write can carry a stale value for an unrelated
    /// field. Producers only ever flip the field they own, so the
    /// record stays well formed either way.
    pub fn apply(&self, command: Command) {
        let mut snapshot = self.load();
        snapshot.set(command.actuator(), command.engaged());
        if let Err(e) = self.save(snapshot) {
            tracing::warn!("failed to persist device state: {}", e);
        }
    }

    /// Convenience accessor; re-reads the record on every call.
    pub fn get(&self, actuator: Actuator) -> bool {
        self.load().get(actuator)
    }

    /// Write the full record under an exclusive lock on a freshly
    /// truncated file.
    fn save(&self, snapshot: Snapshot) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut locked = Flock::lock(file, FlockArg::LockExclusive)
            .map_err(|(_, errno)| std::io::Error::from(errno))?;
        locked.write_all(snapshot.to_record().as_bytes())?;
        locked.flush()?;
        Ok(())
    }
}
