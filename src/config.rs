//! Configuration loading and types for hearth
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults (the values the hub shipped with)
//! 2. Config file (--config, ~/.config/hearth/config.toml, or /etc/hearth/config.toml)
//! 3. Environment variables (HEARTH_*)

use crate::error::HearthError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Hearth Configuration
#
# Location: /etc/hearth/config.toml (system) or ~/.config/hearth/config.toml

# File holding the last-requested actuator states: one line, five
# space-separated 0/1 fields in order light, fan, aircon, washer, door.
# Written by every submitter under an exclusive advisory lock; a missing
# or unreadable file reads as all-off.
state_file = "/var/lib/hearth/device_state.txt"

[queue]
# POSIX message queue carrying validated command tokens from producers to
# the relay consumer. Created by the daemon; web-facing processes open it
# write-only and non-blocking. Capacity and message size are fixed by the
# wire contract (10 messages, 32 bytes).
name = "/zigbee_cmd"

[zigbee]
# Actuator-bus serial link, owned by the relay consumer thread.
device = "/dev/zigbee_module"
baud_rate = 115200

# Delay after each relayed command, in milliseconds. The coordinator
# drops back-to-back tokens without this.
pacing_ms = 10

[voice]
# Voice-module serial link, owned by the gateway thread.
device = "/dev/voice_module"
baud_rate = 9600

# The voice module enumerates slowly at boot; keep trying this many
# times, this far apart, before disabling voice control for good.
max_open_attempts = 15
open_retry_secs = 2

# Interfaces probed (in order) to answer IP-address queries.
interfaces = ["eth0", "wlan0", "enp0s3", "wlp0s20f3"]

[snapshots]
# Read-only JSON files maintained by the polling daemons.
weather = "/var/lib/hearth/weather.json"
sensor = "/var/lib/hearth/temperature.json"
"#;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path of the persisted actuator-state record
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub zigbee: ZigbeeConfig,

    #[serde(default)]
    pub voice: VoiceConfig,

    #[serde(default)]
    pub snapshots: SnapshotConfig,
}

/// Command queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// POSIX mq name; must start with '/'
    #[serde(default = "default_queue_name")]
    pub name: String,
}

/// Actuator-bus serial configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZigbeeConfig {
    #[serde(default = "default_zigbee_device")]
    pub device: PathBuf,

    #[serde(default = "default_zigbee_baud")]
    pub baud_rate: u32,

    /// Delay after each relayed command (ms)
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

/// Voice-module serial configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoiceConfig {
    #[serde(default = "default_voice_device")]
    pub device: PathBuf,

    #[serde(default = "default_voice_baud")]
    pub baud_rate: u32,

    /// Bounded open attempts before voice control is disabled for the
    /// remainder of the process
    #[serde(default = "default_max_open_attempts")]
    pub max_open_attempts: u32,

    /// Fixed delay between open attempts (seconds)
    #[serde(default = "default_open_retry_secs")]
    pub open_retry_secs: u64,

    /// Interfaces probed in order for IP-address queries
    #[serde(default = "default_interfaces")]
    pub interfaces: Vec<String>,
}

/// Snapshot files produced by the out-of-scope pollers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    /// Weather snapshot (status code, condition text, temperature, humidity)
    #[serde(default = "default_weather_snapshot")]
    pub weather: PathBuf,

    /// Temperature/humidity sensor snapshot
    #[serde(default = "default_sensor_snapshot")]
    pub sensor: PathBuf,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("/var/lib/hearth/device_state.txt")
}

fn default_queue_name() -> String {
    "/zigbee_cmd".to_string()
}

fn default_zigbee_device() -> PathBuf {
    PathBuf::from("/dev/zigbee_module")
}

fn default_zigbee_baud() -> u32 {
    115_200
}

fn default_pacing_ms() -> u64 {
    10
}

fn default_voice_device() -> PathBuf {
    PathBuf::from("/dev/voice_module")
}

fn default_voice_baud() -> u32 {
    9600
}

fn default_max_open_attempts() -> u32 {
    15
}

fn default_open_retry_secs() -> u64 {
    2
}

fn default_interfaces() -> Vec<String> {
    ["eth0", "wlan0", "enp0s3", "wlp0s20f3"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_weather_snapshot() -> PathBuf {
    PathBuf::from("/var/lib/hearth/weather.json")
}

fn default_sensor_snapshot() -> PathBuf {
    PathBuf::from("/var/lib/hearth/temperature.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            queue: QueueConfig::default(),
            zigbee: ZigbeeConfig::default(),
            voice: VoiceConfig::default(),
            snapshots: SnapshotConfig::default(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_queue_name(),
        }
    }
}

impl Default for ZigbeeConfig {
    fn default() -> Self {
        Self {
            device: default_zigbee_device(),
            baud_rate: default_zigbee_baud(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            device: default_voice_device(),
            baud_rate: default_voice_baud(),
            max_open_attempts: default_max_open_attempts(),
            open_retry_secs: default_open_retry_secs(),
            interfaces: default_interfaces(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            weather: default_weather_snapshot(),
            sensor: default_sensor_snapshot(),
        }
    }
}

impl Config {
    /// Per-user config file path
    pub fn user_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "hearth")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// System-wide config file path
    pub fn system_path() -> PathBuf {
        PathBuf::from("/etc/hearth/config.toml")
    }

    /// Runtime directory for ephemeral files (PID file)
    pub fn runtime_dir() -> PathBuf {
        std::env::var("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
            .join("hearth")
    }
}

/// Load configuration from file, with defaults for missing values
///
/// An explicitly passed path must parse; the default locations fall back
/// silently to built-in defaults when absent.
pub fn load_config(path: Option<&Path>) -> Result<Config, HearthError> {
    let mut config = Config::default();

    let config_path = path
        .map(PathBuf::from)
        .or_else(|| Config::user_path().filter(|p| p.exists()))
        .or_else(|| Some(Config::system_path()).filter(|p| p.exists()));

    if let Some(ref path) = config_path {
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| HearthError::Config(format!("Failed to read config: {}", e)))?;

            config = toml::from_str(&contents)
                .map_err(|e| HearthError::Config(format!("Invalid config: {}", e)))?;
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
        }
    }

    // Override from environment variables
    if let Ok(name) = std::env::var("HEARTH_QUEUE_NAME") {
        config.queue.name = name;
    }
    if let Ok(path) = std::env::var("HEARTH_STATE_FILE") {
        config.state_file = PathBuf::from(path);
    }
    if let Ok(device) = std::env::var("HEARTH_ZIGBEE_DEVICE") {
        config.zigbee.device = PathBuf::from(device);
    }
    if let Ok(device) = std::env::var("HEARTH_VOICE_DEVICE") {
        config.voice.device = PathBuf::from(device);
    }

    Ok(config)
}
