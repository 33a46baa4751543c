//! Cached sensor and weather snapshots
//!
//! The polling daemons (out of scope here) rewrite two JSON files in
//! place, holding an exclusive `flock` while they do; we read under a
//! shared lock. Any read or parse failure makes the snapshot
//! unavailable; the gateway then simply does not answer the query.

use nix::fcntl::{Flock, FlockArg};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A snapshot file larger than this is not one of ours
const MAX_SNAPSHOT_BYTES: u64 = 4096;

/// Temperature/humidity sensor snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct SensorSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct WeatherFile {
    now: WeatherNow,
}

/// The upstream API reports numbers as strings
#[derive(Debug, Deserialize)]
struct WeatherNow {
    text: String,
    temp: String,
    humidity: String,
}

/// Decoded weather snapshot, ready for frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub condition_code: u8,
    pub temperature: i32,
    pub humidity: i32,
}

fn read_locked(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    if file.metadata().ok()?.len() > MAX_SNAPSHOT_BYTES {
        return None;
    }
    let mut locked = Flock::lock(file, FlockArg::LockShared).ok()?;
    let mut contents = String::new();
    locked.read_to_string(&mut contents).ok()?;
    Some(contents)
}

/// Read the temperature/humidity snapshot under a shared lock.
pub fn read_sensor(path: &Path) -> Option<SensorSnapshot> {
    serde_json::from_str(&read_locked(path)?).ok()
}

/// Read and decode the weather snapshot under a shared lock.
pub fn read_weather(path: &Path) -> Option<WeatherSnapshot> {
    let parsed: WeatherFile = serde_json::from_str(&read_locked(path)?).ok()?;
    Some(WeatherSnapshot {
        condition_code: condition_code(&parsed.now.text),
        temperature: lenient_i32(&parsed.now.temp),
        humidity: lenient_i32(&parsed.now.humidity),
    })
}

/// Numeric strings from the weather API; unparseable values read as 0.
fn lenient_i32(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

/// Map the closed set of condition descriptions to the wire code.
/// Unknown text encodes as 0.
pub fn condition_code(text: &str) -> u8 {
    match text {
        "sunny" => 0x01,
        "cloudy" => 0x02,
        "overcast" => 0x03,
        "foggy" => 0x04,
        "light rain" => 0x05,
        "moderate rain" => 0x06,
        "heavy rain" => 0x07,
        "rainstorm" => 0x08,
        "showers" => 0x09,
        "thunderstorm" => 0x0A,
        "light snow" => 0x0B,
        "moderate snow" => 0x0C,
        "heavy snow" => 0x0D,
        "sleet" => 0x0E,
        "snow showers" => 0x0F,
        "haze" => 0x10,
        _ => 0x00,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_snapshot(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_sensor_snapshot_parses() {
        let (_dir, path) =
            write_snapshot(r#"{"temperature": 23.9, "humidity": 40.2, "timestamp": 1723400000}"#);
        let snapshot = read_sensor(&path).unwrap();
        assert_eq!(snapshot.temperature, 23.9);
        assert_eq!(snapshot.humidity, 40.2);
        assert_eq!(snapshot.timestamp, 1723400000);
        // frame encoding truncates, never rounds
        assert_eq!(snapshot.temperature as i32, 23);
        assert_eq!(snapshot.humidity as i32, 40);
    }

    #[test]
    fn test_sensor_snapshot_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_sensor(&dir.path().join("nope.json")).is_none());
    }

    #[test]
    fn test_sensor_snapshot_malformed_json() {
        let (_dir, path) = write_snapshot("{not json");
        assert!(read_sensor(&path).is_none());
    }

    #[test]
    fn test_weather_snapshot_decodes() {
        let (_dir, path) =
            write_snapshot(r#"{"now": {"text": "sunny", "temp": "23", "humidity": "40"}}"#);
        assert_eq!(
            read_weather(&path),
            Some(WeatherSnapshot {
                condition_code: 0x01,
                temperature: 23,
                humidity: 40,
            })
        );
    }

    #[test]
    fn test_weather_unknown_condition_is_code_zero() {
        let (_dir, path) =
            write_snapshot(r#"{"now": {"text": "volcanic ash", "temp": "-3", "humidity": "x"}}"#);
        assert_eq!(
            read_weather(&path),
            Some(WeatherSnapshot {
                condition_code: 0x00,
                temperature: -3,
                humidity: 0,
            })
        );
    }

    #[test]
    fn test_oversized_snapshot_is_unavailable() {
        let big = format!(
            r#"{{"temperature": 1, "humidity": 1, "pad": "{}"}}"#,
            "x".repeat(5000)
        );
        let (_dir, path) = write_snapshot(&big);
        assert!(read_sensor(&path).is_none());
    }
}
