//! Voice-bus wire protocol
//!
//! Inbound traffic is a 2-byte header: a fixed lead byte followed by one
//! command code selecting an actuator command or a query. Outbound
//! replies are fixed-length binary frames bounded by 2-byte magic
//! markers: 9 bytes for a single 32-bit field, 14 bytes for the weather
//! reply (condition code plus two 32-bit fields). All 32-bit fields are
//! little-endian signed.

use crate::command::Command;

/// Lead byte announcing an inbound header
pub const FRAME_LEAD: u8 = 0x11;

/// Magic marker opening every outbound frame
pub const MAGIC_HEAD: [u8; 2] = [0xAA, 0x55];

/// Magic marker closing every outbound frame
pub const MAGIC_TAIL: [u8; 2] = [0x55, 0xAA];

pub const VALUE_FRAME_LEN: usize = 9;
pub const WEATHER_FRAME_LEN: usize = 14;

/// Data queries the voice module can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Weather,
    Temperature,
    Humidity,
    IpAddress,
}

/// What one inbound command code resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Command(Command),
    Query(Query),
    Unknown(u8),
}

/// Resolve an inbound command code.
///
/// Code 0x11 (IP-address query) is the same byte as [`FRAME_LEAD`]; the
/// collision is inherited from the module firmware and preserved here.
pub fn decode(code: u8) -> Request {
    match code {
        0x01 => Request::Command(Command::LightOn),
        0x02 => Request::Command(Command::LightOff),
        0x05 => Request::Command(Command::FanOn),
        0x06 => Request::Command(Command::FanOff),
        0x07 => Request::Command(Command::AirconOn),
        0x08 => Request::Command(Command::AirconOff),
        0x09 => Request::Command(Command::DoorOpen),
        0x10 => Request::Command(Command::DoorClose),
        0x12 => Request::Command(Command::WasherOn),
        0x13 => Request::Command(Command::WasherOff),
        0x03 => Request::Query(Query::Temperature),
        0x04 => Request::Query(Query::Humidity),
        0x11 => Request::Query(Query::IpAddress),
        0xFF => Request::Query(Query::Weather),
        other => Request::Unknown(other),
    }
}

/// Type byte of an outbound reply frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReplyType {
    Weather = 0x01,
    Temperature = 0x02,
    Humidity = 0x03,
    IpAddress = 0x04,
}

/// 9-byte reply carrying one little-endian i32
pub fn encode_value(reply: ReplyType, value: i32) -> [u8; VALUE_FRAME_LEN] {
    let mut frame = [0u8; VALUE_FRAME_LEN];
    frame[..2].copy_from_slice(&MAGIC_HEAD);
    frame[2] = reply as u8;
    frame[3..7].copy_from_slice(&value.to_le_bytes());
    frame[7..].copy_from_slice(&MAGIC_TAIL);
    frame
}

/// 9-byte IP reply; the four octets ride where the i32 would
pub fn encode_ip(octets: [u8; 4]) -> [u8; VALUE_FRAME_LEN] {
    let mut frame = [0u8; VALUE_FRAME_LEN];
    frame[..2].copy_from_slice(&MAGIC_HEAD);
    frame[2] = ReplyType::IpAddress as u8;
    frame[3..7].copy_from_slice(&octets);
    frame[7..].copy_from_slice(&MAGIC_TAIL);
    frame
}

/// 14-byte weather reply: condition code, temperature, humidity
pub fn encode_weather(
    condition_code: u8,
    temperature: i32,
    humidity: i32,
) -> [u8; WEATHER_FRAME_LEN] {
    let mut frame = [0u8; WEATHER_FRAME_LEN];
    frame[..2].copy_from_slice(&MAGIC_HEAD);
    frame[2] = ReplyType::Weather as u8;
    frame[3] = condition_code;
    frame[4..8].copy_from_slice(&temperature.to_le_bytes());
    frame[8..12].copy_from_slice(&humidity.to_le_bytes());
    frame[12..].copy_from_slice(&MAGIC_TAIL);
    frame
}
