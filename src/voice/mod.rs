//! Voice protocol gateway
//!
//! Owns the voice-module serial handle. Inbound bytes are scanned for
//! the lead byte, the following command code is dispatched to either the
//! in-process submission path (actuator commands) or answered directly
//! on the same link (data queries, synthesized from the cached
//! snapshots). Unrecognized codes are ignored.
//!
//! The gateway is generic over `Read + Write` at the port seam so the
//! protocol logic can be exercised without hardware.

pub mod frame;
pub mod snapshot;

use crate::daemon::DaemonContext;
use crate::serial;
use crate::status::{LinkStatus, StatusCell};
use frame::{Query, ReplyType, Request};
use std::io::{self, Read, Write};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

pub struct VoiceGateway {
    ctx: Arc<DaemonContext>,
    status: StatusCell,
}

impl VoiceGateway {
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

    /// Thread body. Bounded open attempts, then listen until the link
    /// dies; either way the transport ends up disabled for the rest of
    /// the process.
    pub fn run(&self) {
        let cfg = &self.ctx.config().voice;

        let mut port = match serial::open_with_retry(
            &cfg.device,
            cfg.baud_rate,
            cfg.max_open_attempts,
            Duration::from_secs(cfg.open_retry_secs),
        ) {
            Ok(port) => port,
            Err(e) => {
                tracing::error!("Voice module unavailable, voice control disabled: {}", e);
                self.status.set(LinkStatus::Disabled);
                return;
            }
        };
        self.status.set(LinkStatus::Online);
        tracing::info!(
            "Voice gateway listening on {} @ {} bps",
            cfg.device.display(),
            cfg.baud_rate
        );

        match self.listen(&mut port) {
            Ok(()) => tracing::warn!("Voice link closed"),
            Err(e) => tracing::error!("Voice link error: {}", e),
        }
        self.status.set(LinkStatus::Disabled);
    }

    /// Byte-oriented scan: wait for the lead byte, read one command
    /// code, dispatch. Returns when the stream ends.
    pub fn listen<P: Read + Write>(&self, port: &mut P) -> io::Result<()> {
        let mut byte = [0u8; 1];
        loop {
            match port.read(&mut byte) {
                Ok(0) => return Ok(()),
                Ok(_) if byte[0] == frame::FRAME_LEAD => {
                    if port.read(&mut byte)? == 0 {
                        return Ok(());
                    }
                    self.dispatch(byte[0], port)?;
                }
                Ok(_) => {} // not a frame start; keep scanning
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn dispatch<P: Read + Write>(&self, code: u8, port: &mut P) -> io::Result<()> {
        match frame::decode(code) {
            Request::Command(command) => {
                tracing::info!("Voice rx 11 {:02X} -> {}", code, command);
                if let Err(e) = self.ctx.submit(command) {
                    tracing::warn!("Voice command not delivered: {}", e);
                }
            }
            Request::Query(query) => self.answer(query, port)?,
            Request::Unknown(code) => {
                tracing::debug!("Ignoring unknown voice code {:02X}", code);
            }
        }
        Ok(())
    }

    /// Synthesize a reply frame for a query and write it back on the
    /// same link. An unavailable snapshot answers nothing.
    fn answer<P: Write>(&self, query: Query, port: &mut P) -> io::Result<()> {
        let cfg = self.ctx.config();
        match query {
            Query::Weather => match snapshot::read_weather(&cfg.snapshots.weather) {
                Some(weather) => {
                    port.write_all(&frame::encode_weather(
                        weather.condition_code,
                        weather.temperature,
                        weather.humidity,
                    ))?;
                    tracing::info!(
                        "Voice tx weather: code {:#04x}, {}°C, {}%",
                        weather.condition_code,
                        weather.temperature,
                        weather.humidity
                    );
                }
                None => tracing::warn!("Weather snapshot unavailable, query unanswered"),
            },
            Query::Temperature => match snapshot::read_sensor(&cfg.snapshots.sensor) {
                Some(sensor) => {
                    // truncation, not rounding
                    let value = sensor.temperature as i32;
                    port.write_all(&frame::encode_value(ReplyType::Temperature, value))?;
                    tracing::info!("Voice tx temperature: {}°C", value);
                }
                None => tracing::warn!("Sensor snapshot unavailable, query unanswered"),
            },
            Query::Humidity => match snapshot::read_sensor(&cfg.snapshots.sensor) {
                Some(sensor) => {
                    let value = sensor.humidity as i32;
                    port.write_all(&frame::encode_value(ReplyType::Humidity, value))?;
                    tracing::info!("Voice tx humidity: {}%", value);
                }
                None => tracing::warn!("Sensor snapshot unavailable, query unanswered"),
            },
            Query::IpAddress => {
                let ip = local_ipv4(&cfg.voice.interfaces);
                port.write_all(&frame::encode_ip(ip.octets()))?;
                tracing::info!("Voice tx IP address: {}", ip);
            }
        }
        Ok(())
    }
}

/// First IPv4 address found on the configured interfaces, probed in
/// order; 0.0.0.0 on total failure.
pub fn local_ipv4(interfaces: &[String]) -> Ipv4Addr {
    let Ok(addrs) = nix::ifaddrs::getifaddrs() else {
        return Ipv4Addr::UNSPECIFIED;
    };
    let addrs: Vec<_> = addrs.collect();

    for name in interfaces {
        for ifaddr in &addrs {
            if &ifaddr.interface_name != name {
                continue;
            }
            if let Some(sin) = ifaddr.address.as_ref().and_then(|a| a.as_sockaddr_in()) {
                return sin.ip();
            }
        }
    }
    Ipv4Addr::UNSPECIFIED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_interfaces_fall_back_to_unspecified() {
        let interfaces = vec!["hearth-test-no-such-if".to_string()];
        assert_eq!(local_ipv4(&interfaces), Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_empty_interface_list_falls_back_to_unspecified() {
        assert_eq!(local_ipv4(&[]), Ipv4Addr::UNSPECIFIED);
    }
}
