//! Serial port acquisition
//!
//! Both hardware links (actuator bus, voice module) are plain tty devices
//! configured raw at a fixed baud rate. Each open handle is owned by
//! exactly one thread for the process lifetime.

use crate::error::SerialError;
use nix::sys::termios::{self, BaudRate, FlushArg, SetArg};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::thread;
use std::time::Duration;

fn baud_rate(baud: u32) -> Result<BaudRate, SerialError> {
    match baud {
        9600 => Ok(BaudRate::B9600),
        19200 => Ok(BaudRate::B19200),
        38400 => Ok(BaudRate::B38400),
        57600 => Ok(BaudRate::B57600),
        115_200 => Ok(BaudRate::B115200),
        other => Err(SerialError::UnsupportedBaud(other)),
    }
}

/// Open a tty, put it in raw mode at the given speed, and flush both
/// directions.
pub fn open_raw(device: &Path, baud: u32) -> Result<File, SerialError> {
    let rate = baud_rate(baud)?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(device)
        .map_err(|source| SerialError::Open {
            device: device.display().to_string(),
            source,
        })?;

    let configure = |source| SerialError::Configure {
        device: device.display().to_string(),
        source,
    };

    let mut tty = termios::tcgetattr(&file).map_err(configure)?;
    termios::cfmakeraw(&mut tty);
    termios::cfsetspeed(&mut tty, rate).map_err(configure)?;
    termios::tcsetattr(&file, SetArg::TCSANOW, &tty).map_err(configure)?;
    termios::tcflush(&file, FlushArg::TCIOFLUSH).map_err(configure)?;

    Ok(file)
}

/// Bounded retry loop around [`open_raw`]: `attempts` tries with a fixed
/// `delay` between them, then the last error. The caller decides what
/// "giving up" means (for the voice gateway: disabled for the rest of
/// the process).
pub fn open_with_retry(
    device: &Path,
    baud: u32,
    attempts: u32,
    delay: Duration,
) -> Result<File, SerialError> {
    let attempts = attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match open_raw(device, baud) {
            Ok(file) => {
                tracing::info!("Serial port opened: {}", device.display());
                return Ok(file);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to open {} (attempt {}/{}): {}",
                    device.display(),
                    attempt,
                    attempts,
                    e
                );
                last_error = Some(e);
                if attempt < attempts {
                    thread::sleep(delay);
                }
            }
        }
    }

    Err(last_error.unwrap_or(SerialError::UnsupportedBaud(baud)))
}
