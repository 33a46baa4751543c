// Command-line interface definitions for hearth
//
// This module is separate so it can be used by both the binary (main.rs)
// and build.rs for generating man pages.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hearth")]
#[command(author, version, about = "Home-automation hub daemon for the Zigbee actuator bus")]
#[command(long_about = "
Hearth bridges web requests, a voice-recognition module, and a Zigbee
actuator network. The daemon owns the two serial links and the command
queue; web-facing processes use the submit/state subcommands.

SETUP:
  1. Ensure the daemon user can open the serial devices
     (typically: sudo usermod -aG dialout <user>)
  2. Adjust /etc/hearth/config.toml if the device paths differ
  3. Run: hearth daemon

USAGE:
  hearth submit L1      # request light on (out-of-process producer path)
  hearth state light    # query last-requested light state
")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as daemon (default if no command specified)
    Daemon,

    /// Submit an actuator command token (e.g. L1, F0, D1)
    Submit {
        /// Wire token from the actuator vocabulary
        token: String,
    },

    /// Show last-requested actuator state
    State {
        /// Actuator name (light, fan, aircon, washer, door); omit for all
        actuator: Option<String>,
    },

    /// Show current configuration
    Config,
}
