//! Hearth - home-automation hub daemon
//!
//! Run with `hearth` or `hearth daemon` to start the daemon.
//! Use `hearth submit <token>` to queue an actuator command.
//! Use `hearth state [actuator]` to read last-requested state.

mod cli;
mod command;
mod config;
mod daemon;
mod error;
mod queue;
mod relay;
mod serial;
mod state;
mod status;
mod submit;
mod voice;

use clap::Parser;
use cli::{Cli, Commands};
use command::Actuator;
use config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("hearth={},warn", log_level))),
        )
        .with_target(false)
        .init();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    // Run the appropriate command
    match cli.command.unwrap_or(Commands::Daemon) {
        Commands::Daemon => {
            let mut daemon = daemon::Daemon::new(config);
            daemon.run().await?;
        }

        Commands::Submit { token } => {
            submit::submit(&config, &token)?;
            println!("ok");
        }

        Commands::State { actuator } => {
            show_state(&config, actuator.as_deref())?;
        }

        Commands::Config => {
            show_config(&config)?;
        }
    }

    Ok(())
}

/// Print last-requested state for one actuator (machine-friendly) or all
fn show_state(config: &Config, actuator: Option<&str>) -> anyhow::Result<()> {
    match actuator {
        Some(name) => {
            let actuator = Actuator::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("unknown actuator: {name}"))?;
            println!(
                "{}",
                if submit::get_state(config, actuator) {
                    "on"
                } else {
                    "off"
                }
            );
        }
        None => {
            let snapshot = state::StateStore::new(&config.state_file).load();
            for actuator in Actuator::ALL {
                println!(
                    "{}: {}",
                    actuator.name(),
                    if snapshot.get(actuator) { "on" } else { "off" }
                );
            }
        }
    }
    Ok(())
}

/// Print the effective configuration as TOML
fn show_config(config: &Config) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
