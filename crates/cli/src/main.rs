//! routectl - AV routing device control CLI
//!
//! Opens a driver for one device, sends a single routing or power command and
//! closes it again. Useful for commissioning hardware and for checking an
//! address before it is configured in the application.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use openrouting_drivers::DriverRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::PowerState;

#[derive(Parser)]
#[command(name = "routectl")]
#[command(about = "AV routing device control - tie inputs and switch power on matrices, switches and monitors")]
#[command(version)]
#[command(long_about = "
routectl drives AV routing hardware through the OpenRouting driver registry.

Device addresses select the transport:
  port:<path>          serial port (e.g. port:/dev/ttyUSB0, port:COM3)
  ip:<host>[:<port>]   raw TCP, port 23 when omitted
  <path>               local socket (Unix domain socket or named pipe)

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(long, global = true, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// YAML file with registry settings
    #[arg(long, global = true, env = "ROUTECTL_CONFIG")]
    config: Option<PathBuf>,

    /// Give up opening a device after this many milliseconds (0 waits forever)
    #[arg(long, global = true, env = "ROUTECTL_OPEN_TIMEOUT_MS")]
    open_timeout_ms: Option<u64>,

    /// Force-release a device that does not close within this many milliseconds
    #[arg(long, global = true, env = "ROUTECTL_CLOSE_TIMEOUT_MS")]
    close_timeout_ms: Option<u64>,

    /// Locale for driver titles
    #[arg(long, global = true, env = "ROUTECTL_LOCALE", default_value = "en")]
    locale: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered device families
    List,

    /// Route an input to video and audio outputs
    Tie {
        /// Device family identifier (see `routectl list`)
        family: String,
        /// Device address
        address: String,
        /// Input channel, starting at 1
        input: u32,
        /// Video output channel; 0 leaves it unchanged
        #[arg(default_value_t = 1)]
        video: u32,
        /// Audio output channel; defaults to the video output
        audio: Option<u32>,
    },

    /// Switch a device on or off
    Power {
        /// Device family identifier
        family: String,
        /// Device address
        address: String,
        #[arg(value_enum)]
        state: PowerState,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_unset| {
                format!(
                    "routectl={level},openrouting_drivers={level},openrouting_transport={level}",
                    level = log_level
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let exit_code = error::exit_code(&e);
            if cli.json {
                output::print_error_json(&e, exit_code);
            } else {
                output::print_error_human(&e);
            }
            std::process::exit(exit_code);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }

    let config = config::load(
        cli.config.as_deref(),
        cli.open_timeout_ms,
        cli.close_timeout_ms,
    )?;
    let registry = DriverRegistry::with_builtin_drivers(config);

    match &cli.command {
        Commands::List => commands::list::execute(&registry, cli.json, &cli.locale),
        Commands::Tie {
            family,
            address,
            input,
            video,
            audio,
        } => {
            commands::route::tie(
                &registry,
                family,
                address,
                *input,
                *video,
                audio.unwrap_or(*video),
                cli.json,
            )
            .await
        }
        Commands::Power {
            family,
            address,
            state,
        } => commands::route::power(&registry, family, address, *state, cli.json).await,
        Commands::Completion { .. } => Ok(()),
    }
}
