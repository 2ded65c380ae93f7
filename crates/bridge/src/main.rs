//! DroidBridge CLI
//!
//! Command-line client for browsing connected Android devices and moving
//! files between them and the local machine.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bridge::adb::ExecBridge;
use bridge::config::Config;
use bridge::presence::{ListenerClosed, PresenceListener};
use bridge::service::{BridgeService, ServiceError};
use protocol::{DirectoryListing, PresenceUpdate, TransferDirection, TransferRequest};

/// DroidBridge - browse and transfer files on Android devices over adb.
#[derive(Parser, Debug)]
#[command(name = "droidbridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List connected devices
    Devices {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List a local directory
    Ls {
        /// Directory to list (defaults to the configured local root)
        path: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List a directory on a device
    RemoteLs {
        /// Device serial
        serial: String,

        /// Directory to list (defaults to the configured remote root)
        path: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Pull a file from a device to the local machine
    Pull {
        /// Device serial
        serial: String,

        /// Remote source path
        remote_path: String,

        /// Local destination path
        local_path: String,
    },

    /// Push a local file to a device
    Push {
        /// Device serial
        serial: String,

        /// Local source path
        local_path: String,

        /// Remote destination path
        remote_path: String,
    },

    /// Watch device presence, printing one JSON update per line
    Watch,
}

/// Prints each presence update as one JSON line on stdout.
struct StdoutListener;

#[async_trait]
impl PresenceListener for StdoutListener {
    async fn send(&self, update: PresenceUpdate) -> Result<(), ListenerClosed> {
        match serde_json::to_string(&update) {
            Ok(line) => {
                println!("{}", line);
                Ok(())
            }
            Err(_) => Err(ListenerClosed),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default()?
    };

    // Apply environment variable overrides
    config.apply_env_overrides();

    // Validate configuration
    config.validate()?;

    // Initialize tracing; --verbose wins, then RUST_LOG, then the config level
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(config_path) = &cli.config {
        tracing::debug!("Using config file: {:?}", config_path);
    }

    // Talk to devices through the configured adb binary, or the one on PATH
    let exec = match &config.adb.binary {
        Some(binary) => ExecBridge::new(binary.clone()),
        None => ExecBridge::discover()?,
    };
    tracing::debug!("Using adb binary: {:?}", exec.binary());

    let service = BridgeService::new(config, Arc::new(exec));

    match cli.command {
        Commands::Devices { json } => {
            let devices = service.current_devices().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else if devices.is_empty() {
                println!("No devices connected.");
            } else {
                for device in &devices {
                    println!(
                        "{}  {} {} (Android {})",
                        device.serial, device.manufacturer, device.model, device.android_version
                    );
                }
                println!();
                println!("Total: {} device(s)", devices.len());
            }
        }
        Commands::Ls { path, json } => match service.list_local(path.as_deref()).await {
            Ok(listing) => print_listing(&listing, json)?,
            Err(e) => fail(e),
        },
        Commands::RemoteLs { serial, path, json } => {
            match service.list_remote(&serial, path.as_deref()).await {
                Ok(listing) => print_listing(&listing, json)?,
                Err(e) => fail(e),
            }
        }
        Commands::Pull {
            serial,
            remote_path,
            local_path,
        } => {
            let request = TransferRequest {
                source_path: remote_path,
                destination_path: local_path,
                device_serial: serial,
                direction: TransferDirection::ToLocal,
            };
            match service.transfer(&request).await {
                Ok(outcome) => println!("Pulled to {}", outcome.destination_path),
                Err(e) => fail(e),
            }
        }
        Commands::Push {
            serial,
            local_path,
            remote_path,
        } => {
            let request = TransferRequest {
                source_path: local_path,
                destination_path: remote_path,
                device_serial: serial,
                direction: TransferDirection::ToRemote,
            };
            match service.transfer(&request).await {
                Ok(outcome) => println!("Pushed to {}", outcome.destination_path),
                Err(e) => fail(e),
            }
        }
        Commands::Watch => {
            let _subscription = service.subscribe(StdoutListener);
            tracing::info!("Watching device presence, press Ctrl-C to stop");

            tokio::signal::ctrl_c().await?;
            tracing::info!("Stopped watching");
        }
    }

    Ok(())
}

/// Report a service error and exit.
fn fail(e: ServiceError) -> ! {
    eprintln!("Error ({}): {}", e.kind().as_str(), e);
    std::process::exit(1);
}

/// Print a directory listing, either as JSON or as a readable table.
fn print_listing(listing: &DirectoryListing, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }

    println!("{}", listing.current_path);
    for entry in &listing.files {
        if entry.is_directory {
            println!("  {}/", entry.name);
        } else {
            println!("  {}  {}", entry.name, format_size(entry.size));
        }
    }
    println!();
    println!("Total: {} item(s)", listing.files.len());
    Ok(())
}

/// Format a byte count in human-readable form.
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
