//! Platform M+ gateway
//!
//! Drives an Icon Platform M+ control surface: pages, subpages, display
//! synchronization, LED feedback and the Midi page's CC bridge.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mplus_gw::config::AppConfig;
use mplus_gw::ports::SurfaceDriver;
use mplus_gw::surface::Surface;

/// Platform M+ Gateway - pages, display sync and LED feedback for the Icon Platform M+
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List available MIDI ports
    #[arg(long)]
    list_ports: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    if args.list_ports {
        print_ports()?;
        return Ok(());
    }

    info!("Starting Platform M+ gateway");
    let config = AppConfig::load(&args.config)?;

    let mut driver = SurfaceDriver::new(&config);
    driver.connect()?;

    let mut surface = Surface::new(driver.surface_out()?, driver.cc_out(), config.midi_page);
    surface.activate()?;

    let mut events = driver
        .take_event_receiver()
        .ok_or_else(|| anyhow::anyhow!("surface event receiver already taken"))?;

    info!("Ready to process surface events");

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if let Err(e) = surface.on_midi(&event.message) {
                    warn!("handling {} failed: {}", event.message, e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    info!("Platform M+ gateway shutdown complete");
    Ok(())
}

fn print_ports() -> Result<()> {
    println!("=== MIDI Input Ports ===");
    for name in SurfaceDriver::list_input_ports()? {
        println!("  {}", name);
    }
    println!("=== MIDI Output Ports ===");
    for name in SurfaceDriver::list_output_ports()? {
        println!("  {}", name);
    }
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
