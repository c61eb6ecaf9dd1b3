//! Museu - native launcher
//!
//! Reads the museum configuration, sets up logging and runs the same Bevy app
//! as the web build in a desktop window.

use anyhow::{bail, Context, Result};
use clap::Parser;
use museu_core::MuseumConfig;
use museu_web::LaunchOptions;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "museu")]
#[command(about = "Virtual museum walkthrough")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "assets/museum.toml")]
    config: PathBuf,

    /// Directory models and textures are loaded from
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,

    /// Skip the start screen with this avatar (e.g. "Jody")
    #[arg(long)]
    avatar: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write the default configuration to --config and exit
    #[arg(long)]
    write_default_config: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Turn parsed arguments into launch options
fn launch_options(args: &Args) -> Result<LaunchOptions> {
    let config = MuseumConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if let Some(name) = &args.avatar {
        if config.find_avatar(name).is_none() {
            let roster: Vec<&str> = config.avatars.iter().map(|a| a.name.as_str()).collect();
            bail!("Unknown avatar '{}' (available: {})", name, roster.join(", "));
        }
    }

    // Relative asset roots would otherwise resolve against the crate directory
    let asset_root = std::env::current_dir()?.join(&args.assets);

    Ok(LaunchOptions {
        config,
        asset_root: asset_root.to_string_lossy().into_owned(),
        avatar: args.avatar.clone(),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Museu v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        MuseumConfig::default().save(&args.config)?;
        info!("Default configuration written to {}", args.config.display());
        return Ok(());
    }

    let options = launch_options(&args)?;
    info!(
        artworks = options.config.artworks.len(),
        avatars = options.config.avatars.len(),
        assets = %options.asset_root,
        "Configuration loaded"
    );

    museu_web::run(options);
    Ok(())
}
