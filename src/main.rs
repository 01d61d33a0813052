//! # Manse Main Entry Point
//!
//! Initializes the session, sets up macroquad rendering, and runs the scene loop.

use clap::Parser;
use log::info;
use macroquad::prelude::*;
use manse::{GameSession, InputHandler, ManorConfig, ManseResult, RoomCatalog, SceneManager};
#[cfg(feature = "dev-tools")]
use tracing::Level;

/// Command line arguments for Manse.
#[derive(Parser, Debug)]
#[command(name = "manse")]
#[command(about = "A seeded manor-drafting exploration game")]
#[command(version)]
struct Args {
    /// Random seed for the manor
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the standard room catalog as JSON and exit
    #[arg(long)]
    dump_catalog: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Manse")]
async fn main() -> ManseResult<()> {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(&args.log_level)?;

    info!("Starting Manse v{}", manse::VERSION);

    if args.dump_catalog {
        let catalog = RoomCatalog::standard();
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    run_game(&args).await
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> ManseResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        };

        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .init();
    }

    Ok(())
}

/// Runs the main game with macroquad graphics.
async fn run_game(args: &Args) -> ManseResult<()> {
    // Window sized for the 5x9 board plus HUD and overlays
    request_new_screen_size(760.0, 840.0);

    let seed = args.seed.unwrap_or(12345);

    info!("Building the manor with seed: {}", seed);

    let manor = ManorConfig::new(seed);
    let session = GameSession::new(&manor)?;
    let input_handler = InputHandler::new();

    let mut scenes = SceneManager::new(session, input_handler).await?;
    scenes.run().await?;

    info!("Game loop ended");
    Ok(())
}
