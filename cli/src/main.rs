use std::{
    env,
    fs::File,
    io,
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, level_filters::LevelFilter};
use tracing_subscriber::{Registry, layer::SubscriberExt, prelude::*, util::SubscriberInitExt};

use cli::{moves_report, perft_report, play_report};

const LOG_PATH_ENV_VAR: &str = "CHESS_RULES_LOG_PATH";

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Count the move tree under a position.
    Perft {
        fen: String,
        depth: u8,
        /// Break the count down by root move.
        #[arg(long)]
        divide: bool,
    },
    /// List the legal moves in a position.
    Moves { fen: String },
    /// Play coordinate moves (e.g. e2e4 e7e8q) from a FEN or `startpos`.
    Play {
        start: String,
        moves: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    enable_logging()?;

    let report = match cli.command {
        Commands::Perft { fen, depth, divide } => perft_report(&fen, depth as usize, divide)?,
        Commands::Moves { fen } => moves_report(&fen)?,
        Commands::Play { start, moves } => play_report(&start, &moves)?,
    };
    print!("{}", report);
    Ok(())
}

fn enable_logging() -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        );

    let log_layer = match env::var(LOG_PATH_ENV_VAR) {
        Ok(log_path_str) => {
            let log_path = PathBuf::from_str(&log_path_str)?;
            let log_file = File::create(&log_path)
                .context(format!("Couldn't create file {:?}", log_path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(log_file)
                    .with_ansi(false)
                    .with_filter(LevelFilter::from_level(Level::DEBUG)),
            )
        }
        Err(_) => None,
    };

    Registry::default()
        .with(stderr_layer)
        .with(log_layer)
        .init();

    Ok(())
}
