//! NPlanetary Game Server
//!
//! `nplanetary-server new <FILE> <NUM_PLAYERS>` creates a game and serves it;
//! `nplanetary-server load <FILE>` resumes one.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nplanetary::{GameServer, ServerConfig, MAX_PLAYERS, MIN_PLAYERS, VERSION};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Address to listen on (overrides NPLANETARY_BIND)
    #[clap(long, global = true)]
    bind: Option<std::net::SocketAddr>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new game and save it to FILE
    New {
        /// Save file
        file: PathBuf,
        /// Number of players
        #[clap(
            value_parser = clap::value_parser!(u8).range(MIN_PLAYERS as i64..=MAX_PLAYERS as i64)
        )]
        num_players: u8,
    },
    /// Resume the game saved in FILE
    Load {
        /// Save file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("NPlanetary Server v{}", VERSION);

    let mut config = ServerConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let server = match args.command {
        Command::New { file, num_players } => {
            GameServer::new_game(config.with_save_path(&file), usize::from(num_players))
                .with_context(|| format!("could not create game at {}", file.display()))?
        }
        Command::Load { file } => GameServer::load_game(config.with_save_path(&file))
            .with_context(|| format!("could not load game from {}", file.display()))?,
    };
    let server = Arc::new(server);

    let signal_server = Arc::clone(&server);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_server.shutdown(),
            Err(e) => warn!("Could not listen for ctrl-c: {}", e),
        }
    });

    server.run().await?;
    Ok(())
}
