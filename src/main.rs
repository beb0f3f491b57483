//! Sorteio - A Matrix bot running giveaways, with chat commands and a web control panel.
//!
//! # Overview
//!
//! Sorteio listens to the Matrix rooms it is invited to and answers a handful of
//! commands: stickers, dice, room IDs and, above all, raffles. A raffle can be driven
//! from the chat or from the web control panel, which also sends arbitrary messages.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! matrix:
//!   user_id: "@sorteio:matrix.org"
//!   password: "your-password"
//!   passphrase: "your-store-passphrase"
//!
//! panel:
//!   port: 3000
//! ```
//!
//! Any value can be overridden with a `SORTEIO_` environment variable, e.g.
//! `SORTEIO_MATRIX__PASSWORD`.
//!
//! # Usage
//!
//! ```bash
//! sorteio --config config.yaml --data ./sorteio-data
//! ```
//!
//! # Bot Commands
//!
//! - `/sticker`, `/figurinha` - Turn an image into a sticker
//! - `/dado` - Roll a die
//! - `/id` - Show the room ID
//! - `/sorteio`, `/entrar`, `/ganhador` - Start, enter and draw a raffle
//! - `/ajuda`, `/menu` - Display help information
//!
//! # Architecture
//!
//! - [`bot`] - Wiring of the Matrix client, the commands and the panel
//! - [`commands`] - Command parsing and execution
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`matrix`] - Matrix client integration and session management
//! - [`panel`] - HTTP control panel
//! - [`raffle`] - Raffle state machine shared by chat and panel
//! - [`session`] - Messaging capabilities the core depends on
//! - [`sticker`] - Image to sticker conversion
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod matrix;
mod panel;
mod raffle;
mod session;
mod sticker;

/// Command-line arguments of the bot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// Contains `session/`, with the Matrix authentication tokens and the encrypted
    /// SDK store. Keep it private: it allows impersonating the bot.
    #[arg(short, long)]
    data: PathBuf,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting sorteio {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, &args.data).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:?}", e);
            return;
        }
    };
    bot.start().await;
}
