//! Ranker - A Matrix bot managing the ranks of a Roblox group.
//!
//! Moderators type commands in a Matrix room; the bot applies them to the
//! configured Roblox group and answers with exactly one reply per command.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! roblox:
//!   group_id: 4242
//!   cookie: "your-roblosecurity-cookie"
//!
//! matrix:
//!   user_id: "@ranker:matrix.org"
//!   password: "your-password"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `RANKER_` prefix:
//!
//! ```bash
//! export RANKER_ROBLOX__COOKIE="your-roblosecurity-cookie"
//! export RANKER_MATRIX__PASSWORD="your-password"
//! ```
//!
//! # Usage
//!
//! ```bash
//! ranker --config config.yaml --data ./data
//! ```
//!
//! # Bot Commands
//!
//! - `!ranker promote <username>` - Move a member one rank up
//! - `!ranker demote <username>` - Move a member one rank down
//! - `!ranker kick <username>` - Remove a member from the group
//! - `!ranker setrank <username> [rankname=<name>] [ranknumber=<n>]` - Set the rank of a member
//! - `!ranker rankinfo` - List the ranks of the group
//! - `!ranker rankhistory <username>` - Recent actions on a member
//! - `!ranker auditlog` - Recent actions in the group
//! - `!ranker help` - Display help information
//!
//! # Architecture
//!
//! - [`audit`] - Bounded in-memory log of executed actions
//! - [`bot`] - Wiring of Matrix messages to the command dispatcher
//! - [`commands`] - Command parsing, execution and replies
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`matrix`] - Matrix client integration and session management
//! - [`ranks`] - Rank resolution from a number or a name fragment
//! - [`roblox`] - Roblox users and groups API client
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod audit;
mod bot;
mod commands;
mod config;
mod matrix;
mod ranks;
mod roblox;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: String,

    /// Directory holding the Matrix session and store
    #[arg(short, long)]
    data: PathBuf,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting ranker {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {:#}", e);
            return;
        }
    };

    let bot = match Bot::new(config, &args.data).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:#}", e);
            return;
        }
    };
    bot.start().await;
}
