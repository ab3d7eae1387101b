//! # kb - Kanban board client
//!
//! A terminal client for a kanban task tracker. The backend owns the tasks;
//! this binary creates, lists, edits, moves and deletes them over HTTP, and
//! offers an interactive board (TUI) with drag-and-drop between the
//! *Not Started*, *In Progress* and *Completed* columns.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the board
//! kb board
//!
//! # Add a task
//! kb add "User login" --desc "OAuth flow" --sp 5 --priority high \
//!     --progress not-started --tag back-end,api
//!
//! # List tasks as a table
//! kb list --view list
//!
//! # Move a task to the next column
//! kb move 3 in-progress --stage development
//! ```
//!
//! ## Configuration
//!
//! `~/.kanban/config.toml` (or `--config`):
//!
//! ```toml
//! server_url = "http://127.0.0.1:5000"
//! session_cookie = "session=..."
//! timeout_secs = 30
//! persist_moves = false
//! default_view = "card"
//! ```
//!
//! `KANBAN_SERVER` and `KANBAN_SESSION` override the file, and `--server`
//! overrides both. Set `KANBAN_LOG` (e.g. `debug`) for logs on stderr.
//!
//! Development tags travel as a five character bit vector; see `kb tags`.

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod board;
pub mod cli;
pub mod client;
pub mod cmd;
pub mod config;
pub mod fields;
pub mod sprint;
pub mod tags;
pub mod task;
pub mod validate;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;

const LOG_ENV: &str = "KANBAN_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    // Commands that never reach the backend
    match cli.command {
        Commands::Completions { shell } => {
            cmd_completions(shell);
            return;
        }
        Commands::Tags { decode, encode } => {
            cmd_tags(decode, encode);
            return;
        }
        Commands::Sprint { action } => {
            cmd_sprint(action);
            return;
        }
        _ => {}
    }

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    if let Commands::Board = cli.command {
        cmd_board(&config);
        return;
    }

    let api = connect(&config);
    match cli.command {
        Commands::Add { title, desc, story_point, priority, progress, tags } =>
            cmd_add(&api, title, desc, story_point, priority, progress, tags),

        Commands::List { view } => cmd_list(&api, view.unwrap_or(config.default_view)),

        Commands::View { id } => cmd_view(&api, id),

        Commands::Update { id, title, desc, story_point, priority, progress, stage, tags } => {
            let fields = UpdateFields { title, desc, story_point, priority, progress, stage, tags };
            cmd_update(&api, id, fields)
        }

        Commands::Move { id, to, stage } => cmd_move(&api, id, to, stage),

        Commands::Delete { id, yes } => cmd_delete(&api, id, yes),

        Commands::Board
        | Commands::Tags { .. }
        | Commands::Sprint { .. }
        | Commands::Completions { .. } => unreachable!("handled above"),
    }
}
