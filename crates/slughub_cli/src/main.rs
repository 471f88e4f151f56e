//! SlugHub command-line entry point.
//!
//! # Responsibility
//! - Parse commands and resolve config, session, and database.
//! - Delegate to `slughub_core` services; no business rules live here.

use clap::{Parser, Subcommand};
use slughub_core::db::open_db;
use slughub_core::{init_logging_from_config, CoreConfig, UserId};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "slughub", version, about = "Class schedule navigation and forum feeds")]
struct Cli {
    /// SQLite database path (overrides SLUGHUB_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Session user (overrides SLUGHUB_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Class schedule management
    Class {
        #[command(subcommand)]
        action: commands::class::ClassAction,
    },
    /// Suggested start times for a day pattern
    Slots {
        /// Day letters, e.g. "M,W,F" or "T,Th"
        #[arg(long)]
        days: String,
    },
    /// Show the next upcoming class
    Next {
        /// Show every class on the next class day
        #[arg(long)]
        all: bool,
    },
    /// Route to an upcoming class
    Route {
        /// Travel mode: driving, walking, bicycling, transit
        #[arg(long)]
        mode: Option<String>,

        /// Step past this many occurrences first
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },
    /// Course forum channels
    Forum {
        #[command(subcommand)]
        action: commands::forum::ForumAction,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::CliResult {
    match cli.command {
        Commands::Slots { days } => commands::schedule::slots(&days),
        Commands::Class { action } => commands::class::run(action, &open_context(cli.db, cli.user)?),
        Commands::Next { all } => commands::schedule::next(&open_context(cli.db, cli.user)?, all),
        Commands::Route { mode, skip } => {
            let ctx = open_context(cli.db, cli.user)?;
            commands::schedule::route(&ctx, mode.as_deref(), skip)
        }
        Commands::Forum { action } => commands::forum::run(action, &open_context(cli.db, cli.user)?),
    }
}

/// Resolves config with flag overrides, starts logging, and opens the database.
fn open_context(
    db: Option<PathBuf>,
    user: Option<String>,
) -> Result<commands::Context, Box<dyn std::error::Error>> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = db {
        config.db_path = db;
    }
    if let Some(user) = user {
        config.default_user = Some(UserId::new(user)?);
    }
    init_logging_from_config(&config)?;

    let conn = open_db(&config.db_path)?;
    Ok(commands::Context { config, conn })
}
