//! Subcommand handlers.

use rusqlite::Connection;
use slughub_core::{CoreConfig, Session};
use std::error::Error;

pub mod class;
pub mod forum;
pub mod schedule;

pub type CliResult = Result<(), Box<dyn Error>>;

/// Resolved config plus an open, migrated database.
pub struct Context {
    pub config: CoreConfig,
    pub conn: Connection,
}

impl Context {
    /// Session for the configured user.
    pub fn session(&self) -> Result<Session, Box<dyn Error>> {
        let user = self
            .config
            .default_user
            .clone()
            .ok_or("no session user; pass --user or set SLUGHUB_USER")?;
        Ok(Session::new(user))
    }
}
