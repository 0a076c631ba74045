//! Core commands (init) and shared utilities

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{Database, GuestLedger, Ledger, UserLedger};
use tracing::debug;

/// Open the database, creating it and running migrations if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    Database::new(&db_path.display().to_string())
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

/// Open the guest ledger, at an explicit slot directory or the default one
pub fn open_guest(guest_dir: Option<&Path>) -> Result<GuestLedger> {
    let ledger = match guest_dir {
        Some(dir) => GuestLedger::open(dir),
        None => GuestLedger::open_default(),
    };
    ledger.context("Failed to open guest ledger")
}

/// Select the ledger implementation for this invocation: the local guest
/// slot, or the store scoped to a user profile.
pub fn open_ledger(
    db_path: &Path,
    user: &str,
    guest: bool,
    guest_dir: Option<&Path>,
) -> Result<Box<dyn Ledger>> {
    if guest {
        debug!("Using guest ledger");
        Ok(Box::new(open_guest(guest_dir)?))
    } else {
        debug!("Using store ledger for profile '{}'", user);
        let db = open_db(db_path)?;
        let user_id = db.ensure_user(user)?;
        Ok(Box::new(UserLedger::new(db, user_id)))
    }
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    println!("✅ Database initialized at {}", db.path());
    Ok(())
}
