//! Guest-to-profile migration command

use anyhow::Result;
use tally_core::{sync_guest_data, Database, GuestLedger};

/// Migrate every guest record into `user`'s profile, then clear the guest
/// slot. Individual failures are reported but never block the rest.
pub fn cmd_sync(db: &Database, user: &str, guest: &mut GuestLedger) -> Result<()> {
    if guest.is_empty() {
        println!("Guest ledger is empty; nothing to sync.");
        return Ok(());
    }

    let user_id = db.ensure_user(user)?;
    let summary = sync_guest_data(db, user_id, guest)?;

    println!(
        "✅ Synced {} of {} guest record(s) into profile '{}'",
        summary.migrated, summary.attempted, user
    );
    if !summary.failures.is_empty() {
        println!();
        println!("⚠️  {} record(s) could not be migrated:", summary.failed());
        for f in &summary.failures {
            println!("   {} {}: {}", f.kind, f.guest_id, f.reason);
        }
        println!("   The guest slot was cleared; these records were dropped.");
    }
    Ok(())
}
