//! Status command (database, profiles, guest slot)

use std::path::Path;

use anyhow::Result;

use super::{open_db, open_guest};

pub fn cmd_status(db_path: &Path, guest_dir: Option<&Path>) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Tally Status");
    println!("   ─────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        match open_db(db_path) {
            Ok(db) => {
                let users = db.list_users()?;
                println!("   Profiles: {}", users.len());
                for user in &users {
                    let expenses = db.list_expenses(user.id)?.len();
                    let income = db.list_income(user.id)?.len();
                    println!(
                        "     {}: {} expense(s), {} income entry(s)",
                        user.name, expenses, income
                    );
                }
            }
            Err(e) => {
                println!("   ❌ Error opening database: {}", e);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    println!();
    match open_guest(guest_dir) {
        Ok(guest) => {
            if guest.is_empty() {
                println!("   Guest ledger: empty");
            } else {
                println!(
                    "   Guest ledger: {} expense(s), {} income entry(s), {} budget(s)",
                    guest.expenses().len(),
                    guest.income().len(),
                    guest.budgets().len()
                );
                println!("   Run `tally sync` to migrate them into a profile.");
            }
        }
        Err(e) => {
            println!("   ❌ Error opening guest ledger: {}", e);
        }
    }

    println!();
    Ok(())
}
