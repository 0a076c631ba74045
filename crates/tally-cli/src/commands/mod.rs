//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init command and shared utilities (open_db, open_ledger)
//! - `expenses` - Expense commands (add, list, edit, delete)
//! - `income` - Income commands (add, list, edit, delete)
//! - `budgets` - Budget commands with progress display
//! - `sync` - Guest-to-profile migration command
//! - `status` - Database and guest slot status

pub mod budgets;
pub mod core;
pub mod expenses;
pub mod income;
pub mod status;
pub mod sync;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use income::*;
pub use status::*;
pub use sync::*;

/// Truncate a string to a maximum length, adding "..." if truncated
///
/// Counts chars rather than bytes so multi-byte descriptions never split
/// mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let keep: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", keep)
    }
}
