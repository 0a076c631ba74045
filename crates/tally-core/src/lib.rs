//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance tracker:
//! - SQLite ledger store with per-user expenses, income, and budgets
//! - Budget progress aggregation (spent / remaining / percentage)
//! - Guest ledger: local-only records for anonymous sessions
//! - Sync reconciler: one-shot guest-to-account migration
//! - A single ledger contract over both session modes

pub mod db;
pub mod error;
pub mod guest;
pub mod ledger;
pub mod models;
pub mod progress;
pub mod sync;

pub use db::Database;
pub use error::{Error, Result};
pub use guest::{GuestBudget, GuestExpense, GuestIncome, GuestLedger};
pub use ledger::{BudgetView, ExpenseView, IncomeView, Ledger, UserLedger};
pub use models::{
    Budget, BudgetPatch, BudgetProgress, Category, Expense, ExpensePatch, Frequency, Income,
    IncomePatch, NewBudget, NewExpense, NewIncome, User,
};
pub use sync::{sync_guest_data, RecordKind, SyncFailure, SyncSummary};
