//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tally_core::{Category, Frequency};

/// Tally - track expenses, income, and monthly budgets
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance tracker with guest mode and account sync", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// User profile the records belong to
    #[arg(long, default_value = "default", global = true)]
    pub user: String,

    /// Operate on the local guest ledger instead of a user profile
    ///
    /// Guest records live in a local slot directory and are migrated into
    /// a profile with `tally sync`.
    #[arg(long, global = true)]
    pub guest: bool,

    /// Override the guest slot directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub guest_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Manage income
    Income {
        #[command(subcommand)]
        action: IncomeAction,
    },

    /// Manage monthly budgets (listings include progress)
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Migrate guest records into a user profile, then clear the guest slot
    Sync,

    /// Show database and guest slot status
    Status,
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add {
        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Category (groceries, dining, housing, ...)
        #[arg(short, long)]
        category: Category,

        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List expenses, most recent first
    List,

    /// Edit an expense; only provided fields change
    Edit {
        /// Record id
        id: String,

        #[arg(short, long)]
        amount: Option<f64>,

        #[arg(short, long)]
        category: Option<Category>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete an expense
    Delete {
        /// Record id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// Record an income entry
    Add {
        /// Amount received
        #[arg(short, long)]
        amount: f64,

        /// Where the money came from
        #[arg(short, long)]
        source: String,

        /// one-time, weekly, bi-weekly, monthly, yearly
        #[arg(short, long, default_value = "monthly")]
        frequency: Frequency,

        /// Mark as recurring
        #[arg(long)]
        recurring: bool,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List income entries, most recent first
    List,

    /// Edit an income entry; only provided fields change
    Edit {
        /// Record id
        id: String,

        #[arg(short, long)]
        amount: Option<f64>,

        #[arg(short, long)]
        source: Option<String>,

        #[arg(short, long)]
        frequency: Option<Frequency>,

        /// Set the recurring flag
        #[arg(long)]
        recurring: Option<bool>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete an income entry
    Delete {
        /// Record id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Create a budget for a category and month
    Add {
        /// Category (groceries, dining, housing, ...)
        #[arg(short, long)]
        category: Category,

        /// Budgeted amount
        #[arg(short, long)]
        amount: f64,

        /// Month 1-12, defaults to the current month
        #[arg(short, long)]
        month: Option<u32>,

        /// Year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List budgets for a month with spent/remaining/percentage
    List {
        /// Month 1-12, defaults to the current month
        #[arg(short, long)]
        month: Option<u32>,

        /// Year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Edit a budget; only provided fields change
    Edit {
        /// Record id
        id: String,

        #[arg(short, long)]
        amount: Option<f64>,

        #[arg(short, long)]
        category: Option<Category>,

        #[arg(short, long)]
        month: Option<u32>,

        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Delete a budget
    Delete {
        /// Record id
        id: String,
    },
}
