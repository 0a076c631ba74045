//! Tally CLI - Personal finance tracker
//!
//! Usage:
//!   tally init                        Initialize database
//!   tally expense add -a 12.50 -c dining
//!   tally budget list                 Current month budgets with progress
//!   tally --guest expense add ...     Record against the local guest ledger
//!   tally sync                        Migrate guest records into a profile

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tally_core::{BudgetPatch, ExpensePatch, IncomePatch};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let guest_dir = cli.guest_dir.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Expense { action } => {
            let mut ledger = commands::open_ledger(&cli.db, &cli.user, cli.guest, guest_dir)?;
            match action {
                ExpenseAction::Add {
                    amount,
                    category,
                    description,
                    date,
                } => commands::cmd_expense_add(
                    ledger.as_mut(),
                    amount,
                    category,
                    &description,
                    date,
                ),
                ExpenseAction::List => commands::cmd_expense_list(ledger.as_ref()),
                ExpenseAction::Edit {
                    id,
                    amount,
                    category,
                    description,
                    date,
                } => {
                    let patch = ExpensePatch {
                        amount,
                        category,
                        description,
                        date,
                    };
                    commands::cmd_expense_edit(ledger.as_mut(), &id, &patch)
                }
                ExpenseAction::Delete { id } => {
                    commands::cmd_expense_delete(ledger.as_mut(), &id)
                }
            }
        }
        Commands::Income { action } => {
            let mut ledger = commands::open_ledger(&cli.db, &cli.user, cli.guest, guest_dir)?;
            match action {
                IncomeAction::Add {
                    amount,
                    source,
                    frequency,
                    recurring,
                    date,
                    description,
                } => commands::cmd_income_add(
                    ledger.as_mut(),
                    amount,
                    &source,
                    frequency,
                    recurring,
                    date,
                    &description,
                ),
                IncomeAction::List => commands::cmd_income_list(ledger.as_ref()),
                IncomeAction::Edit {
                    id,
                    amount,
                    source,
                    frequency,
                    recurring,
                    date,
                    description,
                } => {
                    let patch = IncomePatch {
                        amount,
                        source,
                        frequency,
                        is_recurring: recurring,
                        date,
                        description,
                    };
                    commands::cmd_income_edit(ledger.as_mut(), &id, &patch)
                }
                IncomeAction::Delete { id } => commands::cmd_income_delete(ledger.as_mut(), &id),
            }
        }
        Commands::Budget { action } => {
            let mut ledger = commands::open_ledger(&cli.db, &cli.user, cli.guest, guest_dir)?;
            match action {
                BudgetAction::Add {
                    category,
                    amount,
                    month,
                    year,
                } => commands::cmd_budget_add(ledger.as_mut(), category, amount, month, year),
                BudgetAction::List { month, year } => {
                    commands::cmd_budget_list(ledger.as_ref(), month, year)
                }
                BudgetAction::Edit {
                    id,
                    amount,
                    category,
                    month,
                    year,
                } => {
                    let patch = BudgetPatch {
                        amount,
                        category,
                        month,
                        year,
                    };
                    commands::cmd_budget_edit(ledger.as_mut(), &id, &patch)
                }
                BudgetAction::Delete { id } => commands::cmd_budget_delete(ledger.as_mut(), &id),
            }
        }
        Commands::Sync => {
            let db = commands::open_db(&cli.db)?;
            let mut guest = commands::open_guest(guest_dir)?;
            commands::cmd_sync(&db, &cli.user, &mut guest)
        }
        Commands::Status => commands::cmd_status(&cli.db, guest_dir),
    }
}
