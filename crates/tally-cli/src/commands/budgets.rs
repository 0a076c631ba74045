//! Budget commands with progress display

use anyhow::Result;
use chrono::{Datelike, Utc};
use tally_core::{BudgetPatch, Category, Ledger, NewBudget};

/// Fill in the current month/year for omitted arguments
fn resolve_month(month: Option<u32>, year: Option<i32>) -> (u32, i32) {
    let today = Utc::now().date_naive();
    (month.unwrap_or(today.month()), year.unwrap_or(today.year()))
}

/// A 20-cell progress bar for a 0-100 percentage
fn progress_bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * 20.0).round() as usize;
    let filled = filled.min(20);
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

pub fn cmd_budget_add(
    ledger: &mut dyn Ledger,
    category: Category,
    amount: f64,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let (month, year) = resolve_month(month, year);
    let created = ledger.add_budget(&NewBudget {
        category,
        amount,
        month,
        year,
    })?;
    println!(
        "✅ Budget set: {:.2} for {} in {}-{:02} (id {})",
        created.amount, created.category, created.year, created.month, created.id
    );
    Ok(())
}

pub fn cmd_budget_list(
    ledger: &dyn Ledger,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let (month, year) = resolve_month(month, year);
    let budgets = ledger.budgets_with_progress(month, year)?;
    if budgets.is_empty() {
        println!("No budgets for {}-{:02}.", year, month);
        return Ok(());
    }

    println!("Budgets for {}-{:02}", year, month);
    println!();
    println!(
        "{:<14} {:>10} {:>10} {:>10}  {:<20} {:>5}",
        "CATEGORY", "BUDGET", "SPENT", "REMAINING", "", "%"
    );
    for b in &budgets {
        let marker = if b.remaining < 0.0 { " ⚠️ over" } else { "" };
        println!(
            "{:<14} {:>10.2} {:>10.2} {:>10.2}  {:<20} {:>4.0}%{}",
            b.category.as_str(),
            b.amount,
            b.spent,
            b.remaining,
            progress_bar(b.percentage),
            b.percentage,
            marker
        );
    }
    Ok(())
}

pub fn cmd_budget_edit(ledger: &mut dyn Ledger, id: &str, patch: &BudgetPatch) -> Result<()> {
    ledger.update_budget(id, patch)?;
    println!("✅ Updated budget {}", id);
    Ok(())
}

pub fn cmd_budget_delete(ledger: &mut dyn Ledger, id: &str) -> Result<()> {
    ledger.delete_budget(id)?;
    println!("✅ Deleted budget {}", id);
    Ok(())
}
