//! Expense commands (add, list, edit, delete)

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tally_core::{Category, ExpensePatch, Ledger, NewExpense};

use super::truncate;

pub fn cmd_expense_add(
    ledger: &mut dyn Ledger,
    amount: f64,
    category: Category,
    description: &str,
    date: Option<NaiveDate>,
) -> Result<()> {
    let new = NewExpense {
        amount,
        category,
        description: description.to_string(),
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
    };
    let created = ledger.add_expense(&new)?;
    println!(
        "✅ Recorded {:.2} for {} on {} (id {})",
        created.amount, created.category, created.date, created.id
    );
    Ok(())
}

pub fn cmd_expense_list(ledger: &dyn Ledger) -> Result<()> {
    let expenses = ledger.list_expenses()?;
    if expenses.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }

    println!(
        "{:<40} {:>10}  {:<14} {:<12} {}",
        "ID", "AMOUNT", "CATEGORY", "DATE", "DESCRIPTION"
    );
    for e in &expenses {
        println!(
            "{:<40} {:>10.2}  {:<14} {:<12} {}",
            truncate(&e.id, 40),
            e.amount,
            e.category.as_str(),
            e.date.to_string(),
            truncate(&e.description, 40)
        );
    }
    println!();
    println!("{} expense(s)", expenses.len());
    Ok(())
}

pub fn cmd_expense_edit(ledger: &mut dyn Ledger, id: &str, patch: &ExpensePatch) -> Result<()> {
    ledger.update_expense(id, patch)?;
    println!("✅ Updated expense {}", id);
    Ok(())
}

pub fn cmd_expense_delete(ledger: &mut dyn Ledger, id: &str) -> Result<()> {
    ledger.delete_expense(id)?;
    println!("✅ Deleted expense {}", id);
    Ok(())
}
