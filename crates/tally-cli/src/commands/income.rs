//! Income commands (add, list, edit, delete)

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tally_core::{Frequency, IncomePatch, Ledger, NewIncome};

use super::truncate;

#[allow(clippy::too_many_arguments)]
pub fn cmd_income_add(
    ledger: &mut dyn Ledger,
    amount: f64,
    source: &str,
    frequency: Frequency,
    is_recurring: bool,
    date: Option<NaiveDate>,
    description: &str,
) -> Result<()> {
    let new = NewIncome {
        amount,
        source: source.to_string(),
        frequency,
        is_recurring,
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        description: description.to_string(),
    };
    let created = ledger.add_income(&new)?;
    println!(
        "✅ Recorded {:.2} from {} ({}) on {} (id {})",
        created.amount, created.source, created.frequency, created.date, created.id
    );
    Ok(())
}

pub fn cmd_income_list(ledger: &dyn Ledger) -> Result<()> {
    let income = ledger.list_income()?;
    if income.is_empty() {
        println!("No income recorded.");
        return Ok(());
    }

    println!(
        "{:<40} {:>10}  {:<20} {:<10} {:<9} {:<12}",
        "ID", "AMOUNT", "SOURCE", "FREQUENCY", "RECURRING", "DATE"
    );
    for i in &income {
        println!(
            "{:<40} {:>10.2}  {:<20} {:<10} {:<9} {:<12}",
            truncate(&i.id, 40),
            i.amount,
            truncate(&i.source, 20),
            i.frequency.as_str(),
            if i.is_recurring { "yes" } else { "no" },
            i.date.to_string(),
        );
    }
    println!();
    println!("{} income entry(s)", income.len());
    Ok(())
}

pub fn cmd_income_edit(ledger: &mut dyn Ledger, id: &str, patch: &IncomePatch) -> Result<()> {
    ledger.update_income(id, patch)?;
    println!("✅ Updated income {}", id);
    Ok(())
}

pub fn cmd_income_delete(ledger: &mut dyn Ledger, id: &str) -> Result<()> {
    ledger.delete_income(id)?;
    println!("✅ Deleted income {}", id);
    Ok(())
}
