//! Budget operations
//!
//! Budgets are the one entity with a uniqueness rule: at most one per
//! (user, category, month, year), enforced by a unique index. Reads that go
//! to the UI are always annotated with derived progress (spent / remaining /
//! percentage), computed per budget from that month's same-category expenses.

use rusqlite::{params, OptionalExtension, Row};

use super::{column_category, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    validate_amount, validate_month, Budget, BudgetPatch, BudgetProgress, Category, NewBudget,
};
use crate::progress;

fn map_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: column_category(row, 2)?,
        amount: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const BUDGET_COLUMNS: &str = "id, user_id, category, amount, month, year, created_at";

/// Map a unique-index violation on budget insert/update to a Duplicate error
///
/// Only SQLITE_CONSTRAINT_UNIQUE qualifies; other constraint failures
/// (foreign key, CHECK) stay Database errors.
fn slot_taken(err: rusqlite::Error, category: Category, month: u32, year: i32) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::Duplicate(format!(
                "budget for {} in {}-{:02}",
                category, year, month
            ))
        }
        _ => Error::Database(err),
    }
}

impl Database {
    /// Create a budget for a user
    ///
    /// Returns `Error::Duplicate` when the (category, month, year) slot is
    /// already occupied for this user.
    pub fn create_budget(&self, user_id: i64, new: &NewBudget) -> Result<Budget> {
        validate_amount(new.amount)?;
        validate_month(new.month)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, category, amount, month, year)
             VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                new.category.as_str(),
                new.amount,
                new.month,
                new.year,
            ],
        )
        .map_err(|e| slot_taken(e, new.category, new.month, new.year))?;

        self.get_budget(conn.last_insert_rowid(), user_id)
    }

    /// List a user's budgets for one month
    pub fn list_budgets(&self, user_id: i64, month: u32, year: i32) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE user_id = ? AND month = ? AND year = ? ORDER BY category",
            BUDGET_COLUMNS
        ))?;
        let budgets = stmt
            .query_map(params![user_id, month, year], map_budget)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(budgets)
    }

    /// Get a single budget owned by a user
    pub fn get_budget(&self, id: i64, user_id: i64) -> Result<Budget> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM budgets WHERE id = ? AND user_id = ?",
                BUDGET_COLUMNS
            ),
            params![id, user_id],
            map_budget,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// Apply a partial update to a budget
    ///
    /// Moving the budget into an occupied (category, month, year) slot
    /// surfaces as `Error::Duplicate` and leaves the row untouched.
    pub fn update_budget(&self, id: i64, user_id: i64, patch: &BudgetPatch) -> Result<Budget> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        if let Some(month) = patch.month {
            validate_month(month)?;
        }

        let current = self.get_budget(id, user_id)?;
        let amount = patch.amount.unwrap_or(current.amount);
        let category = patch.category.unwrap_or(current.category);
        let month = patch.month.unwrap_or(current.month);
        let year = patch.year.unwrap_or(current.year);

        let conn = self.conn()?;
        conn.execute(
            "UPDATE budgets SET amount = ?, category = ?, month = ?, year = ?
             WHERE id = ? AND user_id = ?",
            params![amount, category.as_str(), month, year, id, user_id],
        )
        .map_err(|e| slot_taken(e, category, month, year))?;

        self.get_budget(id, user_id)
    }

    /// Delete a budget owned by a user
    pub fn delete_budget(&self, id: i64, user_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        Ok(())
    }

    /// A user's budgets for one month, each annotated with progress
    ///
    /// Progress is computed independently per budget from that budget's
    /// same-category expenses inside its calendar month.
    pub fn budgets_with_progress(
        &self,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<BudgetProgress>> {
        let budgets = self.list_budgets(user_id, month, year)?;
        budgets
            .into_iter()
            .map(|b| self.annotate(b))
            .collect()
    }

    /// One budget annotated with progress
    pub fn get_budget_with_progress(&self, id: i64, user_id: i64) -> Result<BudgetProgress> {
        let budget = self.get_budget(id, user_id)?;
        self.annotate(budget)
    }

    fn annotate(&self, budget: Budget) -> Result<BudgetProgress> {
        let expenses =
            self.expenses_in_month(budget.user_id, budget.category, budget.month, budget.year)?;
        Ok(progress::compute(&budget, &expenses))
    }
}
