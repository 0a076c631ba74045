//! Expense operations

use rusqlite::{params, OptionalExtension, Row};

use super::{column_category, column_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{validate_amount, Category, Expense, ExpensePatch, NewExpense};
use crate::progress::month_window;

fn map_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: column_category(row, 3)?,
        description: row.get(4)?,
        date: column_date(row, 5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, description, date, created_at";

impl Database {
    /// Create an expense for a user
    pub fn create_expense(&self, user_id: i64, new: &NewExpense) -> Result<Expense> {
        validate_amount(new.amount)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (user_id, amount, category, description, date)
             VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                new.amount,
                new.category.as_str(),
                new.description,
                new.date.to_string(),
            ],
        )?;

        self.get_expense(conn.last_insert_rowid(), user_id)
    }

    /// List all expenses for a user, most recent first
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;
        let expenses = stmt
            .query_map(params![user_id], map_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expenses)
    }

    /// Get a single expense owned by a user
    pub fn get_expense(&self, id: i64, user_id: i64) -> Result<Expense> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                EXPENSE_COLUMNS
            ),
            params![id, user_id],
            map_expense,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// Apply a partial update to an expense
    ///
    /// Only fields present in the patch overwrite; the update is
    /// all-or-nothing.
    pub fn update_expense(&self, id: i64, user_id: i64, patch: &ExpensePatch) -> Result<Expense> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        let current = self.get_expense(id, user_id)?;
        let amount = patch.amount.unwrap_or(current.amount);
        let category = patch.category.unwrap_or(current.category);
        let description = patch
            .description
            .as_deref()
            .unwrap_or(current.description.as_str());
        let date = patch.date.unwrap_or(current.date);

        let conn = self.conn()?;
        conn.execute(
            "UPDATE expenses SET amount = ?, category = ?, description = ?, date = ?
             WHERE id = ? AND user_id = ?",
            params![
                amount,
                category.as_str(),
                description,
                date.to_string(),
                id,
                user_id,
            ],
        )?;

        self.get_expense(id, user_id)
    }

    /// Delete an expense owned by a user
    pub fn delete_expense(&self, id: i64, user_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        Ok(())
    }

    /// Expenses for a user and category inside the inclusive calendar-month
    /// window of (month, year). This is the query budget progress runs on.
    pub fn expenses_in_month(
        &self,
        user_id: i64,
        category: Category,
        month: u32,
        year: i32,
    ) -> Result<Vec<Expense>> {
        let (first, last) = month_window(month, year);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses
             WHERE user_id = ? AND category = ? AND date >= ? AND date <= ?
             ORDER BY date",
            EXPENSE_COLUMNS
        ))?;
        let expenses = stmt
            .query_map(
                params![user_id, category.as_str(), first.to_string(), last.to_string()],
                map_expense,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expenses)
    }
}
