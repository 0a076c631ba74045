//! Income operations

use rusqlite::{params, OptionalExtension, Row};

use super::{column_date, column_frequency, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{validate_amount, Income, IncomePatch, NewIncome};

fn map_income(row: &Row<'_>) -> rusqlite::Result<Income> {
    Ok(Income {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        source: row.get(3)?,
        frequency: column_frequency(row, 4)?,
        is_recurring: row.get(5)?,
        date: column_date(row, 6)?,
        description: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

const INCOME_COLUMNS: &str =
    "id, user_id, amount, source, frequency, is_recurring, date, description, created_at";

impl Database {
    /// Create an income entry for a user
    pub fn create_income(&self, user_id: i64, new: &NewIncome) -> Result<Income> {
        validate_amount(new.amount)?;
        if new.source.trim().is_empty() {
            return Err(Error::Validation("income source must not be empty".into()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO income (user_id, amount, source, frequency, is_recurring, date, description)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                new.amount,
                new.source,
                new.frequency.as_str(),
                new.is_recurring,
                new.date.to_string(),
                new.description,
            ],
        )?;

        self.get_income(conn.last_insert_rowid(), user_id)
    }

    /// List all income entries for a user, most recent first
    pub fn list_income(&self, user_id: i64) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM income WHERE user_id = ? ORDER BY date DESC, id DESC",
            INCOME_COLUMNS
        ))?;
        let income = stmt
            .query_map(params![user_id], map_income)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(income)
    }

    /// Get a single income entry owned by a user
    pub fn get_income(&self, id: i64, user_id: i64) -> Result<Income> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM income WHERE id = ? AND user_id = ?",
                INCOME_COLUMNS
            ),
            params![id, user_id],
            map_income,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Income {}", id)))
    }

    /// Apply a partial update to an income entry
    pub fn update_income(&self, id: i64, user_id: i64, patch: &IncomePatch) -> Result<Income> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        let current = self.get_income(id, user_id)?;
        let amount = patch.amount.unwrap_or(current.amount);
        let source = patch.source.as_deref().unwrap_or(current.source.as_str());
        let frequency = patch.frequency.unwrap_or(current.frequency);
        let is_recurring = patch.is_recurring.unwrap_or(current.is_recurring);
        let date = patch.date.unwrap_or(current.date);
        let description = patch
            .description
            .as_deref()
            .unwrap_or(current.description.as_str());

        let conn = self.conn()?;
        conn.execute(
            "UPDATE income SET amount = ?, source = ?, frequency = ?, is_recurring = ?, date = ?, description = ?
             WHERE id = ? AND user_id = ?",
            params![
                amount,
                source,
                frequency.as_str(),
                is_recurring,
                date.to_string(),
                description,
                id,
                user_id,
            ],
        )?;

        self.get_income(id, user_id)
    }

    /// Delete an income entry owned by a user
    pub fn delete_income(&self, id: i64, user_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM income WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Income {}", id)));
        }
        Ok(())
    }
}
