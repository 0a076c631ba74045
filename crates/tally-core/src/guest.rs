//! Guest ledger: local-only records for anonymous sessions
//!
//! Mirrors the three entity kinds (expenses, income, budgets) for a single
//! anonymous session. Records live in three independently-addressed JSON
//! array files under a slot directory, so they survive restarts but are
//! never shared. An absent or unparsable file degrades to an empty list
//! rather than failing the session.
//!
//! Guest records carry synthetic string ids (timestamp + random suffix)
//! because no backing store assigns them. Budget progress is maintained
//! reactively: every expense-list mutation recomputes progress for budgets
//! of the current calendar month only. Budgets outside the current month
//! keep whatever progress fields they had; guest dashboards only ever show
//! the current month.
//!
//! Unlike the store, the guest ledger does not enforce budget uniqueness
//! per (category, month, year). A colliding guest budget is rejected
//! server-side at sync time instead.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    validate_amount, validate_month, BudgetPatch, Category, ExpensePatch, Frequency, IncomePatch,
};
use crate::progress::{month_window, percentage};

const EXPENSES_FILE: &str = "expenses.json";
const INCOME_FILE: &str = "income.json";
const BUDGETS_FILE: &str = "budgets.json";

/// A guest-owned expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestExpense {
    pub id: String,
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

/// A guest-owned income entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestIncome {
    pub id: String,
    pub amount: f64,
    pub source: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub is_recurring: bool,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

/// A guest-owned budget with reactively maintained progress fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestBudget {
    pub id: String,
    pub category: Category,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub remaining: f64,
    #[serde(default)]
    pub percentage: f64,
}

/// Durable slot for guest data: a directory of JSON array files
struct SlotStore {
    dir: PathBuf,
}

impl SlotStore {
    fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            debug!("Created guest slot directory: {}", dir.display());
        }
        Ok(Self { dir })
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Load one bucket, defaulting to empty on absence or bad content
    fn load<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let path = self.file(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                warn!(
                    "Ignoring unreadable guest data in {}: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Rewrite one bucket in full
    fn save<T: Serialize>(&self, name: &str, list: &[T]) -> Result<()> {
        let json = serde_json::to_string(list)?;
        fs::write(self.file(name), json)?;
        Ok(())
    }

    /// Remove all three buckets
    fn clear(&self) -> Result<()> {
        for name in [EXPENSES_FILE, INCOME_FILE, BUDGETS_FILE] {
            match fs::remove_file(self.file(name)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// In-memory guest session state backed by the durable slot
pub struct GuestLedger {
    expenses: Vec<GuestExpense>,
    income: Vec<GuestIncome>,
    budgets: Vec<GuestBudget>,
    store: SlotStore,
}

impl GuestLedger {
    /// Open the guest ledger at an explicit slot directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let store = SlotStore::new(dir.as_ref())?;
        Ok(Self {
            expenses: store.load(EXPENSES_FILE),
            income: store.load(INCOME_FILE),
            budgets: store.load(BUDGETS_FILE),
            store,
        })
    }

    /// Open the guest ledger at the platform default location
    /// (e.g. ~/.local/share/tally/guest on Linux)
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::Validation("no platform data directory available".into()))?;
        Self::open(base.join("tally").join("guest"))
    }

    pub fn expenses(&self) -> &[GuestExpense] {
        &self.expenses
    }

    pub fn income(&self) -> &[GuestIncome] {
        &self.income
    }

    pub fn budgets(&self) -> &[GuestBudget] {
        &self.budgets
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.income.is_empty() && self.budgets.is_empty()
    }

    /// Synthetic id: unique within a session in practice, not guaranteed
    fn synthetic_id(kind: &str) -> String {
        format!(
            "guest-{}-{}-{}",
            kind,
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        )
    }

    // ----- expenses -----

    /// Add an expense; date defaults to today when omitted
    pub fn add_expense(
        &mut self,
        amount: f64,
        category: Category,
        description: &str,
        date: Option<NaiveDate>,
    ) -> Result<GuestExpense> {
        validate_amount(amount)?;

        let record = GuestExpense {
            id: Self::synthetic_id("expense"),
            amount,
            category,
            description: description.to_string(),
            date: date.unwrap_or_else(|| Utc::now().date_naive()),
        };
        self.expenses.push(record.clone());
        self.after_expense_change()?;
        Ok(record)
    }

    /// Merge a patch into the matching expense; silent no-op on unknown id
    pub fn update_expense(&mut self, id: &str, patch: &ExpensePatch) -> Result<()> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        let Some(record) = self.expenses.iter_mut().find(|e| e.id == id) else {
            return Ok(());
        };
        if let Some(amount) = patch.amount {
            record.amount = amount;
        }
        if let Some(category) = patch.category {
            record.category = category;
        }
        if let Some(ref description) = patch.description {
            record.description = description.clone();
        }
        if let Some(date) = patch.date {
            record.date = date;
        }
        self.after_expense_change()
    }

    /// Remove the matching expense; silent no-op on unknown id
    pub fn delete_expense(&mut self, id: &str) -> Result<()> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Ok(());
        }
        self.after_expense_change()
    }

    // ----- income -----

    /// Add an income entry; date defaults to today when omitted
    #[allow(clippy::too_many_arguments)]
    pub fn add_income(
        &mut self,
        amount: f64,
        source: &str,
        frequency: Frequency,
        is_recurring: bool,
        date: Option<NaiveDate>,
        description: &str,
    ) -> Result<GuestIncome> {
        validate_amount(amount)?;
        if source.trim().is_empty() {
            return Err(Error::Validation("income source must not be empty".into()));
        }

        let record = GuestIncome {
            id: Self::synthetic_id("income"),
            amount,
            source: source.to_string(),
            frequency,
            is_recurring,
            date: date.unwrap_or_else(|| Utc::now().date_naive()),
            description: description.to_string(),
        };
        self.income.push(record.clone());
        self.store.save(INCOME_FILE, &self.income)?;
        Ok(record)
    }

    /// Merge a patch into the matching income entry; silent no-op on unknown id
    pub fn update_income(&mut self, id: &str, patch: &IncomePatch) -> Result<()> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        let Some(record) = self.income.iter_mut().find(|i| i.id == id) else {
            return Ok(());
        };
        if let Some(amount) = patch.amount {
            record.amount = amount;
        }
        if let Some(ref source) = patch.source {
            record.source = source.clone();
        }
        if let Some(frequency) = patch.frequency {
            record.frequency = frequency;
        }
        if let Some(is_recurring) = patch.is_recurring {
            record.is_recurring = is_recurring;
        }
        if let Some(date) = patch.date {
            record.date = date;
        }
        if let Some(ref description) = patch.description {
            record.description = description.clone();
        }
        self.store.save(INCOME_FILE, &self.income)
    }

    /// Remove the matching income entry; silent no-op on unknown id
    pub fn delete_income(&mut self, id: &str) -> Result<()> {
        let before = self.income.len();
        self.income.retain(|i| i.id != id);
        if self.income.len() == before {
            return Ok(());
        }
        self.store.save(INCOME_FILE, &self.income)
    }

    // ----- budgets -----

    /// Add a budget with progress fields initialized to an untouched state
    ///
    /// No uniqueness check: a second budget for the same (category, month,
    /// year) is allowed here and will be rejected by the store at sync time.
    pub fn add_budget(
        &mut self,
        category: Category,
        amount: f64,
        month: u32,
        year: i32,
    ) -> Result<GuestBudget> {
        validate_amount(amount)?;
        validate_month(month)?;

        let record = GuestBudget {
            id: Self::synthetic_id("budget"),
            category,
            amount,
            month,
            year,
            spent: 0.0,
            remaining: amount,
            percentage: 0.0,
        };
        self.budgets.push(record.clone());
        self.store.save(BUDGETS_FILE, &self.budgets)?;
        Ok(record)
    }

    /// Merge a patch into the matching budget; silent no-op on unknown id
    ///
    /// Progress fields are left as-is; they refresh on the next expense
    /// mutation.
    pub fn update_budget(&mut self, id: &str, patch: &BudgetPatch) -> Result<()> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        if let Some(month) = patch.month {
            validate_month(month)?;
        }

        let Some(record) = self.budgets.iter_mut().find(|b| b.id == id) else {
            return Ok(());
        };
        if let Some(amount) = patch.amount {
            record.amount = amount;
        }
        if let Some(category) = patch.category {
            record.category = category;
        }
        if let Some(month) = patch.month {
            record.month = month;
        }
        if let Some(year) = patch.year {
            record.year = year;
        }
        self.store.save(BUDGETS_FILE, &self.budgets)
    }

    /// Remove the matching budget; silent no-op on unknown id
    pub fn delete_budget(&mut self, id: &str) -> Result<()> {
        let before = self.budgets.len();
        self.budgets.retain(|b| b.id != id);
        if self.budgets.len() == before {
            return Ok(());
        }
        self.store.save(BUDGETS_FILE, &self.budgets)
    }

    /// Empty all three lists and erase the durable slot
    pub fn clear_all(&mut self) -> Result<()> {
        self.expenses.clear();
        self.income.clear();
        self.budgets.clear();
        self.store.clear()
    }

    /// Recompute progress for budgets of one month from the session's
    /// same-category expenses. Budgets of other months are untouched.
    pub fn recompute_progress(&mut self, month: u32, year: i32) -> Result<()> {
        let (first, last) = month_window(month, year);
        for budget in self
            .budgets
            .iter_mut()
            .filter(|b| b.month == month && b.year == year)
        {
            let spent: f64 = self
                .expenses
                .iter()
                .filter(|e| e.category == budget.category && e.date >= first && e.date <= last)
                .map(|e| e.amount)
                .sum();
            budget.spent = spent;
            budget.remaining = budget.amount - spent;
            budget.percentage = percentage(budget.amount, spent);
        }
        self.store.save(BUDGETS_FILE, &self.budgets)
    }

    /// Persist the expense list and refresh current-month budget progress
    fn after_expense_change(&mut self) -> Result<()> {
        self.store.save(EXPENSES_FILE, &self.expenses)?;
        let today = Utc::now().date_naive();
        self.recompute_progress(today.month(), today.year())
    }
}
