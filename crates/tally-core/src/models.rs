//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Expense categories (fixed set, shared with budgets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Groceries,
    Utilities,
    Gym,
    Entertainment,
    Dining,
    Transportation,
    Clothing,
    Healthcare,
    Education,
    Housing,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Utilities => "utilities",
            Self::Gym => "gym",
            Self::Entertainment => "entertainment",
            Self::Dining => "dining",
            Self::Transportation => "transportation",
            Self::Clothing => "clothing",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Housing => "housing",
            Self::Other => "other",
        }
    }

    /// All categories, in display order
    pub fn all() -> &'static [Category] {
        &[
            Self::Groceries,
            Self::Utilities,
            Self::Gym,
            Self::Entertainment,
            Self::Dining,
            Self::Transportation,
            Self::Clothing,
            Self::Healthcare,
            Self::Education,
            Self::Housing,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groceries" => Ok(Self::Groceries),
            "utilities" => Ok(Self::Utilities),
            "gym" => Ok(Self::Gym),
            "entertainment" => Ok(Self::Entertainment),
            "dining" => Ok(Self::Dining),
            "transportation" => Ok(Self::Transportation),
            "clothing" => Ok(Self::Clothing),
            "healthcare" => Ok(Self::Healthcare),
            "education" => Ok(Self::Education),
            "housing" => Ok(Self::Housing),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Weekly,
    BiWeekly,
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one-time" | "onetime" | "once" => Ok(Self::OneTime),
            "weekly" => Ok(Self::Weekly),
            "bi-weekly" | "biweekly" => Ok(Self::BiWeekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user profile owning records in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

/// Partial update for an expense; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// A recorded income entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub source: String,
    pub frequency: Frequency,
    pub is_recurring: bool,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an income entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncome {
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

/// Partial update for an income entry
#[derive(Debug, Clone, Default)]
pub struct IncomePatch {
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub frequency: Option<Frequency>,
    pub is_recurring: Option<bool>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// A per-category monthly budget
///
/// At most one budget exists per (user, category, month, year); the store
/// enforces this with a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    pub amount: f64,
    /// Calendar month, 1-12
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: Category,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
}

/// Partial update for a budget
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// A budget annotated with derived progress fields
///
/// Recomputed on every read, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetProgress {
    #[serde(flatten)]
    pub budget: Budget,
    /// Sum of same-category expenses inside the budget's calendar month
    pub spent: f64,
    /// amount - spent; negative when over budget
    pub remaining: f64,
    /// spent / amount * 100, clamped at 100 on the upper bound
    pub percentage: f64,
}

/// Validate an amount field: must be finite and non-negative
pub(crate) fn validate_amount(amount: f64) -> crate::error::Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(crate::error::Error::Validation(format!(
            "amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

/// Validate a budget month: must be 1-12
pub(crate) fn validate_month(month: u32) -> crate::error::Result<()> {
    if !(1..=12).contains(&month) {
        return Err(crate::error::Error::Validation(format!(
            "month must be between 1 and 12, got {}",
            month
        )));
    }
    Ok(())
}
