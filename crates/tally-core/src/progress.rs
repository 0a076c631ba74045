//! Budget progress aggregation
//!
//! Pure functions that derive spent/remaining/percentage for a budget from a
//! set of expenses. No side effects; computed once per budget on every read
//! and never persisted. Both the SQLite-backed store and the guest ledger
//! route their progress calculations through here.

use chrono::NaiveDate;

use crate::models::{Budget, BudgetProgress, Expense};

/// Inclusive calendar-month window [first day, last day] for (month, year).
///
/// Out-of-range months are clamped; validation happens at the write
/// boundaries before budgets are stored.
pub fn month_window(month: u32, year: i32) -> (NaiveDate, NaiveDate) {
    let month = month.clamp(1, 12);
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default();
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(first);
    (first, last)
}

/// Sum the expenses that count against `budget`: same category, dated inside
/// the budget's calendar month.
pub fn spent_against(budget: &Budget, expenses: &[Expense]) -> f64 {
    let (first, last) = month_window(budget.month, budget.year);
    expenses
        .iter()
        .filter(|e| e.category == budget.category && e.date >= first && e.date <= last)
        .map(|e| e.amount)
        .sum()
}

/// Derive the percentage of a budget consumed, clamped at 100 on the upper
/// bound only.
///
/// A zero-amount budget has no well-defined ratio; any spending against it is
/// immediately over limit, so it reads 100 when spent > 0 and 0 otherwise.
pub fn percentage(amount: f64, spent: f64) -> f64 {
    if amount > 0.0 {
        (spent / amount * 100.0).min(100.0)
    } else if spent > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Compute progress for one budget from the expenses that may count against
/// it. Deterministic; recomputing on unchanged inputs yields identical
/// results.
///
/// Callers listing several budgets invoke this once per budget (batch mode),
/// never globally.
pub fn compute(budget: &Budget, expenses: &[Expense]) -> BudgetProgress {
    let spent = spent_against(budget, expenses);
    let remaining = budget.amount - spent;
    BudgetProgress {
        budget: budget.clone(),
        spent,
        remaining,
        percentage: percentage(budget.amount, spent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn budget(category: Category, amount: f64, month: u32, year: i32) -> Budget {
        Budget {
            id: 1,
            user_id: 1,
            category,
            amount,
            month,
            year,
            created_at: Utc::now(),
        }
    }

    fn expense(category: Category, amount: f64, date: &str) -> Expense {
        Expense {
            id: 0,
            user_id: 1,
            amount,
            category,
            description: String::new(),
            date: date.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_month_window_bounds() {
        let (first, last) = month_window(6, 2024);
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());

        // February in a leap year
        let (_, last) = month_window(2, 2024);
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        // December rolls the year
        let (first, last) = month_window(12, 2023);
        assert_eq!(first, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_empty_expense_set() {
        let b = budget(Category::Dining, 100.0, 6, 2024);
        let p = compute(&b, &[]);
        assert_eq!(p.spent, 0.0);
        assert_eq!(p.remaining, 100.0);
        assert_eq!(p.percentage, 0.0);
    }

    #[test]
    fn test_over_budget_scenario() {
        // Budget dining 100 for 2024-06; 40 + 70 dining inside the month,
        // 10 groceries ignored -> spent 110, remaining -10, pct clamped 100.
        let b = budget(Category::Dining, 100.0, 6, 2024);
        let expenses = vec![
            expense(Category::Dining, 40.0, "2024-06-05"),
            expense(Category::Dining, 70.0, "2024-06-20"),
            expense(Category::Groceries, 10.0, "2024-06-10"),
        ];
        let p = compute(&b, &expenses);
        assert_eq!(p.spent, 110.0);
        assert_eq!(p.remaining, -10.0);
        assert_eq!(p.percentage, 100.0);
    }

    #[test]
    fn test_partial_spend_not_clamped_below() {
        let b = budget(Category::Groceries, 200.0, 6, 2024);
        let expenses = vec![expense(Category::Groceries, 50.0, "2024-06-15")];
        let p = compute(&b, &expenses);
        assert_eq!(p.spent, 50.0);
        assert_eq!(p.remaining, 150.0);
        assert_eq!(p.percentage, 25.0);
    }

    #[test]
    fn test_window_excludes_other_months() {
        let b = budget(Category::Dining, 100.0, 6, 2024);
        let expenses = vec![
            expense(Category::Dining, 30.0, "2024-05-31"),
            expense(Category::Dining, 30.0, "2024-07-01"),
            expense(Category::Dining, 30.0, "2023-06-15"),
        ];
        let p = compute(&b, &expenses);
        assert_eq!(p.spent, 0.0);
    }

    #[test]
    fn test_window_includes_first_and_last_day() {
        let b = budget(Category::Dining, 100.0, 6, 2024);
        let expenses = vec![
            expense(Category::Dining, 10.0, "2024-06-01"),
            expense(Category::Dining, 20.0, "2024-06-30"),
        ];
        let p = compute(&b, &expenses);
        assert_eq!(p.spent, 30.0);
    }

    #[test]
    fn test_zero_amount_budget() {
        // Any spending against a zero budget is immediately over limit.
        let b = budget(Category::Dining, 0.0, 6, 2024);
        let expenses = vec![expense(Category::Dining, 5.0, "2024-06-05")];
        let p = compute(&b, &expenses);
        assert_eq!(p.percentage, 100.0);
        assert_eq!(p.remaining, -5.0);

        // ... but an untouched zero budget reads 0%.
        let p = compute(&b, &[]);
        assert_eq!(p.percentage, 0.0);
    }

    #[test]
    fn test_idempotent() {
        let b = budget(Category::Dining, 100.0, 6, 2024);
        let expenses = vec![expense(Category::Dining, 40.0, "2024-06-05")];
        let first = compute(&b, &expenses);
        let second = compute(&b, &expenses);
        assert_eq!(first.spent, second.spent);
        assert_eq!(first.remaining, second.remaining);
        assert_eq!(first.percentage, second.percentage);
    }
}
