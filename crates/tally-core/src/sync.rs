//! Guest-to-account synchronization
//!
//! One-shot migration of every guest ledger record into the store, run
//! immediately after a successful sign-in. Each record is migrated
//! independently with best-effort semantics: a failed create is logged and
//! recorded in the summary, aborts nothing, and rolls back nothing. Once
//! every record has been attempted the guest slot is cleared
//! unconditionally, so a partial-failure sync drops the unmigrated records
//! (guest data is advisory by design).
//!
//! Only domain fields travel; guest-synthesized ids have no meaning in the
//! store and are never sent.

use tracing::{info, warn};

use crate::db::Database;
use crate::error::Result;
use crate::guest::GuestLedger;
use crate::models::{NewBudget, NewExpense, NewIncome};

/// Which entity kind a migration attempt belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Expense,
    Income,
    Budget,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Budget => "budget",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One absorbed migration failure
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub kind: RecordKind,
    /// The guest-side id of the record that could not be migrated
    pub guest_id: String,
    pub reason: String,
}

/// Outcome of a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Records attempted across all three kinds
    pub attempted: usize,
    /// Records successfully created in the store
    pub migrated: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    fn record<T>(&mut self, kind: RecordKind, guest_id: &str, outcome: Result<T>) {
        self.attempted += 1;
        match outcome {
            Ok(_) => self.migrated += 1,
            Err(e) => {
                warn!("Failed to sync guest {} {}: {}", kind, guest_id, e);
                self.failures.push(SyncFailure {
                    kind,
                    guest_id: guest_id.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Migrate every guest record into the store for `user_id`, then clear the
/// guest ledger.
///
/// Expenses migrate first, then income, then budgets, each in list order.
/// The clear runs only after every record has been attempted, regardless of
/// individual outcomes; a budget landing on an occupied server-side slot is
/// reported as one more individual failure.
pub fn sync_guest_data(
    db: &Database,
    user_id: i64,
    guest: &mut GuestLedger,
) -> Result<SyncSummary> {
    let mut summary = SyncSummary::default();

    for expense in guest.expenses() {
        let new = NewExpense {
            amount: expense.amount,
            category: expense.category,
            description: expense.description.clone(),
            date: expense.date,
        };
        summary.record(
            RecordKind::Expense,
            &expense.id,
            db.create_expense(user_id, &new),
        );
    }

    for income in guest.income() {
        let new = NewIncome {
            amount: income.amount,
            source: income.source.clone(),
            frequency: income.frequency,
            is_recurring: income.is_recurring,
            date: income.date,
            description: income.description.clone(),
        };
        summary.record(
            RecordKind::Income,
            &income.id,
            db.create_income(user_id, &new),
        );
    }

    for budget in guest.budgets() {
        let new = NewBudget {
            category: budget.category,
            amount: budget.amount,
            month: budget.month,
            year: budget.year,
        };
        summary.record(
            RecordKind::Budget,
            &budget.id,
            db.create_budget(user_id, &new),
        );
    }

    // All attempts have resolved; the clear is the join point.
    guest.clear_all()?;

    info!(
        "Guest sync: {} migrated, {} failed of {} attempted",
        summary.migrated,
        summary.failed(),
        summary.attempted
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Frequency, NewBudget};
    use tempfile::tempdir;

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user_id = db.ensure_user("tester").unwrap();
        (db, user_id)
    }

    #[test]
    fn test_empty_guest_ledger_is_a_noop() {
        let (db, user_id) = setup();
        let dir = tempdir().unwrap();
        let mut guest = GuestLedger::open(dir.path()).unwrap();

        let summary = sync_guest_data(&db, user_id, &mut guest).unwrap();
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.migrated, 0);
        assert!(summary.failures.is_empty());
        assert!(guest.is_empty());
    }

    #[test]
    fn test_full_migration_and_clear() {
        let (db, user_id) = setup();
        let dir = tempdir().unwrap();
        let mut guest = GuestLedger::open(dir.path()).unwrap();

        guest
            .add_expense(40.0, Category::Dining, "dinner", Some("2024-06-05".parse().unwrap()))
            .unwrap();
        guest
            .add_expense(10.0, Category::Groceries, "", Some("2024-06-10".parse().unwrap()))
            .unwrap();
        guest
            .add_income(1000.0, "paycheck", Frequency::BiWeekly, true, None, "")
            .unwrap();
        guest
            .add_budget(Category::Dining, 100.0, 6, 2024)
            .unwrap();

        let summary = sync_guest_data(&db, user_id, &mut guest).unwrap();
        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.migrated, 4);
        assert!(summary.failures.is_empty());
        assert!(guest.is_empty());

        let expenses = db.list_expenses(user_id).unwrap();
        assert_eq!(expenses.len(), 2);
        // Domain fields survive; ids are store-assigned, not guest strings.
        let dinner = expenses.iter().find(|e| e.description == "dinner").unwrap();
        assert_eq!(dinner.amount, 40.0);
        assert_eq!(dinner.category, Category::Dining);
        assert!(dinner.id > 0);

        let income = db.list_income(user_id).unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].source, "paycheck");
        assert_eq!(income[0].frequency, Frequency::BiWeekly);
        assert!(income[0].is_recurring);

        let budgets = db.budgets_with_progress(user_id, 6, 2024).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].spent, 40.0);
    }

    #[test]
    fn test_partial_failure_still_clears() {
        let (db, user_id) = setup();

        // Occupy the dining slot server-side, as a previous partial sync
        // would have.
        db.create_budget(
            user_id,
            &NewBudget {
                category: Category::Dining,
                amount: 50.0,
                month: 6,
                year: 2024,
            },
        )
        .unwrap();

        let dir = tempdir().unwrap();
        let mut guest = GuestLedger::open(dir.path()).unwrap();
        guest
            .add_expense(5.0, Category::Dining, "", Some("2024-06-01".parse().unwrap()))
            .unwrap();
        let colliding = guest
            .add_budget(Category::Dining, 100.0, 6, 2024)
            .unwrap();
        guest
            .add_budget(Category::Groceries, 80.0, 6, 2024)
            .unwrap();

        let summary = sync_guest_data(&db, user_id, &mut guest).unwrap();
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.migrated, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures[0].kind, RecordKind::Budget);
        assert_eq!(summary.failures[0].guest_id, colliding.id);

        // The failure did not block later records or the clear.
        assert!(guest.is_empty());
        let budgets = db.list_budgets(user_id, 6, 2024).unwrap();
        assert_eq!(budgets.len(), 2);
        let dining = budgets
            .iter()
            .find(|b| b.category == Category::Dining)
            .unwrap();
        // The occupied slot kept its server-side amount.
        assert_eq!(dining.amount, 50.0);
    }

    #[test]
    fn test_guest_duplicate_slots_become_individual_failures() {
        let (db, user_id) = setup();
        let dir = tempdir().unwrap();
        let mut guest = GuestLedger::open(dir.path()).unwrap();

        // The guest ledger allows both; the store accepts only the first.
        guest
            .add_budget(Category::Dining, 100.0, 6, 2024)
            .unwrap();
        guest
            .add_budget(Category::Dining, 200.0, 6, 2024)
            .unwrap();

        let summary = sync_guest_data(&db, user_id, &mut guest).unwrap();
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.failed(), 1);
        assert!(summary.failures[0].reason.contains("Already exists"));
        assert!(guest.is_empty());
    }
}
