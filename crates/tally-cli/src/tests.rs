//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::{Datelike, Utc};
use tally_core::{Category, Database, ExpensePatch, Frequency, GuestLedger, Ledger, UserLedger};

use crate::commands::{self, truncate};

fn setup_user_ledger() -> UserLedger {
    let db = Database::in_memory().unwrap();
    let user_id = db.ensure_user("tester").unwrap();
    UserLedger::new(db, user_id)
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly-10", 10), "exactly-10");
    assert_eq!(truncate("much longer string", 10), "much lo...");
}

#[test]
fn test_truncate_multibyte() {
    // Must cut on a char boundary, not a byte offset
    assert_eq!(truncate("日本語の長い説明テキストです", 10), "日本語の長い説...");
    assert_eq!(truncate("日本語", 10), "日本語");
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expense_add_and_list() {
    let mut ledger = setup_user_ledger();
    commands::cmd_expense_add(&mut ledger, 12.5, Category::Dining, "lunch", None).unwrap();

    let expenses = ledger.list_expenses().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, 12.5);
    // Date defaulted to today
    assert_eq!(expenses[0].date, Utc::now().date_naive());

    let result = commands::cmd_expense_list(&ledger);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_expense_edit() {
    let mut ledger = setup_user_ledger();
    commands::cmd_expense_add(
        &mut ledger,
        12.5,
        Category::Dining,
        "lunch",
        Some("2024-06-05".parse().unwrap()),
    )
    .unwrap();
    let id = ledger.list_expenses().unwrap()[0].id.clone();

    let patch = ExpensePatch {
        amount: Some(20.0),
        ..Default::default()
    };
    commands::cmd_expense_edit(&mut ledger, &id, &patch).unwrap();

    let expenses = ledger.list_expenses().unwrap();
    assert_eq!(expenses[0].amount, 20.0);
    assert_eq!(expenses[0].description, "lunch");
}

#[test]
fn test_cmd_expense_delete_missing_id_errors() {
    let mut ledger = setup_user_ledger();
    let result = commands::cmd_expense_delete(&mut ledger, "9999");
    assert!(result.is_err());
}

// ========== Income Command Tests ==========

#[test]
fn test_cmd_income_add() {
    let mut ledger = setup_user_ledger();
    commands::cmd_income_add(
        &mut ledger,
        2500.0,
        "paycheck",
        Frequency::BiWeekly,
        true,
        None,
        "",
    )
    .unwrap();

    let income = ledger.list_income().unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].source, "paycheck");
    assert!(income[0].is_recurring);
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budget_add_defaults_to_current_month() {
    let mut ledger = setup_user_ledger();
    commands::cmd_budget_add(&mut ledger, Category::Groceries, 300.0, None, None).unwrap();

    let today = Utc::now().date_naive();
    let budgets = ledger
        .budgets_with_progress(today.month(), today.year())
        .unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, 300.0);
    assert_eq!(budgets[0].spent, 0.0);
}

#[test]
fn test_cmd_budget_add_duplicate_slot_errors() {
    let mut ledger = setup_user_ledger();
    commands::cmd_budget_add(&mut ledger, Category::Dining, 100.0, Some(6), Some(2024)).unwrap();
    let result =
        commands::cmd_budget_add(&mut ledger, Category::Dining, 150.0, Some(6), Some(2024));
    assert!(result.is_err());
}

#[test]
fn test_cmd_budget_list_shows_progress() {
    let mut ledger = setup_user_ledger();
    commands::cmd_budget_add(&mut ledger, Category::Dining, 100.0, Some(6), Some(2024)).unwrap();
    commands::cmd_expense_add(
        &mut ledger,
        40.0,
        Category::Dining,
        "",
        Some("2024-06-05".parse().unwrap()),
    )
    .unwrap();

    let result = commands::cmd_budget_list(&ledger, Some(6), Some(2024));
    assert!(result.is_ok());

    let budgets = ledger.budgets_with_progress(6, 2024).unwrap();
    assert_eq!(budgets[0].spent, 40.0);
    assert_eq!(budgets[0].percentage, 40.0);
}

// ========== Guest Mode Tests ==========

#[test]
fn test_open_ledger_selects_guest_mode() {
    let guest_dir = tempfile::tempdir().unwrap();
    let db_file = tempfile::NamedTempFile::new().unwrap();

    let mut ledger = commands::open_ledger(
        db_file.path(),
        "tester",
        true,
        Some(guest_dir.path()),
    )
    .unwrap();
    commands::cmd_expense_add(ledger.as_mut(), 5.0, Category::Groceries, "", None).unwrap();

    // The record landed in the guest slot, not the database
    let guest = GuestLedger::open(guest_dir.path()).unwrap();
    assert_eq!(guest.expenses().len(), 1);
}

#[test]
fn test_guest_commands_share_the_ledger_surface() {
    let guest_dir = tempfile::tempdir().unwrap();
    let mut guest = GuestLedger::open(guest_dir.path()).unwrap();

    let today = Utc::now().date_naive();
    commands::cmd_budget_add(&mut guest, Category::Dining, 100.0, None, None).unwrap();
    commands::cmd_expense_add(&mut guest, 25.0, Category::Dining, "", Some(today)).unwrap();

    let budgets =
        Ledger::budgets_with_progress(&guest, today.month(), today.year()).unwrap();
    assert_eq!(budgets[0].spent, 25.0);
    assert_eq!(budgets[0].remaining, 75.0);
}

// ========== Sync Command Tests ==========

#[test]
fn test_cmd_sync_migrates_and_clears() {
    let db = Database::in_memory().unwrap();
    let guest_dir = tempfile::tempdir().unwrap();
    let mut guest = GuestLedger::open(guest_dir.path()).unwrap();
    guest
        .add_expense(10.0, Category::Groceries, "milk", None)
        .unwrap();
    guest
        .add_budget(Category::Groceries, 100.0, 6, 2024)
        .unwrap();

    commands::cmd_sync(&db, "tester", &mut guest).unwrap();
    assert!(guest.is_empty());

    let user_id = db.ensure_user("tester").unwrap();
    assert_eq!(db.list_expenses(user_id).unwrap().len(), 1);
    assert_eq!(db.list_budgets(user_id, 6, 2024).unwrap().len(), 1);
}

#[test]
fn test_cmd_sync_empty_guest_is_noop() {
    let db = Database::in_memory().unwrap();
    let guest_dir = tempfile::tempdir().unwrap();
    let mut guest = GuestLedger::open(guest_dir.path()).unwrap();

    commands::cmd_sync(&db, "tester", &mut guest).unwrap();
    // No profile was created for a no-op sync
    assert!(db.list_users().unwrap().is_empty());
}

// ========== Status Command Tests ==========

#[test]
fn test_cmd_status_runs() {
    let db = Database::in_memory().unwrap();
    let user_id = db.ensure_user("tester").unwrap();
    db.create_expense(
        user_id,
        &tally_core::NewExpense {
            amount: 1.0,
            category: Category::Other,
            description: String::new(),
            date: "2024-06-01".parse().unwrap(),
        },
    )
    .unwrap();

    let guest_dir = tempfile::tempdir().unwrap();
    let db_path = std::path::PathBuf::from(db.path());
    let result = commands::cmd_status(&db_path, Some(guest_dir.path()));
    assert!(result.is_ok());
}
