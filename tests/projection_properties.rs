mod common;

use std::{collections::BTreeMap, sync::Arc};

use common::{date, household};
use flowcast::{
    domain::{occurrence_id, DateWindow, Frequency, MonthKey, RecurrenceRule, Transaction},
    projection::{
        occurrence::MAX_HORIZON_YEARS, expand, Diagnostic, MonthWindow, ProjectionInput,
        ProjectionService,
    },
};
use rust_decimal::Decimal;

fn end_of_day_balances(
    transactions: &[Transaction],
    rules: &[RecurrenceRule],
    window: DateWindow,
) -> BTreeMap<chrono::NaiveDate, Decimal> {
    let input = ProjectionInput {
        transactions,
        rules,
        opening_balance: Decimal::from(500),
    };
    ProjectionService::timeline(input, window, &mut Vec::new())
        .into_iter()
        .map(|entry| (entry.date(), entry.balance))
        .collect()
}

#[test]
fn balances_do_not_depend_on_input_order() {
    let mut snapshot = household();
    snapshot.transactions.extend([
        Transaction::expense(date(2025, 9, 15), "Dentist", Decimal::new(8550, 2)),
        Transaction::income(date(2025, 9, 15), "Refund", Decimal::new(1999, 2)),
        Transaction::expense(date(2025, 10, 3), "Gift", Decimal::from(60)),
    ]);
    let window = DateWindow::new(date(2025, 9, 1), date(2025, 11, 30)).unwrap();
    let expected = end_of_day_balances(&snapshot.transactions, &snapshot.rules, window);

    let mut transactions = snapshot.transactions.clone();
    let mut rules = snapshot.rules.clone();
    for _ in 0..transactions.len() {
        transactions.rotate_left(1);
        rules.reverse();
        assert_eq!(
            end_of_day_balances(&transactions, &rules, window),
            expected
        );
    }
}

#[test]
fn monthly_rule_on_the_31st_never_sticks_to_the_clamp() {
    let rule = RecurrenceRule::new(
        date(2025, 1, 31),
        Frequency::Monthly,
        "Card payment",
        Decimal::from(75),
        Default::default(),
    );
    let window = DateWindow::new(date(2025, 1, 1), date(2025, 5, 31)).unwrap();
    let dates: Vec<_> = expand(&rule, window, &mut Vec::new())
        .into_iter()
        .map(|o| o.date)
        .collect();
    assert_eq!(
        dates,
        vec![
            date(2025, 2, 28),
            date(2025, 3, 31),
            date(2025, 4, 30),
            date(2025, 5, 31)
        ]
    );
}

#[test]
fn expansion_is_idempotent() {
    let snapshot = household();
    let window = DateWindow::new(date(2025, 9, 1), date(2026, 8, 31)).unwrap();
    for rule in &snapshot.rules {
        let first = expand(rule, window, &mut Vec::new());
        let second = expand(rule, window, &mut Vec::new());
        assert_eq!(first, second);
    }
}

#[test]
fn materialized_occurrence_replaces_the_generated_one() {
    let snapshot = household();
    let rent = &snapshot.rules[0];
    let october = date(2025, 10, 1);
    let paid = Transaction::expense(october, "Rent (paid early)", Decimal::from(1150))
        .with_id(occurrence_id(rent.id, october));
    let mut transactions = snapshot.transactions.clone();
    transactions.push(paid);

    let input = ProjectionInput {
        transactions: &transactions,
        rules: &snapshot.rules,
        opening_balance: Decimal::ZERO,
    };
    let window = DateWindow::new(date(2025, 9, 1), date(2025, 10, 31)).unwrap();
    let mut sink = Vec::new();
    let timeline = ProjectionService::timeline(input, window, &mut sink);

    let october_rent: Vec<_> = timeline
        .iter()
        .filter(|e| e.date() == october && e.transaction.description.starts_with("Rent"))
        .collect();
    assert_eq!(october_rent.len(), 1);
    assert_eq!(october_rent[0].transaction.amount, Decimal::from(1150));
    assert_eq!(
        sink,
        vec![Diagnostic::DuplicateOccurrence {
            id: occurrence_id(rent.id, october),
            date: october,
        }]
    );
}

#[test]
fn ledger_outside_the_window_is_ignored() {
    let mut snapshot = household();
    snapshot
        .transactions
        .push(Transaction::expense(date(2025, 8, 20), "Old bill", Decimal::from(999)));
    let window = DateWindow::new(date(2025, 9, 1), date(2025, 9, 30)).unwrap();
    let balances = end_of_day_balances(&snapshot.transactions, &snapshot.rules, window);
    assert!(balances.keys().all(|d| window.contains(*d)));
    assert_eq!(balances[&date(2025, 9, 1)], Decimal::from(1250));
}

#[test]
fn oversized_window_is_clamped_with_a_warning() {
    let snapshot = household();
    let groceries = &snapshot.rules[1];
    let window = DateWindow::new(date(2025, 9, 1), date(2035, 9, 1)).unwrap();
    let mut sink = Vec::new();
    let occurrences = expand(groceries, window, &mut sink);

    let limit = date(2025 + MAX_HORIZON_YEARS, 9, 1);
    assert!(occurrences.iter().all(|o| o.date <= limit));
    assert!(matches!(
        sink.as_slice(),
        [Diagnostic::HorizonClamped { rule_id, .. }] if *rule_id == groceries.id
    ));
}

#[test]
fn month_window_serves_cached_grouping_until_invalidated() {
    let snapshot = household();
    let mut view = MonthWindow::new(MonthKey::new(2025, 9).unwrap());
    let input = ProjectionInput {
        transactions: &snapshot.transactions,
        rules: &snapshot.rules,
        opening_balance: Decimal::from(500),
    };
    let timeline = ProjectionService::timeline(input, view.range(), &mut Vec::new());

    let first = view.current(&timeline, &mut Vec::new());
    let second = view.current(&timeline, &mut Vec::new());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.keys().next(), Some(&date(2025, 9, 1)));
    assert_eq!(first[&date(2025, 9, 1)].len(), 3);

    view.invalidate();
    let third = view.current(&timeline, &mut Vec::new());
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
}
