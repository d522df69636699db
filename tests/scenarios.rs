use std::time::{Duration, Instant};

use chaincalc::calculator::{Calculator, Input};
use chaincalc::history::{History, HISTORY_KEY, MAX_HISTORY};
use chaincalc::keymap::input_for_key;
use chaincalc::storage::{FileStore, KeyValueStore, MemoryStore};

fn type_keys(calc: &mut Calculator, keys: &[&str], now: Instant) {
    for key in keys {
        let input = input_for_key(key).unwrap_or_else(|| panic!("unmapped key {key}"));
        calc.dispatch_at(input, now);
    }
}

fn fresh() -> Calculator {
    Calculator::new(History::load(Box::new(MemoryStore::new())))
}

#[test]
fn multiply_binds_before_add() {
    let mut calc = fresh();
    type_keys(&mut calc, &["5", "*", "3", "+", "2", "Enter"], Instant::now());
    assert_eq!(calc.display(), "17");

    type_keys(&mut calc, &["2", "+", "3", "*", "4", "="], Instant::now());
    assert_eq!(calc.display(), "14");
}

#[test]
fn divide_by_zero_shows_error_then_resets() {
    let mut calc = fresh();
    let start = Instant::now();
    type_keys(&mut calc, &["8", "/", "0", "="], start);
    assert!(calc.is_error());
    assert!(calc.history().is_empty());

    calc.poll(start + Duration::from_secs(2));
    assert!(!calc.is_error());
    assert_eq!(calc.display(), "0");
    assert_eq!(calc.expression_preview(), "");
}

#[test]
fn escape_and_backspace_keys() {
    let mut calc = fresh();
    let now = Instant::now();
    type_keys(&mut calc, &["1", "2", "3", "Backspace"], now);
    assert_eq!(calc.display(), "12");
    type_keys(&mut calc, &["+", "4", "Escape"], now);
    assert_eq!(calc.display(), "0");
    assert_eq!(calc.expression_preview(), "");
}

#[test]
fn sixth_evaluation_evicts_oldest() {
    let mut calc = fresh();
    let now = Instant::now();
    for d in 1..=6u8 {
        calc.dispatch_at(Input::Digit(d), now);
        calc.dispatch_at(Input::Operator(chaincalc::Operator::Add), now);
        calc.dispatch_at(Input::Digit(0), now);
        calc.dispatch_at(Input::Equals, now);
    }
    let results: Vec<f64> = calc.history().entries().iter().map(|e| e.result).collect();
    assert_eq!(results.len(), MAX_HISTORY);
    assert_eq!(results, vec![6.0, 5.0, 4.0, 3.0, 2.0]);
}

#[test]
fn history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let now = Instant::now();
    {
        let mut calc = Calculator::new(History::load(Box::new(FileStore::new(dir.path()))));
        type_keys(&mut calc, &["9", "-", "4", "="], now);
        type_keys(&mut calc, &["1", ".", "5", "*", "2", "="], now);
    }

    let mut calc = Calculator::new(History::load(Box::new(FileStore::new(dir.path()))));
    let expressions: Vec<&str> = calc
        .history()
        .entries()
        .iter()
        .map(|e| e.expression.as_str())
        .collect();
    assert_eq!(expressions, vec!["1.5 × 2", "9 - 4"]);

    calc.dispatch_at(Input::HistorySelect(1), now);
    assert_eq!(calc.display(), "5");

    calc.dispatch_at(Input::HistoryClear, now);
    let store = FileStore::new(dir.path());
    assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn overflowing_result_keeps_saved_history() {
    let dir = tempfile::tempdir().unwrap();
    let now = Instant::now();
    let huge: Vec<&str> = std::iter::once("1")
        .chain(std::iter::repeat("0").take(200))
        .collect();
    {
        let mut calc = Calculator::new(History::load(Box::new(FileStore::new(dir.path()))));
        type_keys(&mut calc, &["2", "*", "3", "="], now);
        type_keys(&mut calc, &huge, now);
        type_keys(&mut calc, &["*"], now);
        type_keys(&mut calc, &huge, now);
        type_keys(&mut calc, &["="], now);
        assert!(calc.is_error());
        assert_eq!(calc.history().len(), 1);
    }

    let calc = Calculator::new(History::load(Box::new(FileStore::new(dir.path()))));
    assert_eq!(calc.history().len(), 1);
    assert_eq!(calc.history().get(0).unwrap().result, 6.0);
}

#[test]
fn corrupt_history_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{HISTORY_KEY}.json")), "{oops").unwrap();
    let calc = Calculator::new(History::load(Box::new(FileStore::new(dir.path()))));
    assert!(calc.history().is_empty());
}
