//! Integration tests for the History API
//!
//! These tests drive the public facade the way a host would: push fragments,
//! apply transitions and observe the watchers.

use std::{cell::RefCell, rc::Rc};

use sheet_history::{
    History, HistoryToken, HistoryTokenError, SheetHistoryError, TokenKind, config::AppConfig,
    name::SpreadsheetId,
};

fn history_from_toml(text: &str) -> History {
    let config: AppConfig = toml::from_str(text).expect("Failed to parse config");
    History::new(config)
}

#[test]
fn test_default_history_starts_at_spreadsheet_list() {
    let history = History::new(AppConfig::default());
    assert_eq!(
        history.current(),
        &HistoryToken::spreadsheet_list_select(sheet_history::OffsetAndCount::EMPTY)
    );
}

#[test]
fn test_configured_initial_fragment() {
    let history = history_from_toml(
        r##"
        [history]
        initial_fragment = "#/42/Budget/cell/A1/formula"
        "##,
    );
    assert_eq!(history.current().url_fragment(), "/42/Budget/cell/A1/formula");
    assert_eq!(history.current().id(), Some(SpreadsheetId::new(42)));
}

#[test]
fn test_configured_default_count() {
    let mut history = history_from_toml("[list]\ndefault_count = 50\n");
    assert_eq!(history.current().url_fragment(), "/*/count/50");

    history.push_fragment("/42/Budget/label/*");
    assert_eq!(history.current().url_fragment(), "/42/Budget/label/*/count/50");
}

#[test]
fn test_watcher_sees_previous_and_current() {
    let mut history = History::new(AppConfig::default());
    let changes = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&changes);
    history.add_watcher(move |previous, history| {
        log.borrow_mut().push(format!(
            "{} -> {}",
            previous.url_fragment(),
            history.current().url_fragment()
        ));
    });

    history.push_fragment("/42/Budget");
    history.apply(|token| Ok(token.rename())).unwrap();
    history
        .apply(|token| token.set_save_string_value("Budget 2025"))
        .unwrap();
    history.apply(|token| Ok(token.clear_action())).unwrap();

    assert_eq!(
        *changes.borrow(),
        vec![
            "/* -> /42/Budget",
            "/42/Budget -> /42/Budget/rename",
            "/42/Budget/rename -> /42/Budget/rename/save/Budget%202025",
            "/42/Budget/rename/save/Budget%202025 -> /42/Budget/rename",
        ]
    );
}

#[test]
fn test_no_op_transition_does_not_notify() {
    let mut history = History::new(AppConfig::default());
    history.push_fragment("/42/Budget/cell/A1");

    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    history.add_watcher(move |_, _| *counter.borrow_mut() += 1);

    let changed = history.apply(|token| Ok(token.clear_action())).unwrap();
    assert!(!changed);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_rejected_save_value() {
    let mut history = History::new(AppConfig::default());
    history.push_fragment("/42/Budget/cell/A1/locale");

    let err = history
        .apply(|token| token.set_save_string_value("not a locale"))
        .unwrap_err();
    assert!(
        matches!(err, SheetHistoryError::Token(HistoryTokenError::InvalidArgument(_))),
        "Unexpected error: {err}"
    );
    assert_eq!(history.current().url_fragment(), "/42/Budget/cell/A1/locale");
}

#[test]
fn test_unknown_fragment_is_kept() {
    let mut history = History::new(AppConfig::default());
    history.push_fragment("/somewhere/else");
    assert_eq!(
        history.current().kind(),
        &TokenKind::Unknown("/somewhere/else".to_string())
    );
}
