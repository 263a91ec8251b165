use super::*;
use crate::editor::add_component;

fn template(name: &str) -> Template {
    Template::new(name)
}

fn edited(base: &Template) -> Template {
    add_component(base, "text", (0.0, 0.0), (2, 2), None).unwrap().0
}

// =============================================================================
// record / undo / redo
// =============================================================================

#[test]
fn undo_then_redo_restores_exact_value() {
    let a = template("a");
    let b = edited(&a);

    let mut history = History::new();
    history.record(&a, "opened");
    history.record(&b, "add text");

    assert_eq!(history.undo().unwrap(), &a);
    assert_eq!(history.redo().unwrap(), &b);
}

#[test]
fn boundary_steps_are_quiet_noops() {
    let mut history = History::new();
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());

    history.record(&template("a"), "opened");
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());
}

#[test]
fn record_after_undo_discards_redo_branch() {
    let a = template("a");
    let b = edited(&a);
    let c = edited(&b);

    let mut history = History::new();
    history.record(&a, "opened");
    history.record(&b, "add 1");

    history.undo().unwrap();
    history.record(&c, "diverged");

    assert!(!history.can_redo());
    assert_eq!(history.len(), 2);
    assert_eq!(history.current().unwrap().data, c);
    assert_eq!(history.messages(), vec!["opened", "diverged"]);
}

#[test]
fn multiple_undos_walk_back_in_order() {
    let a = template("a");
    let b = edited(&a);
    let c = edited(&b);

    let mut history = History::new();
    history.record(&a, "opened");
    history.record(&b, "1");
    history.record(&c, "2");

    assert_eq!(history.undo().unwrap(), &b);
    assert_eq!(history.undo().unwrap(), &a);
    assert!(history.undo().is_none());
}

// =============================================================================
// capacity
// =============================================================================

#[test]
fn capacity_evicts_oldest_entries() {
    let mut history = History::with_capacity(3);
    let mut t = template("a");
    history.record(&t, "opened");
    for i in 0..5 {
        t = edited(&t);
        history.record(&t, &format!("edit {i}"));
    }

    assert_eq!(history.len(), 3);
    assert_eq!(history.messages(), vec!["edit 2", "edit 3", "edit 4"]);
    // Cursor still points at the newest entry after eviction.
    assert_eq!(history.current().unwrap().message, "edit 4");
    assert!(!history.can_redo());
}

#[test]
fn default_capacity_is_bounded() {
    let mut history = History::new();
    let t = template("a");
    for _ in 0..(crate::consts::HISTORY_CAPACITY + 10) {
        history.record(&t, "edit");
    }
    assert_eq!(history.len(), crate::consts::HISTORY_CAPACITY);
}

#[test]
fn entries_record_template_version() {
    let mut t = template("a");
    t.meta.version = 7;
    let mut history = History::new();
    history.record(&t, "opened");
    assert_eq!(history.current().unwrap().template_version, 7);
    assert!(history.current().unwrap().created_at > 0);
}
