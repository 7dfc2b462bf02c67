mod common;

use std::sync::Arc;

use common::{note, store_with};
use espresso_core::{
    App, EditKey, FailurePolicy, Field, Focus, MemoryGateway, Mode, NoteStore, SyncConfig,
};

fn app_with(records: Vec<espresso_core::NoteRecord>) -> (Arc<MemoryGateway>, App) {
    let (gateway, store) = store_with(records);
    (gateway, App::new(store, &SyncConfig::default()))
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        let key = if c == '\n' {
            EditKey::Enter
        } else {
            EditKey::Char(c)
        };
        app.handle_key(key);
    }
}

#[test]
fn test_starts_on_first_note_content() {
    let (_, app) = app_with(vec![note("A", "alpha"), note("B", "beta")]);
    assert_eq!(app.focus, Focus::Editor);
    assert_eq!(app.field(), Field::Content);
    assert_eq!(app.editor().text(), "alpha");
    assert_eq!(app.editor().cursor_start(), 5);
}

#[test]
fn test_typing_a_bullet_list() {
    let a = note("List", "");
    let id = a.id;
    let (gateway, mut app) = app_with(vec![a]);

    type_str(&mut app, "* milk\neggs\n\n");
    assert_eq!(app.editor().text(), "◆ milk\n◆ eggs\n");
    assert_eq!(app.editor().cursor_start(), 14);
    assert_eq!(app.store().get(id).unwrap().content, "◆ milk\n◆ eggs\n");

    app.quit();
    assert!(!app.running);
    assert_eq!(gateway.records()[0].content, "◆ milk\n◆ eggs\n");
}

#[test]
fn test_marker_in_title_is_left_alone() {
    let a = note("", "");
    let id = a.id;
    let (_, mut app) = app_with(vec![a]);

    app.set_field(Field::Title);
    type_str(&mut app, "* x");
    assert_eq!(app.store().get(id).unwrap().title, "* x");
}

#[test]
fn test_enter_in_title_moves_to_content() {
    let (_, mut app) = app_with(vec![note("Title", "body")]);
    app.set_field(Field::Title);
    assert_eq!(app.editor().text(), "Title");

    assert!(!app.handle_key(EditKey::Enter));
    assert_eq!(app.field(), Field::Content);
    assert_eq!(app.editor().text(), "body");
    assert_eq!(app.field_text(Field::Title), "Title");
}

#[test]
fn test_keys_without_selection_do_nothing() {
    let (_, mut app) = app_with(Vec::new());
    assert_eq!(app.focus, Focus::Sidebar);
    assert!(!app.handle_key(EditKey::Char('a')));
    assert!(!app.insert_text("pasted"));
    assert_eq!(app.editor().text(), "");
}

#[test]
fn test_create_note_edits_new_title() {
    let (gateway, mut app) = app_with(vec![note("A", "alpha")]);

    app.create_note();
    assert_eq!(app.store().notes().len(), 2);
    assert_eq!(app.store().selected_index(), Some(1));
    assert_eq!(app.field(), Field::Title);
    assert_eq!(app.focus, Focus::Editor);
    assert_eq!(app.editor().text(), "");

    type_str(&mut app, "Ideas");
    app.quit();
    assert_eq!(gateway.records()[1].title, "Ideas");
}

#[test]
fn test_failed_create_is_reported() {
    let (gateway, mut app) = app_with(vec![note("A", "")]);
    gateway.set_offline(true);

    app.create_note();
    assert_eq!(app.store().notes().len(), 1);
    assert!(app
        .status_message
        .as_deref()
        .unwrap_or_default()
        .starts_with("Could not create note"));
}

#[test]
fn test_delete_needs_confirmation() {
    let (a, b, c) = (note("A", "alpha"), note("B", "beta"), note("C", "gamma"));
    let (b_id, c_id) = (b.id, c.id);
    let (_, mut app) = app_with(vec![a, b, c]);
    app.select_next();
    assert_eq!(app.store().selected_id(), Some(b_id));

    app.request_delete();
    assert_eq!(app.mode, Mode::ConfirmDelete);
    assert_eq!(app.pending_delete(), Some(b_id));
    app.cancel_delete();
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.store().notes().len(), 3);

    app.request_delete();
    app.confirm_delete();
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.store().notes().len(), 2);
    assert_eq!(app.store().selected_id(), Some(c_id));
    assert_eq!(app.editor().text(), "gamma");
}

#[test]
fn test_deleting_only_note_returns_to_sidebar() {
    let (_, mut app) = app_with(vec![note("A", "alpha")]);
    app.request_delete();
    app.confirm_delete();
    assert_eq!(app.store().selected_id(), None);
    assert_eq!(app.focus, Focus::Sidebar);
    assert_eq!(app.editor().text(), "");
    assert_eq!(app.last_updated_label(), None);
}

#[test]
fn test_list_navigation() {
    let (a, b) = (note("A", "alpha"), note("B", "beta"));
    let (a_id, b_id) = (a.id, b.id);
    let (_, mut app) = app_with(vec![a, b]);

    app.select_next();
    app.select_next();
    assert_eq!(app.store().selected_id(), Some(b_id));
    assert_eq!(app.editor().text(), "beta");

    app.select_prev();
    assert_eq!(app.store().selected_id(), Some(a_id));

    app.clear_selection();
    assert_eq!(app.store().selected_id(), None);
    assert_eq!(app.focus, Focus::Sidebar);

    app.select_prev();
    assert_eq!(app.store().selected_id(), Some(b_id));
}

#[test]
fn test_paste_into_title_stays_on_one_line() {
    let a = note("", "");
    let id = a.id;
    let (_, mut app) = app_with(vec![a]);
    app.set_field(Field::Title);

    assert!(app.insert_text("two\nlines"));
    assert_eq!(app.store().get(id).unwrap().title, "two lines");
}

#[test]
fn test_emoji_lands_at_caret() {
    let a = note("", "ac");
    let id = a.id;
    let (_, mut app) = app_with(vec![a]);

    app.handle_key(EditKey::Left);
    app.insert_text("😀");
    assert_eq!(app.store().get(id).unwrap().content, "a😀c");
    assert_eq!(app.editor().cursor_start(), 3);
}

#[test]
fn test_notify_policy_surfaces_failed_writes() {
    let (gateway, store) = store_with(vec![note("A", "")]);
    let config = SyncConfig {
        failure_policy: FailurePolicy::Notify,
        retry_attempts: 0,
    };
    let mut app = App::new(store, &config);

    gateway.set_offline(true);
    app.handle_key(EditKey::Char('x'));
    app.quit();
    assert!(app
        .status_message
        .as_deref()
        .unwrap_or_default()
        .starts_with("Could not save note (update content)"));
}

#[test]
fn test_log_policy_stays_quiet() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![note("A", "")]));
    let store = NoteStore::load(gateway.clone(), &SyncConfig::default()).unwrap();
    let mut app = App::new(store, &SyncConfig::default());

    gateway.set_offline(true);
    app.handle_key(EditKey::Char('x'));
    app.quit();
    assert_eq!(app.status_message, None);
    assert_eq!(app.field_text(Field::Content), "x");
}

#[test]
fn test_last_updated_label() {
    let mut stale = note("A", "");
    stale.last_updated = None;
    let (_, mut app) = app_with(vec![stale]);
    assert_eq!(
        app.last_updated_label().as_deref(),
        Some("Last Updated Invalid date")
    );

    app.handle_key(EditKey::Char('x'));
    let label = app.last_updated_label().unwrap();
    assert!(label.starts_with("Last Updated "));
    assert!(!label.ends_with("Invalid date"));
}
