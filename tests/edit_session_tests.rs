use csvsheet::io::csv_io;
use csvsheet::state::data_model::RecordId;
use csvsheet::state::edit_session::{CommitOutcome, DraftMode, EditError, EditSession};
use csvsheet::state::record_store::RecordStore;

fn sample_store() -> RecordStore {
    let parsed = csv_io::parse_records("name,age\nAlice,30\nBob,\n").unwrap();
    let mut store = RecordStore::new();
    store.load(parsed.records, parsed.columns);
    store
}

#[test]
fn test_duplicate_appends_copy_with_fresh_id() {
    let mut store = sample_store();
    let mut session = EditSession::new();

    let draft = session.begin_duplicate(&mut store, RecordId(1)).unwrap();
    assert_eq!(draft.mode(), DraftMode::Duplicating);
    assert_eq!(draft.id(), RecordId(2));
    assert_eq!(store.len(), 2);

    let outcome = session.commit(&mut store).unwrap();
    assert_eq!(outcome, CommitOutcome::Appended(RecordId(2)));
    assert_eq!(store.len(), 3);
    let appended = &store.records()[2];
    assert_eq!(appended.id.to_string(), "2");
    assert_eq!(appended.value("name"), "Bob");
    assert_eq!(appended.value("age"), "");
    assert!(!session.is_active());
}

#[test]
fn test_create_draft_is_blank_and_not_stored() {
    let mut store = sample_store();
    let mut session = EditSession::new();

    let draft = session.begin_create(&mut store).unwrap();
    assert_eq!(draft.mode(), DraftMode::Creating);
    assert!(draft.record().is_blank());
    assert_eq!(draft.record().values.len(), 2);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_blank_create_is_refused_and_stays_open() {
    let mut store = sample_store();
    let mut session = EditSession::new();
    session.begin_create(&mut store).unwrap();

    assert_eq!(session.commit(&mut store), Err(EditError::BlankRecord));
    assert!(session.is_active());
    assert_eq!(store.len(), 2);

    session.set_field("name", "Carol").unwrap();
    assert_eq!(
        session.commit(&mut store),
        Ok(CommitOutcome::Appended(RecordId(2)))
    );
    assert_eq!(store.records()[2].value("name"), "Carol");
}

#[test]
fn test_edit_commit_changes_only_that_record() {
    let mut store = sample_store();
    let before = store.records().to_vec();
    let mut session = EditSession::new();

    session.begin_edit(&store, RecordId(0)).unwrap();
    session.set_field("age", "31").unwrap();
    assert_eq!(store.records(), before.as_slice());

    assert_eq!(
        session.commit(&mut store),
        Ok(CommitOutcome::Replaced(RecordId(0)))
    );
    assert_eq!(store.records()[0].value("age"), "31");
    assert_eq!(store.records()[0].value("name"), "Alice");
    assert_eq!(store.records()[0].id, RecordId(0));
    assert_eq!(store.records()[1], before[1]);
}

#[test]
fn test_cancel_leaves_store_unchanged() {
    let mut store = sample_store();
    let before = store.records().to_vec();
    let mut session = EditSession::new();

    session.begin_edit(&store, RecordId(1)).unwrap();
    session.set_field("name", "Robert").unwrap();
    let discarded = session.cancel().unwrap();

    assert_eq!(discarded.record().value("name"), "Robert");
    assert_eq!(store.records(), before.as_slice());
    assert!(session.cancel().is_none());
}

#[test]
fn test_only_one_draft_at_a_time() {
    let mut store = sample_store();
    let mut session = EditSession::new();
    session.begin_edit(&store, RecordId(0)).unwrap();

    assert_eq!(
        session.begin_create(&mut store).map(|_| ()),
        Err(EditError::SessionActive)
    );
    assert_eq!(session.draft().map(|d| d.id()), Some(RecordId(0)));
}

#[test]
fn test_set_field_rejects_unknown_column_and_idle_session() {
    let mut store = sample_store();
    let mut session = EditSession::new();
    assert_eq!(session.set_field("name", "x"), Err(EditError::NotDrafting));

    session.begin_edit(&store, RecordId(0)).unwrap();
    assert_eq!(
        session.set_field("selfId", "99"),
        Err(EditError::UnknownColumn("selfId".to_string()))
    );
    assert_eq!(session.draft().map(|d| d.id()), Some(RecordId(0)));
    let _ = session.cancel();
    assert_eq!(session.commit(&mut store), Err(EditError::NotDrafting));
}

#[test]
fn test_edit_of_vanished_record_is_noop() {
    let mut store = sample_store();
    let mut session = EditSession::new();
    session.begin_edit(&store, RecordId(1)).unwrap();
    session.set_field("name", "Ghost").unwrap();

    let parsed = csv_io::parse_records("name,age\nZed,1\n").unwrap();
    store.load(parsed.records, parsed.columns);
    let before = store.clone();

    assert_eq!(
        session.commit(&mut store),
        Err(EditError::UnknownIdentity(RecordId(1)))
    );
    assert_eq!(store, before);
    assert!(!session.is_active());
}

#[test]
fn test_begin_with_unknown_source_fails() {
    let mut store = sample_store();
    let mut session = EditSession::new();
    assert_eq!(
        session.begin_duplicate(&mut store, RecordId(42)).map(|_| ()),
        Err(EditError::UnknownIdentity(RecordId(42)))
    );
    assert!(!session.is_active());
}

#[test]
fn test_cancelled_ids_are_not_reused() {
    let mut store = sample_store();
    let mut session = EditSession::new();

    session.begin_create(&mut store).unwrap();
    session.cancel();
    let draft = session.begin_duplicate(&mut store, RecordId(0)).unwrap();
    assert_eq!(draft.id(), RecordId(3));
}
