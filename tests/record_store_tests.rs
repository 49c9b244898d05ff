use csvsheet::state::data_model::{ColumnSet, Record, RecordId, Row};
use csvsheet::state::record_store::{RecordStore, StoreError};

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn loaded() -> RecordStore {
    let mut store = RecordStore::new();
    store.load(
        vec![
            Record::new(RecordId(0), row(&[("name", "Alice"), ("age", "30")])),
            Record::new(RecordId(1), row(&[("name", "Bob"), ("age", "")])),
        ],
        ColumnSet::new(vec!["name".into(), "age".into()]),
    );
    store
}

#[test]
fn test_load_resets_counter_to_len() {
    let store = loaded();
    assert_eq!(store.next_id(), RecordId(2));
}

#[test]
fn test_load_counter_skips_past_highest_id() {
    let mut store = RecordStore::new();
    store.load(
        vec![Record::new(RecordId(7), row(&[("name", "Zed")]))],
        ColumnSet::new(vec!["name".into()]),
    );
    assert_eq!(store.next_id(), RecordId(8));
}

#[test]
fn test_create_mints_without_appending() {
    let mut store = loaded();
    let blank = store.create();
    assert_eq!(blank.id, RecordId(2));
    assert!(blank.is_blank());
    assert_eq!(store.len(), 2);
    assert_eq!(store.next_id(), RecordId(3));
}

#[test]
fn test_replace_unknown_id_is_noop() {
    let mut store = loaded();
    let before = store.clone();
    let err = store
        .replace(RecordId(9), Record::new(RecordId(9), row(&[("name", "X")])))
        .unwrap_err();
    assert_eq!(err, StoreError::UnknownIdentity(RecordId(9)));
    assert_eq!(store, before);
}

#[test]
fn test_replace_pins_identity() {
    let mut store = loaded();
    let replacement = Record::new(RecordId(7), row(&[("name", "Bobby"), ("age", "5")]));
    store.replace(RecordId(1), replacement).unwrap();
    assert_eq!(store.records()[1].id, RecordId(1));
    assert_eq!(store.records()[1].value("name"), "Bobby");
}

#[test]
fn test_append_rejects_duplicate_identity() {
    let mut store = loaded();
    let copy = store.records()[0].clone();
    assert_eq!(
        store.append(copy),
        Err(StoreError::DuplicateIdentity(RecordId(0)))
    );
}

#[test]
fn test_mutations_bump_revision() {
    let mut store = loaded();
    let start = store.revision();
    let source = store.records()[0].clone();
    let record = store.duplicate(&source);
    assert_eq!(store.revision(), start);
    store.append(record).unwrap();
    assert_eq!(store.revision(), start + 1);
}
