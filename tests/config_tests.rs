use csvsheet::config::SheetConfig;
use csvsheet::state::filter::MatchCase;

#[test]
fn test_partial_json_keeps_defaults() {
    let config = SheetConfig::from_json(r#"{"overscan": 2, "match_case": "sensitive"}"#).unwrap();
    assert_eq!(config.overscan, 2);
    assert_eq!(config.match_case, MatchCase::Sensitive);
    assert_eq!(config.estimated_row_height, 90.0);
    assert_eq!(config.export_prefix, "pattern-context");
}

#[test]
fn test_unreadable_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = SheetConfig::load_from(&dir.path().join("missing.json"));
    assert_eq!(config, SheetConfig::default());
}

#[test]
fn test_invalid_json_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(SheetConfig::load_from(&path), SheetConfig::default());
}

#[test]
fn test_config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"export_prefix": "people"}"#).unwrap();
    let config = SheetConfig::load_from(&path);
    assert_eq!(config.export_prefix, "people");
    assert_eq!(config.overscan, 5);
}
