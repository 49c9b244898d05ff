use std::cmp::Ordering;

use csvsheet::io::csv_io;
use csvsheet::state::data_model::{Record, RecordId};
use csvsheet::state::filter::{self, FilterCache, MatchCase, SortOrder, SortSpec};

fn sample_records() -> Vec<Record> {
    csv_io::parse_records(
        "name,city,age\nAlice,Oslo,30\nbob,Bergen,25\nCarol,OSLO,40\nDave,Molde,9\n",
    )
    .unwrap()
    .records
}

#[test]
fn test_empty_query_keeps_everything_in_order() {
    let records = sample_records();
    assert_eq!(
        filter::apply(&records, "", MatchCase::Insensitive),
        vec![0, 1, 2, 3]
    );
}

#[test]
fn test_matching_is_case_insensitive_by_default() {
    let records = sample_records();
    assert_eq!(
        filter::apply(&records, "oslo", MatchCase::Insensitive),
        vec![0, 2]
    );
    assert_eq!(
        filter::apply(&records, "BOB", MatchCase::Insensitive),
        vec![1]
    );
}

#[test]
fn test_sensitive_matching_respects_case() {
    let records = sample_records();
    assert_eq!(filter::apply(&records, "Oslo", MatchCase::Sensitive), vec![0]);
    assert!(filter::apply(&records, "BOB", MatchCase::Sensitive).is_empty());
}

#[test]
fn test_query_matches_any_column() {
    let records = sample_records();
    assert_eq!(
        filter::apply(&records, "30", MatchCase::Insensitive),
        vec![0]
    );
    assert_eq!(
        filter::apply(&records, "er", MatchCase::Insensitive),
        vec![1]
    );
}

#[test]
fn test_identity_is_not_searched() {
    let records = sample_records();
    // Dave has id 3, but only Alice's age contains "3".
    assert_eq!(filter::apply(&records, "3", MatchCase::Insensitive), vec![0]);
}

#[test]
fn test_whitespace_is_part_of_query() {
    let records = sample_records();
    assert!(filter::apply(&records, " Alice", MatchCase::Insensitive).is_empty());
}

#[test]
fn test_apply_is_deterministic() {
    let records = sample_records();
    let first = filter::apply(&records, "o", MatchCase::Insensitive);
    let second = filter::apply(&records, "o", MatchCase::Insensitive);
    assert_eq!(first, second);
}

#[test]
fn test_sort_view_is_stable_and_numeric_aware() {
    let records = sample_records();
    let mut view = vec![0, 1, 2, 3];
    filter::sort_view(
        &records,
        &mut view,
        &SortSpec {
            column: "age".to_string(),
            order: SortOrder::Asc,
        },
    );
    assert_eq!(view, vec![3, 1, 0, 2]);

    let mut by_city = vec![0, 1, 2, 3];
    filter::sort_view(
        &records,
        &mut by_city,
        &SortSpec {
            column: "city".to_string(),
            order: SortOrder::Desc,
        },
    );
    assert_eq!(by_city, vec![0, 2, 3, 1]);
}

fn single_column(column: &str, values: &[&str]) -> Vec<Record> {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            Record::new(
                RecordId(idx as u64),
                [(column.to_string(), value.to_string())].into_iter().collect(),
            )
        })
        .collect()
}

#[test]
fn test_refinement_matches_full_scan() {
    let records = sample_records();
    let mut cache = FilterCache::new();
    cache.refresh(&records, 1, "o", MatchCase::Insensitive);
    let narrowed = cache
        .refresh(&records, 1, "osl", MatchCase::Insensitive)
        .to_vec();
    assert_eq!(narrowed, filter::apply(&records, "osl", MatchCase::Insensitive));
    assert_eq!(narrowed, vec![0, 2]);
}

#[test]
fn test_revision_change_forces_rescan() {
    let mut records = sample_records();
    let mut cache = FilterCache::new();
    assert_eq!(cache.refresh(&records, 1, "bob", MatchCase::Insensitive), &[1]);
    records.extend(single_column("name", &["Bobby"]));
    assert_eq!(
        cache.refresh(&records, 2, "bob", MatchCase::Insensitive),
        &[1, 4]
    );
}

#[test]
fn test_compare_cells_numbers_before_text() {
    assert_eq!(filter::compare_cells("9", "10"), Ordering::Less);
    assert_eq!(filter::compare_cells("apple", "Banana"), Ordering::Less);
    assert_eq!(filter::compare_cells("100", "1a"), Ordering::Less);
    assert_eq!(filter::compare_cells("NaN", "3"), Ordering::Greater);
    assert_eq!(filter::compare_cells("inf", "3"), Ordering::Greater);
}

#[test]
fn test_sort_mixed_column_is_totally_ordered() {
    let values = ["2", "10", "1a", "NaN", "x", "", "1e3", "-0", "3", "0b", "100", "5"];
    let mut cells: Vec<&str> = Vec::new();
    for round in 0..40 {
        cells.extend(values.iter().cycle().skip(round % values.len()).take(values.len()));
    }
    let records = single_column("v", &cells);
    let mut view: Vec<usize> = (0..records.len()).collect();
    filter::sort_view(
        &records,
        &mut view,
        &SortSpec {
            column: "v".to_string(),
            order: SortOrder::Asc,
        },
    );

    let sorted: Vec<&str> = view.iter().map(|&idx| records[idx].value("v")).collect();
    assert!(sorted
        .windows(2)
        .all(|pair| filter::compare_cells(pair[0], pair[1]) != Ordering::Greater));

    let mut distinct = sorted.clone();
    distinct.dedup();
    assert_eq!(
        distinct,
        vec!["-0", "2", "3", "5", "10", "100", "1e3", "", "0b", "1a", "NaN", "x"]
    );
}

#[test]
fn test_sort_cycle() {
    let asc = filter::next_sort(None, "name");
    assert_eq!(asc.as_ref().map(|s| &s.order), Some(&SortOrder::Asc));
    let desc = filter::next_sort(asc.as_ref(), "name");
    assert_eq!(desc.as_ref().map(|s| &s.order), Some(&SortOrder::Desc));
    assert_eq!(filter::next_sort(desc.as_ref(), "name"), None);
    let other = filter::next_sort(desc.as_ref(), "city");
    assert_eq!(other.map(|s| s.column), Some("city".to_string()));
}
