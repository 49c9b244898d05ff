use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type Row = BTreeMap<String, String>;

/// Identity of a record within one loaded dataset.
///
/// Kept apart from the value map so a column literally named `selfId`
/// is plain data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub values: Row,
}

impl Record {
    pub fn new(id: RecordId, values: Row) -> Self {
        Self { id, values }
    }

    /// A record holding `""` for every column.
    pub fn blank(id: RecordId, columns: &ColumnSet) -> Self {
        let values = columns
            .iter()
            .map(|column| (column.to_string(), String::new()))
            .collect();
        Self { id, values }
    }

    pub fn value(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        is_blank_row(&self.values)
    }
}

/// Ordered column keys of a dataset, fixed once the header is read.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnSet(Vec<String>);

impl ColumnSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self(columns)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// True when every value in the row is the empty string.
pub fn is_blank_row(row: &Row) -> bool {
    row.values().all(String::is_empty)
}

/// Values of `record` in column order.
pub fn ordered_values<'a>(record: &'a Record, columns: &'a ColumnSet) -> Vec<&'a str> {
    columns.iter().map(|column| record.value(column)).collect()
}
