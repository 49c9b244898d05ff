use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::state::data_model::Record;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCase {
    #[default]
    Insensitive,
    Sensitive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub order: SortOrder,
}

/// Positions in `records` of every record with a value containing `query`,
/// in canonical order. The identity never takes part in matching.
pub fn apply(records: &[Record], query: &str, case: MatchCase) -> Vec<usize> {
    if query.is_empty() {
        return (0..records.len()).collect();
    }
    let needle = Needle::new(query, case);
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| needle.matches(record).then_some(idx))
        .collect()
}

struct Needle {
    text: String,
    case: MatchCase,
}

impl Needle {
    fn new(query: &str, case: MatchCase) -> Self {
        let text = match case {
            MatchCase::Insensitive => query.to_lowercase(),
            MatchCase::Sensitive => query.to_string(),
        };
        Self { text, case }
    }

    fn matches(&self, record: &Record) -> bool {
        record.values.values().any(|value| match self.case {
            MatchCase::Sensitive => value.contains(&self.text),
            MatchCase::Insensitive => value.to_lowercase().contains(&self.text),
        })
    }
}

/// Memoizes the last filter result and narrows it when the query is
/// extended against an unchanged sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCache {
    revision: Option<u64>,
    query: String,
    case: MatchCase,
    matches: Vec<usize>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.revision = None;
        self.matches.clear();
    }

    pub fn refresh(
        &mut self,
        records: &[Record],
        revision: u64,
        query: &str,
        case: MatchCase,
    ) -> &[usize] {
        let same_source = self.revision == Some(revision) && self.case == case;
        if same_source && self.query == query {
            return &self.matches;
        }

        let needle = Needle::new(query, case);
        let previous = Needle::new(&self.query, case);
        // Anything matching `needle` also matched `previous`, so the old
        // matches are a superset of the new ones.
        if same_source && !previous.text.is_empty() && needle.text.contains(&previous.text) {
            self.matches
                .retain(|&idx| records.get(idx).is_some_and(|record| needle.matches(record)));
        } else {
            self.matches = apply(records, query, case);
        }

        self.revision = Some(revision);
        self.query = query.to_string();
        self.case = case;
        &self.matches
    }
}

/// Stable reorder of `view` by one column. The canonical sequence is untouched.
pub fn sort_view(records: &[Record], view: &mut [usize], spec: &SortSpec) {
    view.sort_by(|&a, &b| {
        let left = records[a].value(&spec.column);
        let right = records[b].value(&spec.column);
        let ordering = compare_cells(left, right);
        match spec.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Total order over cells: finite numbers first, by value, then everything
/// else as case-folded text. Ties fall back to the raw text.
pub fn compare_cells(left: &str, right: &str) -> Ordering {
    match (numeric_cell(left), numeric_cell(right)) {
        (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| compare_text(left, right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_text(left, right),
    }
}

fn numeric_cell(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Ascending, then descending, then unsorted.
pub fn next_sort(current: Option<&SortSpec>, column: &str) -> Option<SortSpec> {
    match current {
        Some(spec) if spec.column == column => match spec.order {
            SortOrder::Asc => Some(SortSpec {
                column: column.to_string(),
                order: SortOrder::Desc,
            }),
            SortOrder::Desc => None,
        },
        _ => Some(SortSpec {
            column: column.to_string(),
            order: SortOrder::Asc,
        }),
    }
}
