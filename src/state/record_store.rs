use crate::state::data_model::{ColumnSet, Record, RecordId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    UnknownIdentity(RecordId),
    DuplicateIdentity(RecordId),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentity(id) => write!(f, "no record with id {id}"),
            Self::DuplicateIdentity(id) => write!(f, "a record with id {id} already exists"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Canonical ordered sequence of records for one loaded dataset.
///
/// `revision` increases on every mutation so derived views can tell whether
/// they are stale.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RecordStore {
    columns: ColumnSet,
    records: Vec<Record>,
    next_id: u64,
    revision: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole dataset. The id counter restarts at `records.len()`
    /// or past the largest loaded id, whichever is greater.
    pub fn load(&mut self, records: Vec<Record>, columns: ColumnSet) {
        let past_max = records.iter().map(|r| r.id.0 + 1).max().unwrap_or(0);
        self.next_id = (records.len() as u64).max(past_max);
        self.records = records;
        self.columns = columns;
        self.revision += 1;
        tracing::info!(
            records = self.records.len(),
            columns = self.columns.len(),
            "loaded dataset"
        );
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn next_id(&self) -> RecordId {
        RecordId(self.next_id)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    /// Mints a blank record with a fresh id. Not appended until committed.
    pub fn create(&mut self) -> Record {
        let id = self.mint_id();
        Record::blank(id, &self.columns)
    }

    /// Copies every value of `source` under a fresh id. Not appended until
    /// committed.
    pub fn duplicate(&mut self, source: &Record) -> Record {
        let id = self.mint_id();
        let values = self
            .columns
            .iter()
            .map(|column| (column.to_string(), source.value(column).to_string()))
            .collect();
        Record::new(id, values)
    }

    /// Appends a record minted by `create` or `duplicate`.
    pub fn append(&mut self, record: Record) -> Result<(), StoreError> {
        if self.position_of(record.id).is_some() {
            return Err(StoreError::DuplicateIdentity(record.id));
        }
        if record.id.0 >= self.next_id {
            self.next_id = record.id.0 + 1;
        }
        self.records.push(record);
        self.revision += 1;
        Ok(())
    }

    /// Replaces the record with `id` in place, keeping its position.
    ///
    /// The stored id always stays `id`, whatever `record.id` says. A missing
    /// id leaves the sequence untouched.
    pub fn replace(&mut self, id: RecordId, mut record: Record) -> Result<(), StoreError> {
        let Some(index) = self.position_of(id) else {
            return Err(StoreError::UnknownIdentity(id));
        };
        record.id = id;
        self.records[index] = record;
        self.revision += 1;
        Ok(())
    }

    fn mint_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }
}
