use crate::state::data_model::{Record, RecordId};
use crate::state::record_store::{RecordStore, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftMode {
    Creating,
    Duplicating,
    EditingExisting,
}

impl DraftMode {
    /// Whether committing appends rather than replaces.
    pub fn appends(self) -> bool {
        matches!(self, Self::Creating | Self::Duplicating)
    }
}

/// Working copy of one record. The id is fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    mode: DraftMode,
    record: Record,
}

impl Draft {
    pub fn mode(&self) -> DraftMode {
        self.mode
    }

    pub fn id(&self) -> RecordId {
        self.record.id
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditError {
    SessionActive,
    NotDrafting,
    UnknownIdentity(RecordId),
    UnknownColumn(String),
    BlankRecord,
    Store(StoreError),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionActive => write!(f, "another row is already being edited"),
            Self::NotDrafting => write!(f, "no row is being edited"),
            Self::UnknownIdentity(id) => write!(f, "row {id} no longer exists"),
            Self::UnknownColumn(column) => write!(f, "unknown column '{column}'"),
            Self::BlankRecord => write!(f, "a row needs at least one non-empty value"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EditError {}

impl From<StoreError> for EditError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UnknownIdentity(id) => Self::UnknownIdentity(id),
            other => Self::Store(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Appended(RecordId),
    Replaced(RecordId),
}

/// At most one draft at a time; nothing reaches the store before commit.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Drafting(Draft),
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Drafting(_))
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Drafting(draft) => Some(draft),
            Self::Idle => None,
        }
    }

    pub fn begin_create(&mut self, store: &mut RecordStore) -> Result<&Draft, EditError> {
        self.ensure_idle()?;
        let record = store.create();
        self.open(DraftMode::Creating, record)
    }

    pub fn begin_duplicate(
        &mut self,
        store: &mut RecordStore,
        source: RecordId,
    ) -> Result<&Draft, EditError> {
        self.ensure_idle()?;
        let source = store
            .get(source)
            .cloned()
            .ok_or(EditError::UnknownIdentity(source))?;
        let record = store.duplicate(&source);
        self.open(DraftMode::Duplicating, record)
    }

    pub fn begin_edit(&mut self, store: &RecordStore, id: RecordId) -> Result<&Draft, EditError> {
        self.ensure_idle()?;
        let record = store.get(id).cloned().ok_or(EditError::UnknownIdentity(id))?;
        self.open(DraftMode::EditingExisting, record)
    }

    /// Changes one value of the draft. Columns must already exist.
    pub fn set_field(&mut self, column: &str, value: impl Into<String>) -> Result<(), EditError> {
        let Self::Drafting(draft) = self else {
            return Err(EditError::NotDrafting);
        };
        let Some(slot) = draft.record.values.get_mut(column) else {
            return Err(EditError::UnknownColumn(column.to_string()));
        };
        *slot = value.into();
        Ok(())
    }

    /// Discards the draft, returning it if there was one.
    pub fn cancel(&mut self) -> Option<Draft> {
        match std::mem::take(self) {
            Self::Drafting(draft) => {
                tracing::debug!(id = %draft.id(), mode = ?draft.mode, "draft discarded");
                Some(draft)
            }
            Self::Idle => None,
        }
    }

    /// Writes the draft back into `store`.
    ///
    /// A blank draft is refused and stays open. A draft whose target vanished
    /// closes the session without touching the store.
    pub fn commit(&mut self, store: &mut RecordStore) -> Result<CommitOutcome, EditError> {
        match self {
            Self::Idle => return Err(EditError::NotDrafting),
            Self::Drafting(draft) if draft.record.is_blank() => return Err(EditError::BlankRecord),
            Self::Drafting(_) => {}
        }
        let Self::Drafting(draft) = std::mem::take(self) else {
            return Err(EditError::NotDrafting);
        };

        let id = draft.id();
        let result = if draft.mode.appends() {
            store.append(draft.record).map(|()| CommitOutcome::Appended(id))
        } else {
            store
                .replace(id, draft.record)
                .map(|()| CommitOutcome::Replaced(id))
        };

        match result {
            Ok(outcome) => {
                tracing::info!(?outcome, "draft committed");
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "draft commit dropped");
                Err(err.into())
            }
        }
    }

    fn ensure_idle(&self) -> Result<(), EditError> {
        if self.is_active() {
            Err(EditError::SessionActive)
        } else {
            Ok(())
        }
    }

    fn open(&mut self, mode: DraftMode, record: Record) -> Result<&Draft, EditError> {
        tracing::debug!(id = %record.id, ?mode, "draft opened");
        *self = Self::Drafting(Draft { mode, record });
        self.draft().ok_or(EditError::NotDrafting)
    }
}
