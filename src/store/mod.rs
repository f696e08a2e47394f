use thiserror::Error;

use crate::api::{ApiClient, FetchError};
use crate::model::Resource;
use crate::session::Session;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("operation not permitted for the current role")]
    Unauthorized,

    #[error("no record with id {id}")]
    NotFound { id: i64 },

    #[error(transparent)]
    Remote(#[from] FetchError),
}

/// Whether an operation reached the API or was satisfied locally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    Remote,
    Fallback,
}

/// Local mirror of one remote collection plus the sync operations that are
/// allowed to mutate it. Records stay unique by id across every operation;
/// derived views are computed elsewhere and never touch the mirror's order.
#[derive(Clone, Debug, Default)]
pub struct Store<R: Resource> {
    records: Vec<R>,
}

impl<R: Resource> Store<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Seed the mirror, de-duplicating by id (last write wins) while
    /// preserving first-seen order.
    pub fn with_records(records: Vec<R>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn replace_all(&mut self, records: Vec<R>) {
        self.records.clear();
        for record in records {
            self.insert(record);
        }
    }

    fn insert(&mut self, record: R) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    fn remove(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }

    /// Identifier for a record fabricated while the API is down.
    pub fn next_local_id(&self) -> i64 {
        self.records.iter().map(Resource::id).max().unwrap_or(0) + 1
    }

    fn guard(&self, session: &Session) -> Result<(), SyncError> {
        if R::GUARDED && session.is_restricted() {
            return Err(SyncError::Unauthorized);
        }
        Ok(())
    }

    /// Fetch the full collection and replace the mirror. On failure the
    /// mirror is left as-is and the error is returned; substituting demo
    /// data is the caller's decision (see [`Store::load_demo`]).
    pub async fn load(&mut self, api: &ApiClient, session: &Session) -> Result<usize, FetchError> {
        let records = api.list::<R>(session.token()).await?;
        self.replace_all(records);
        Ok(self.records.len())
    }

    pub fn load_demo(&mut self, fallback: Vec<R>) {
        self.replace_all(fallback);
    }

    /// Create a record. When the API cannot answer, a local record is
    /// fabricated with id `max(existing, 0) + 1` and the operation still
    /// reports success, flagged as a fallback.
    pub async fn create(
        &mut self,
        api: &ApiClient,
        session: &Session,
        mut record: R,
    ) -> Result<(i64, SyncMode), SyncError> {
        self.guard(session)?;
        match api.create(session.token(), &record).await {
            Ok(created) => {
                let id = created.id();
                self.insert(created);
                Ok((id, SyncMode::Remote))
            }
            Err(_) => {
                let id = self.next_local_id();
                record.set_id(id);
                self.insert(record);
                Ok((id, SyncMode::Fallback))
            }
        }
    }

    /// Merge `patch` over the current record and PUT the result. Remote
    /// failure is surfaced and the mirror is not touched: a local merge
    /// without server confirmation would drift silently.
    pub async fn update(
        &mut self,
        api: &ApiClient,
        session: &Session,
        id: i64,
        patch: &R::Patch,
    ) -> Result<R, SyncError> {
        self.guard(session)?;
        let mut merged = self
            .get(id)
            .cloned()
            .ok_or(SyncError::NotFound { id })?;
        merged.merge(patch);
        let updated = api.update(session.token(), &merged).await?;
        self.insert(updated.clone());
        Ok(updated)
    }

    /// Delete a record. The mirror entry goes away whether or not the API
    /// call succeeded, so a dead backend never leaves ghosts in the list.
    pub async fn delete(
        &mut self,
        api: &ApiClient,
        session: &Session,
        id: i64,
    ) -> Result<SyncMode, SyncError> {
        self.guard(session)?;
        let mode = match api.delete::<R>(session.token(), id).await {
            Ok(()) => SyncMode::Remote,
            Err(_) => SyncMode::Fallback,
        };
        self.remove(id);
        Ok(mode)
    }
}
