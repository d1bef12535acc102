//! In-memory repository that records every fetch.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tint::schema::SchemaTree;
use tint::{FetchError, Record, RecordId, RecordRef, Repository};

/// One fetch issued against a [`MemoryRepository`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    /// `fetch_by_id`.
    FetchById {
        /// Requested model.
        model: String,
        /// Requested key.
        id: RecordId,
    },
    /// `fetch_by_id_with_includes`.
    FetchByIdWithIncludes {
        /// Requested model.
        model: String,
        /// Requested key.
        id: RecordId,
        /// Tree passed as includes.
        includes: SchemaTree,
    },
    /// `fetch_collection_with_includes`.
    FetchCollectionWithIncludes {
        /// Requested model.
        model: String,
        /// Number of records in the request.
        count: usize,
        /// Tree passed as includes.
        includes: SchemaTree,
    },
}

/// Repository serving records stored in memory.
///
/// Fetches return the stored record with the same model and key, so tests can
/// observe that a decorator replaced its record with the fetched copy.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use test_helpers::{DynamicRecord, MemoryRepository};
/// use tint::{RecordId, Repository};
///
/// let repository = MemoryRepository::new()
///     .with_record(Arc::new(DynamicRecord::new("Post").with_id(1)));
/// assert!(repository.fetch_by_id("Post", &RecordId::Int(1)).is_ok());
/// assert_eq!(repository.calls().len(), 1);
/// ```
#[derive(Default)]
pub struct MemoryRepository {
    records: BTreeMap<(String, RecordId), RecordRef>,
    without_includes: BTreeSet<String>,
    without_find_by_id: BTreeSet<String>,
    loaded: Mutex<BTreeSet<(String, RecordId)>>,
    failure: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl MemoryRepository {
    /// Empty repository supporting every capability.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under its model and key. Records without a key are
    /// ignored.
    #[must_use]
    pub fn with_record(mut self, record: RecordRef) -> Self {
        if let Some(id) = record.id() {
            self.records
                .insert((record.model_name().to_owned(), id), record);
        }
        self
    }

    /// Report that `model` cannot be fetched with includes.
    #[must_use]
    pub fn without_includes(mut self, model: &str) -> Self {
        self.without_includes.insert(model.to_owned());
        self
    }

    /// Report that `model` cannot be fetched by key.
    #[must_use]
    pub fn without_find_by_id(mut self, model: &str) -> Self {
        self.without_find_by_id.insert(model.to_owned());
        self
    }

    /// Make every fetch fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_owned());
        self
    }

    /// Report an association cache for `record` from now on.
    pub fn mark_loaded(&self, record: &dyn Record) {
        if let Some(id) = record.id() {
            self.loaded
                .lock()
                .insert((record.model_name().to_owned(), id));
        }
    }

    /// Fetches issued so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn check(&self) -> Result<(), FetchError> {
        self.failure
            .as_ref()
            .map_or(Ok(()), |message| Err(message.clone().into()))
    }

    fn find(&self, model: &str, id: &RecordId) -> Result<RecordRef, FetchError> {
        self.records
            .get(&(model.to_owned(), id.clone()))
            .map(Arc::clone)
            .ok_or_else(|| format!("{model} {id} not found").into())
    }
}

impl Repository for MemoryRepository {
    fn supports_includes(&self, model: &str) -> bool {
        !self.without_includes.contains(model)
    }

    fn supports_find_by_id(&self, model: &str) -> bool {
        !self.without_find_by_id.contains(model)
    }

    fn has_materialized_association_cache(&self, record: &dyn Record) -> bool {
        record.id().is_some_and(|id| {
            self.loaded
                .lock()
                .contains(&(record.model_name().to_owned(), id))
        })
    }

    fn fetch_by_id(&self, model: &str, id: &RecordId) -> Result<RecordRef, FetchError> {
        self.calls.lock().push(Call::FetchById {
            model: model.to_owned(),
            id: id.clone(),
        });
        self.check()?;
        self.find(model, id)
    }

    fn fetch_by_id_with_includes(
        &self,
        model: &str,
        id: &RecordId,
        includes: &SchemaTree,
    ) -> Result<RecordRef, FetchError> {
        self.calls.lock().push(Call::FetchByIdWithIncludes {
            model: model.to_owned(),
            id: id.clone(),
            includes: includes.clone(),
        });
        self.check()?;
        self.find(model, id)
    }

    fn fetch_collection_with_includes(
        &self,
        model: &str,
        records: &[RecordRef],
        includes: &SchemaTree,
    ) -> Result<Vec<RecordRef>, FetchError> {
        self.calls.lock().push(Call::FetchCollectionWithIncludes {
            model: model.to_owned(),
            count: records.len(),
            includes: includes.clone(),
        });
        self.check()?;
        Ok(records
            .iter()
            .map(|record| {
                record
                    .id()
                    .and_then(|id| self.records.get(&(model.to_owned(), id)))
                    .map_or_else(|| Arc::clone(record), Arc::clone)
            })
            .collect())
    }
}
