//! A record whose members are declared at runtime.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Map, Value};
use tint::{Record, RecordId, RecordRef, Related};

/// Record with runtime-declared fields and associations.
///
/// Every call to [`Record::related`] is counted so tests can assert that an
/// association was followed at most once.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use test_helpers::DynamicRecord;
/// use tint::Record;
///
/// let record = DynamicRecord::new("Post").with_field("title", json!("Hello"));
/// assert_eq!(record.field("title"), Some(json!("Hello")));
/// assert_eq!(record.field("missing"), None);
/// ```
#[derive(Debug, Default)]
pub struct DynamicRecord {
    model: String,
    id: Option<RecordId>,
    fields: Map<String, Value>,
    related: BTreeMap<String, Related>,
    snapshot: Option<Map<String, Value>>,
    related_calls: AtomicUsize,
}

impl DynamicRecord {
    /// Record of `model` with no members.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Give the record a primary key.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a plain member.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_owned(), value);
        self
    }

    /// Add a single-record association.
    #[must_use]
    pub fn with_one(mut self, name: &str, record: RecordRef) -> Self {
        self.related.insert(name.to_owned(), Related::One(record));
        self
    }

    /// Add a collection association.
    #[must_use]
    pub fn with_many(mut self, name: &str, records: Vec<RecordRef>) -> Self {
        self.related.insert(name.to_owned(), Related::Many(records));
        self
    }

    /// Report `snapshot` from [`Record::attributes`].
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: Map<String, Value>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Number of times [`Record::related`] has been called.
    #[must_use]
    pub fn related_calls(&self) -> usize {
        self.related_calls.load(Ordering::SeqCst)
    }

    /// Wrap the record in a shared handle.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Record for DynamicRecord {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn id(&self) -> Option<RecordId> {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).filter(|v| !v.is_null()).cloned()
    }

    fn related(&self, name: &str) -> Option<Related> {
        self.related_calls.fetch_add(1, Ordering::SeqCst);
        self.related.get(name).cloned()
    }

    fn attributes(&self) -> Option<Map<String, Value>> {
        self.snapshot.clone()
    }
}
