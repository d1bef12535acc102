//! The wrapped-record capability.
//!
//! Decorators never inspect records directly; they read members by name
//! through [`Record`]. Structs can implement it with `#[derive(Record)]`.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

/// Shared handle to a record.
pub type RecordRef = Arc<dyn Record>;

/// Identifier of a persisted record.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer primary key.
    Int(i64),
    /// Textual primary key such as a UUID.
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

/// Conversion from a struct member into a primary key.
///
/// Used by `#[derive(Record)]` for the member marked `#[tint(id)]` or named
/// `id`.
pub trait IntoRecordId {
    /// Convert the member, returning `None` for records that are not
    /// persisted.
    fn to_record_id(&self) -> Option<RecordId>;
}

macro_rules! int_record_id {
    ($($ty:ty),*) => {
        $(
            impl IntoRecordId for $ty {
                fn to_record_id(&self) -> Option<RecordId> {
                    Some(RecordId::Int(i64::from(*self)))
                }
            }
        )*
    };
}

int_record_id!(i64, i32, i16, u32, u16);

impl IntoRecordId for u64 {
    fn to_record_id(&self) -> Option<RecordId> {
        i64::try_from(*self).ok().map(RecordId::Int)
    }
}

impl IntoRecordId for String {
    fn to_record_id(&self) -> Option<RecordId> {
        Some(RecordId::Text(self.clone()))
    }
}

impl IntoRecordId for RecordId {
    fn to_record_id(&self) -> Option<RecordId> {
        Some(self.clone())
    }
}

impl<T: IntoRecordId> IntoRecordId for Option<T> {
    fn to_record_id(&self) -> Option<RecordId> {
        self.as_ref().and_then(IntoRecordId::to_record_id)
    }
}

/// Value reached by following an association.
#[derive(Clone)]
pub enum Related {
    /// A single related record.
    One(RecordRef),
    /// A homogeneous collection of related records.
    Many(Vec<RecordRef>),
}

impl Related {
    /// Returns `true` for collections.
    #[must_use]
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Flatten into a list of records.
    #[must_use]
    pub fn into_records(self) -> Vec<RecordRef> {
        match self {
            Self::One(record) => vec![record],
            Self::Many(records) => records,
        }
    }

    /// Keep only records matching `predicate`.
    ///
    /// A single record failing the predicate becomes an empty collection so
    /// scoped associations stay serializable.
    #[must_use]
    pub fn filter<F>(self, mut predicate: F) -> Self
    where
        F: FnMut(&dyn Record) -> bool,
    {
        match self {
            Self::One(record) if predicate(record.as_ref()) => Self::One(record),
            Self::One(_) => Self::Many(Vec::new()),
            Self::Many(records) => Self::Many(
                records
                    .into_iter()
                    .filter(|record| predicate(record.as_ref()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for Related {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(record) => f.debug_tuple("One").field(&record.model_name()).finish(),
            Self::Many(records) => f
                .debug_tuple("Many")
                .field(&records.iter().map(|r| r.model_name()).collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// A domain value that decorators can wrap.
///
/// Every accessor tolerates unknown names by returning `None`; a decorator
/// treats that as a missing value rather than an error.
pub trait Record: Send + Sync + 'static {
    /// Name of the model, used when asking a repository for capabilities.
    fn model_name(&self) -> &str;

    /// Primary key, when the record has been persisted.
    fn id(&self) -> Option<RecordId> {
        None
    }

    /// Read a plain member.
    fn field(&self, name: &str) -> Option<Value>;

    /// Read an association member.
    fn related(&self, name: &str) -> Option<Related> {
        let _ = name;
        None
    }

    /// Flat snapshot of the record's materialized attributes.
    ///
    /// Values present here are preferred over [`Record::field`] when
    /// projecting delegated and mapped attributes.
    fn attributes(&self) -> Option<Map<String, Value>> {
        None
    }
}

/// Conversion from a struct member into an association value.
///
/// Used by `#[derive(Record)]` for members marked `#[tint(association)]`.
pub trait IntoRelated {
    /// Convert the member, returning `None` when nothing is associated.
    fn to_related(&self) -> Option<Related>;
}

impl<T: Record> IntoRelated for Arc<T> {
    fn to_related(&self) -> Option<Related> {
        let record: RecordRef = Arc::clone(self) as RecordRef;
        Some(Related::One(record))
    }
}

impl IntoRelated for RecordRef {
    fn to_related(&self) -> Option<Related> {
        Some(Related::One(Arc::clone(self)))
    }
}

impl<T: IntoRelated> IntoRelated for Option<T> {
    fn to_related(&self) -> Option<Related> {
        self.as_ref().and_then(IntoRelated::to_related)
    }
}

impl<T: IntoRelated> IntoRelated for Vec<T> {
    fn to_related(&self) -> Option<Related> {
        Some(Related::Many(
            self.iter()
                .filter_map(IntoRelated::to_related)
                .flat_map(Related::into_records)
                .collect(),
        ))
    }
}

/// Serialize a struct member into a field value.
///
/// `null` results are reported as absent so optional members disappear from
/// projections.
#[must_use]
pub fn field_value<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(Value::Null) => None,
        Ok(serialized) => Some(serialized),
        Err(err) => {
            tracing::warn!(error = %err, "record member could not be serialized");
            None
        }
    }
}
