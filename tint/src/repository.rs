//! The data-access capability decorators call into.
//!
//! The crate never builds queries itself. When a decorator class has an
//! eager-load tree and the planner decides that a record should be re-fetched
//! with its associations included, the request is delegated to a
//! [`Repository`].

use std::sync::Arc;

use crate::error::FetchError;
use crate::record::{Record, RecordId, RecordRef};
use crate::schema::SchemaTree;

/// Shared handle to a repository.
pub type RepositoryRef = Arc<dyn Repository>;

/// Fetch operations backing eager loading.
pub trait Repository: Send + Sync {
    /// Whether `model` can be fetched with associations included.
    fn supports_includes(&self, model: &str) -> bool;

    /// Whether `model` can be fetched by primary key.
    fn supports_find_by_id(&self, model: &str) -> bool;

    /// Whether `record` already carries loaded associations.
    ///
    /// The check is coarse: any loaded association counts.
    fn has_materialized_association_cache(&self, record: &dyn Record) -> bool;

    /// Fetch a record by primary key.
    ///
    /// # Errors
    ///
    /// Returns the repository's error when the fetch fails.
    fn fetch_by_id(&self, model: &str, id: &RecordId) -> Result<RecordRef, FetchError>;

    /// Fetch a record by primary key with the associations in `includes`
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns the repository's error when the fetch fails.
    fn fetch_by_id_with_includes(
        &self,
        model: &str,
        id: &RecordId,
        includes: &SchemaTree,
    ) -> Result<RecordRef, FetchError>;

    /// Re-fetch a collection with the associations in `includes` loaded.
    ///
    /// # Errors
    ///
    /// Returns the repository's error when the fetch fails.
    fn fetch_collection_with_includes(
        &self,
        model: &str,
        records: &[RecordRef],
        includes: &SchemaTree,
    ) -> Result<Vec<RecordRef>, FetchError>;
}
