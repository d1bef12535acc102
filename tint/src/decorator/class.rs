//! Immutable decorator class descriptors and request-time orchestration.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::association::AssociationBinding;
use crate::attributes::AttributeRegistry;
use crate::error::{TintError, TintResult};
use crate::planner::{EagerLoadPlanner, PrefetchDecision};
use crate::record::{RecordId, RecordRef};
use crate::repository::RepositoryRef;
use crate::schema::SchemaTree;

use super::{DecorationContext, Decorator, DecoratorClassBuilder};

pub(super) struct ClassInner {
    pub(super) name: String,
    pub(super) attributes: AttributeRegistry,
    pub(super) planner: EagerLoadPlanner,
    pub(super) associations: Vec<AssociationBinding>,
}

/// Shared handle to a built decorator class.
///
/// Cloning is cheap; every clone refers to the same immutable declarations.
#[derive(Clone)]
pub struct DecoratorClass(Arc<ClassInner>);

impl DecoratorClass {
    /// Start declaring a class called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DecoratorClassBuilder {
        DecoratorClassBuilder::new(name)
    }

    pub(super) fn from_inner(inner: ClassInner) -> Self {
        Self(Arc::new(inner))
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Declared attributes.
    #[must_use]
    pub fn attributes(&self) -> &AttributeRegistry {
        &self.0.attributes
    }

    /// Eager-load planner.
    #[must_use]
    pub fn planner(&self) -> &EagerLoadPlanner {
        &self.0.planner
    }

    /// Accumulated eager-load tree, including every association's needs.
    #[must_use]
    pub fn eager_loads(&self) -> &SchemaTree {
        self.0.planner.tree()
    }

    /// Declared associations in declaration order.
    #[must_use]
    pub fn associations(&self) -> &[AssociationBinding] {
        &self.0.associations
    }

    /// Returns `true` when both handles refer to the same class.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Decorate one record.
    ///
    /// When the planner asks for a prefetch and the repository can fetch the
    /// record's model by id with includes, the record is replaced by a copy
    /// loaded with this class's eager-load tree.
    ///
    /// # Errors
    ///
    /// Returns [`TintError::Fetch`] when the repository fails.
    pub fn decorate(&self, record: RecordRef, context: DecorationContext) -> TintResult<Decorator> {
        let decision = self
            .planner()
            .plan_for(std::slice::from_ref(&record), &context);
        let wrapped = match (decision, context.repository()) {
            (PrefetchDecision::Prefetch, Some(repository)) => {
                self.prefetch_one(repository, record)?
            }
            (skipped, _) => {
                log_skip(self.name(), skipped);
                record
            }
        };
        Ok(Decorator::new(self.clone(), wrapped, context))
    }

    /// Decorate a homogeneous collection.
    ///
    /// The prefetch decision is taken once for the whole collection and
    /// served by a single bulk fetch.
    ///
    /// # Errors
    ///
    /// Returns [`TintError::Fetch`] when the repository fails.
    pub fn decorate_collection(
        &self,
        records: Vec<RecordRef>,
        context: DecorationContext,
    ) -> TintResult<Vec<Decorator>> {
        let decision = self.planner().plan_for(&records, &context);
        let wrapped = match (decision, context.repository()) {
            (PrefetchDecision::Prefetch, Some(repository)) => {
                self.prefetch_many(repository, records)?
            }
            (skipped, _) => {
                log_skip(self.name(), skipped);
                records
            }
        };
        Ok(wrapped
            .into_iter()
            .map(|record| Decorator::new(self.clone(), record, context.clone()))
            .collect())
    }

    /// Fetch `model` by `id` through the context's repository and decorate
    /// it.
    ///
    /// The eager-load tree is included when the planner asks for it and the
    /// repository supports both includes and lookup by id for `model`;
    /// otherwise a plain fetch by id is issued.
    ///
    /// # Errors
    ///
    /// Returns [`TintError::MissingRepository`] without a repository and
    /// [`TintError::Fetch`] when the repository fails.
    pub fn decorate_id(
        &self,
        model: &str,
        id: &RecordId,
        context: DecorationContext,
    ) -> TintResult<Decorator> {
        let Some(repository) = context.repository() else {
            return Err(TintError::MissingRepository {
                model: model.to_owned(),
            });
        };
        let decision = self.planner().plan_for_fetch(&context);
        let fetched = if decision.should_prefetch()
            && repository.supports_includes(model)
            && repository.supports_find_by_id(model)
        {
            debug!(class = self.name(), model, %id, "fetching by id with includes");
            repository.fetch_by_id_with_includes(model, id, self.eager_loads())
        } else {
            log_skip(self.name(), decision);
            repository.fetch_by_id(model, id)
        };
        let record = fetched.map_err(|source| TintError::fetch(model, source))?;
        Ok(Decorator::new(self.clone(), record, context))
    }

    fn prefetch_one(&self, repository: &RepositoryRef, record: RecordRef) -> TintResult<RecordRef> {
        let model = record.model_name().to_owned();
        let key = match record.id() {
            Some(id)
                if repository.supports_includes(&model)
                    && repository.supports_find_by_id(&model) =>
            {
                id
            }
            _ => {
                debug!(class = self.name(), model = %model, "repository cannot prefetch record");
                return Ok(record);
            }
        };
        debug!(class = self.name(), model = %model, id = %key, "prefetching record with includes");
        repository
            .fetch_by_id_with_includes(&model, &key, self.eager_loads())
            .map_err(|source| TintError::fetch(model, source))
    }

    fn prefetch_many(
        &self,
        repository: &RepositoryRef,
        records: Vec<RecordRef>,
    ) -> TintResult<Vec<RecordRef>> {
        let Some(model) = records.first().map(|record| record.model_name().to_owned()) else {
            return Ok(records);
        };
        if !repository.supports_includes(&model) {
            debug!(class = self.name(), model = %model, "repository cannot prefetch collection");
            return Ok(records);
        }
        debug!(
            class = self.name(),
            model = %model,
            count = records.len(),
            "prefetching collection with includes"
        );
        repository
            .fetch_collection_with_includes(&model, &records, self.eager_loads())
            .map_err(|source| TintError::fetch(model, source))
    }
}

fn log_skip(class: &str, decision: PrefetchDecision) {
    if let PrefetchDecision::Skip(reason) = decision {
        debug!(class, %reason, "prefetch skipped");
    }
}

impl fmt::Debug for DecoratorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorClass")
            .field("name", &self.0.name)
            .field("attributes", &self.0.attributes)
            .field("eager_loads", self.0.planner.tree())
            .field("associations", &self.0.associations)
            .finish()
    }
}
