//! Eager-load planning.
//!
//! Each decorator class owns an [`EagerLoadPlanner`] whose tree accumulates the
//! class's own declarations and everything its associations need. At
//! decoration time the planner decides whether the repository should be asked
//! for a copy of the record with that tree included.

use std::fmt;

use crate::decorator::DecorationContext;
use crate::record::RecordRef;
use crate::repository::Repository;
use crate::schema::{SchemaSpec, SchemaTree};

/// Why a prefetch was not requested.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    /// The class declares no eager loads, or there is nothing to fetch.
    NothingToLoad,
    /// No repository is attached to the decoration context.
    NoRepository,
    /// The records already carry loaded associations.
    AssociationsLoaded,
    /// The parent decorator's tree already includes this association path.
    CoveredByParent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NothingToLoad => "nothing to load",
            Self::NoRepository => "no repository",
            Self::AssociationsLoaded => "associations already loaded",
            Self::CoveredByParent => "covered by parent",
        })
    }
}

/// Outcome of [`EagerLoadPlanner::plan_for`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrefetchDecision {
    /// Ask the repository for records with the planner's tree included.
    Prefetch,
    /// Use the records as they are.
    Skip(SkipReason),
}

impl PrefetchDecision {
    /// Returns `true` for [`PrefetchDecision::Prefetch`].
    #[must_use]
    pub const fn should_prefetch(self) -> bool {
        matches!(self, Self::Prefetch)
    }
}

/// Accumulated eager-load tree for one decorator class.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EagerLoadPlanner {
    tree: SchemaTree,
}

impl EagerLoadPlanner {
    /// Create a planner with an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: SchemaTree::new(),
        }
    }

    /// Fold `spec` into the tree.
    pub fn declare(&mut self, spec: SchemaSpec) {
        self.tree.merge_in(spec.into_tree());
    }

    /// The accumulated tree.
    #[must_use]
    pub const fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    /// Decide whether `records` should be re-fetched with the tree included.
    ///
    /// The check against loaded associations is coarse: a record counts as
    /// loaded when the repository reports any association cache for it. A
    /// collection is only considered loaded when every member is.
    #[must_use]
    pub fn plan_for(&self, records: &[RecordRef], context: &DecorationContext) -> PrefetchDecision {
        if records.is_empty() {
            return PrefetchDecision::Skip(SkipReason::NothingToLoad);
        }
        self.plan_with(context, |repository| {
            records
                .iter()
                .all(|record| repository.has_materialized_association_cache(record.as_ref()))
        })
    }

    /// Decide whether a record that has not been fetched yet should be
    /// fetched with the tree included.
    #[must_use]
    pub fn plan_for_fetch(&self, context: &DecorationContext) -> PrefetchDecision {
        self.plan_with(context, |_| false)
    }

    fn plan_with<F>(&self, context: &DecorationContext, already_loaded: F) -> PrefetchDecision
    where
        F: FnOnce(&dyn Repository) -> bool,
    {
        if self.tree.is_empty() {
            return PrefetchDecision::Skip(SkipReason::NothingToLoad);
        }
        let Some(repository) = context.repository() else {
            return PrefetchDecision::Skip(SkipReason::NoRepository);
        };
        if already_loaded(repository.as_ref()) {
            return PrefetchDecision::Skip(SkipReason::AssociationsLoaded);
        }
        if parent_covers(context) {
            return PrefetchDecision::Skip(SkipReason::CoveredByParent);
        }
        PrefetchDecision::Prefetch
    }
}

fn parent_covers(context: &DecorationContext) -> bool {
    context.parent().is_some_and(|parent| {
        parent
            .class()
            .eager_loads()
            .covers(parent.association_path())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};
    use serde_json::Value;

    use super::*;
    use crate::decorator::{DecoratorClass, ParentLink};
    use crate::error::{FetchError, TintResult};
    use crate::record::{Record, RecordId};
    use crate::repository::RepositoryRef;

    struct Cached;

    impl Repository for Cached {
        fn supports_includes(&self, _model: &str) -> bool {
            true
        }

        fn supports_find_by_id(&self, _model: &str) -> bool {
            true
        }

        fn has_materialized_association_cache(&self, record: &dyn Record) -> bool {
            record.field("loaded").is_some()
        }

        fn fetch_by_id(&self, model: &str, _id: &RecordId) -> Result<RecordRef, FetchError> {
            Err(format!("unexpected fetch of {model}").into())
        }

        fn fetch_by_id_with_includes(
            &self,
            model: &str,
            id: &RecordId,
            _includes: &SchemaTree,
        ) -> Result<RecordRef, FetchError> {
            self.fetch_by_id(model, id)
        }

        fn fetch_collection_with_includes(
            &self,
            model: &str,
            _records: &[RecordRef],
            _includes: &SchemaTree,
        ) -> Result<Vec<RecordRef>, FetchError> {
            Err(format!("unexpected fetch of {model}").into())
        }
    }

    struct Flagged(bool);

    impl Record for Flagged {
        fn model_name(&self) -> &str {
            "Row"
        }

        fn field(&self, name: &str) -> Option<Value> {
            (name == "loaded" && self.0).then_some(Value::Bool(true))
        }
    }

    #[fixture]
    fn planner() -> EagerLoadPlanner {
        let mut planner = EagerLoadPlanner::new();
        planner.declare(SchemaSpec::leaf("comments"));
        planner
    }

    fn repository() -> RepositoryRef {
        Arc::new(Cached)
    }

    fn rows(flags: &[bool]) -> Vec<RecordRef> {
        flags
            .iter()
            .map(|loaded| Arc::new(Flagged(*loaded)) as RecordRef)
            .collect()
    }

    #[rstest]
    fn empty_tree_never_prefetches() {
        let context = DecorationContext::new().with_repository(repository());
        assert_eq!(
            EagerLoadPlanner::new().plan_for(&rows(&[false]), &context),
            PrefetchDecision::Skip(SkipReason::NothingToLoad)
        );
    }

    #[rstest]
    fn missing_repository_skips(planner: EagerLoadPlanner) {
        assert_eq!(
            planner.plan_for(&rows(&[false]), &DecorationContext::new()),
            PrefetchDecision::Skip(SkipReason::NoRepository)
        );
    }

    #[rstest]
    #[case::none_loaded(&[false, false], PrefetchDecision::Prefetch)]
    #[case::some_loaded(&[true, false], PrefetchDecision::Prefetch)]
    #[case::all_loaded(&[true, true], PrefetchDecision::Skip(SkipReason::AssociationsLoaded))]
    fn association_cache_check_is_coarse(
        planner: EagerLoadPlanner,
        #[case] flags: &[bool],
        #[case] expected: PrefetchDecision,
    ) {
        let context = DecorationContext::new().with_repository(repository());
        assert_eq!(planner.plan_for(&rows(flags), &context), expected);
    }

    #[rstest]
    #[case::covered(&["comments"], PrefetchDecision::Skip(SkipReason::CoveredByParent))]
    #[case::not_covered(&["tags"], PrefetchDecision::Prefetch)]
    fn parent_tree_suppresses_prefetch(
        planner: EagerLoadPlanner,
        #[case] path: &[&str],
        #[case] expected: PrefetchDecision,
    ) -> TintResult<()> {
        let parent = DecoratorClass::builder("ParentDecorator")
            .eager_load(["comments"])
            .build()?;
        let context = DecorationContext::new()
            .with_repository(repository())
            .with_parent(ParentLink::new(parent, path.iter().copied()));
        assert_eq!(planner.plan_for(&rows(&[false]), &context), expected);
        Ok(())
    }

    #[rstest]
    fn unfetched_records_are_never_loaded(planner: EagerLoadPlanner) {
        let context = DecorationContext::new().with_repository(repository());
        assert!(planner.plan_for_fetch(&context).should_prefetch());
    }

    #[rstest]
    fn empty_collections_have_nothing_to_load(planner: EagerLoadPlanner) {
        let context = DecorationContext::new().with_repository(repository());
        assert_eq!(
            planner.plan_for(&[], &context),
            PrefetchDecision::Skip(SkipReason::NothingToLoad)
        );
    }
}
