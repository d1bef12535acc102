//! Declared associations and their decoration-time resolution.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::casing::KeyCasing;
use crate::decorator::{DecorationContext, Decorator, DecoratorClass};
use crate::error::TintResult;
use crate::record::{RecordRef, Related};
use crate::schema::SchemaTree;

use super::Scope;

/// Decorated value produced by resolving an association.
#[derive(Debug)]
pub enum Decorated {
    /// A single decorated record.
    One(Decorator),
    /// A decorated collection.
    Many(Vec<Decorator>),
}

impl Decorated {
    /// Project the decorated value with `casing`.
    ///
    /// # Errors
    ///
    /// Propagates failures raised while resolving nested associations.
    pub fn as_json_with(&self, casing: KeyCasing) -> TintResult<Value> {
        match self {
            Self::One(decorator) => decorator.as_json_with(casing),
            Self::Many(decorators) => decorators
                .iter()
                .map(|decorator| decorator.as_json_with(casing))
                .collect::<TintResult<Vec<_>>>()
                .map(Value::Array),
        }
    }

    /// The single decorator, when this is not a collection.
    #[must_use]
    pub const fn as_one(&self) -> Option<&Decorator> {
        match self {
            Self::One(decorator) => Some(decorator),
            Self::Many(_) => None,
        }
    }

    /// The decorated collection, when this is one.
    #[must_use]
    pub fn as_many(&self) -> Option<&[Decorator]> {
        match self {
            Self::One(_) => None,
            Self::Many(decorators) => Some(decorators),
        }
    }
}

impl Serialize for Decorated {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_json_with(crate::casing::key_casing())
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

/// Class that decorates an association's value.
#[derive(Clone)]
pub(crate) enum Target {
    /// A class built beforehand.
    Class(DecoratorClass),
    /// The class declaring the association.
    Declaring,
}

/// A declared association: where the value lives, how it is exposed, and
/// which class decorates it.
#[derive(Clone)]
pub struct AssociationBinding {
    path: Vec<String>,
    alias: String,
    target: Target,
    scope: Option<Scope>,
    context: Map<String, Value>,
}

impl AssociationBinding {
    pub(crate) const fn new(
        path: Vec<String>,
        alias: String,
        target: Target,
        scope: Option<Scope>,
        context: Map<String, Value>,
    ) -> Self {
        Self {
            path,
            alias,
            target,
            scope,
            context,
        }
    }

    /// Members followed from the wrapped record.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Attribute name the association is exposed under.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Class decorating the associated value, or `None` when the declaring
    /// class decorates it.
    #[must_use]
    pub const fn decorator(&self) -> Option<&DecoratorClass> {
        match &self.target {
            Target::Class(class) => Some(class),
            Target::Declaring => None,
        }
    }

    /// Eager-load requirement contributed to the declaring class: the child
    /// class's tree nested under this association's path.
    ///
    /// A self-decorated association contributes a leaf at its path.
    #[must_use]
    pub fn schema(&self) -> SchemaTree {
        let nested = match &self.target {
            Target::Class(class) => class.eager_loads().clone(),
            Target::Declaring => SchemaTree::new(),
        };
        SchemaTree::nest_under(self.path.iter().cloned(), nested)
    }

    /// Follow the path from `owner`'s record and decorate what is found.
    pub(crate) fn resolve(&self, owner: &Decorator) -> TintResult<Option<Decorated>> {
        tracing::trace!(
            class = owner.class().name(),
            association = %self.alias,
            "resolving association"
        );
        let Some(raw) = follow(owner.object(), &self.path) else {
            return Ok(None);
        };
        let scoped = match &self.scope {
            Some(scope) => scope(raw),
            None => raw,
        };
        let context = owner
            .context()
            .for_association(owner.class(), &self.path, &self.context);
        let class = self.decorator().unwrap_or_else(|| owner.class());
        decorate_related(class, scoped, context).map(Some)
    }
}

impl fmt::Debug for AssociationBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssociationBinding")
            .field("path", &self.path)
            .field("alias", &self.alias)
            .field("decorator", &self.decorator().map(DecoratorClass::name))
            .field("scope", &self.scope.is_some())
            .finish_non_exhaustive()
    }
}

/// Decorate a single related record or a collection with `class`.
pub(crate) fn decorate_related(
    class: &DecoratorClass,
    related: Related,
    context: DecorationContext,
) -> TintResult<Decorated> {
    match related {
        Related::One(record) => class.decorate(record, context).map(Decorated::One),
        Related::Many(records) => class
            .decorate_collection(records, context)
            .map(Decorated::Many),
    }
}

/// Walk `path` through association members; collections flatten.
fn follow(root: &RecordRef, path: &[String]) -> Option<Related> {
    path.iter()
        .try_fold(Related::One(Arc::clone(root)), |current, segment| match current {
            Related::One(record) => record.related(segment),
            Related::Many(records) => Some(Related::Many(
                records
                    .iter()
                    .filter_map(|record| record.related(segment))
                    .flat_map(Related::into_records)
                    .collect(),
            )),
        })
}
