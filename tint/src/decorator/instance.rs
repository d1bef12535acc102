//! Decorated record instances and their JSON projection.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::association::{AssociationPath, Decorated, decorate_related};
use crate::attributes::{AttributeDescriptor, AttributeKind, Method};
use crate::casing::{KeyCasing, key_casing};
use crate::error::{TintError, TintResult};
use crate::record::{RecordRef, Related};

use super::json::sanitize;
use super::{DecorationContext, DecoratorClass};

/// A record wrapped by a decorator class.
///
/// Association attributes are resolved on first access and memoized for the
/// lifetime of the instance, so repeated projections never follow an
/// association twice.
pub struct Decorator {
    class: DecoratorClass,
    object: RecordRef,
    snapshot: Map<String, Value>,
    context: DecorationContext,
    associations: Box<[OnceLock<Option<Decorated>>]>,
}

impl Decorator {
    pub(super) fn new(class: DecoratorClass, object: RecordRef, context: DecorationContext) -> Self {
        let snapshot = object.attributes().unwrap_or_default();
        let associations = class
            .associations()
            .iter()
            .map(|_| OnceLock::new())
            .collect();
        Self {
            class,
            object,
            snapshot,
            context,
            associations,
        }
    }

    /// Class this instance was decorated with.
    #[must_use]
    pub const fn class(&self) -> &DecoratorClass {
        &self.class
    }

    /// The wrapped record.
    #[must_use]
    pub const fn object(&self) -> &RecordRef {
        &self.object
    }

    /// Context the instance was decorated with.
    #[must_use]
    pub const fn context(&self) -> &DecorationContext {
        &self.context
    }

    /// Attribute snapshot taken when the instance was created.
    #[must_use]
    pub const fn snapshot(&self) -> &Map<String, Value> {
        &self.snapshot
    }

    /// Names present in the attribute snapshot.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.snapshot.keys().map(String::as_str).collect()
    }

    /// Returns `true` when the wrapped record has a primary key.
    #[must_use]
    pub fn persisted(&self) -> bool {
        self.object.id().is_some()
    }

    /// Read a member of the wrapped record, preferring the snapshot.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        match self.snapshot.get(name) {
            Some(value) if !value.is_null() => Some(value.clone()),
            _ => self.object.field(name),
        }
    }

    /// Resolve the association exposed under `alias`.
    ///
    /// Returns `Ok(None)` when no such association is declared or the record
    /// has nothing associated.
    ///
    /// # Errors
    ///
    /// Propagates repository failures raised while decorating the associated
    /// value.
    pub fn association(&self, alias: &str) -> TintResult<Option<&Decorated>> {
        self.class
            .associations()
            .iter()
            .position(|binding| binding.alias() == alias)
            .map_or(Ok(None), |index| self.association_at(index))
    }

    fn association_at(&self, index: usize) -> TintResult<Option<&Decorated>> {
        let (Some(slot), Some(binding)) = (
            self.associations.get(index),
            self.class.associations().get(index),
        ) else {
            return Ok(None);
        };
        if let Some(resolved) = slot.get() {
            return Ok(resolved.as_ref());
        }
        let fresh = binding.resolve(self)?;
        Ok(slot.get_or_init(|| fresh).as_ref())
    }

    /// Decorate `related` with `class` as though it were reached through the
    /// association path `target`.
    ///
    /// Meant for computed attributes that pick their related value at
    /// runtime. The child context links back to this instance's class and
    /// carries this instance's data. Neither class's eager-load tree changes.
    ///
    /// # Errors
    ///
    /// Propagates repository failures raised while decorating `related`.
    pub fn decorate_as_association(
        &self,
        target: impl Into<AssociationPath>,
        class: &DecoratorClass,
        related: Related,
    ) -> TintResult<Decorated> {
        let path: AssociationPath = target.into();
        let context = self
            .context
            .for_association(&self.class, path.segments(), &Map::new());
        decorate_related(class, related, context)
    }

    /// Resolve one declared attribute under the current casing.
    ///
    /// # Errors
    ///
    /// Propagates failures from computed attributes and associations.
    pub fn attribute(&self, name: &str) -> TintResult<Option<Value>> {
        self.class
            .attributes()
            .get(name)
            .map_or(Ok(None), |descriptor| self.resolve(descriptor, key_casing()))
    }

    /// Project the instance using the process-wide casing.
    ///
    /// # Errors
    ///
    /// Propagates failures from computed attributes and associations.
    pub fn as_json(&self) -> TintResult<Value> {
        self.as_json_with(key_casing())
    }

    /// Project the instance with an explicit casing.
    ///
    /// Keys follow declaration order. Absent and `null` values are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`TintError::KeyCollision`] when two attributes produce the
    /// same key under `casing`, and propagates failures from computed
    /// attributes and associations.
    pub fn as_json_with(&self, casing: KeyCasing) -> TintResult<Value> {
        let mut keys = BTreeSet::new();
        let mut projected = Map::new();
        for descriptor in self.class.attributes() {
            let key = casing.transform(descriptor.name());
            if !keys.insert(key.clone()) {
                return Err(TintError::KeyCollision {
                    class: self.class.name().to_owned(),
                    key,
                });
            }
            if let Some(value) = self.resolve(descriptor, casing)? {
                projected.insert(key, value);
            }
        }
        Ok(Value::Object(projected))
    }

    fn resolve(&self, descriptor: &AttributeDescriptor, casing: KeyCasing) -> TintResult<Option<Value>> {
        let value = match descriptor.kind() {
            AttributeKind::Delegated => self.field(descriptor.name()).map(sanitize),
            AttributeKind::Mapped { source } => self.field(source).map(sanitize),
            AttributeKind::Overridden => match self.class.attributes().method(descriptor.name()) {
                Some(Method::Computed(compute)) => compute(self)?.map(sanitize),
                Some(Method::Association(index)) => self
                    .association_at(*index)?
                    .map(|decorated| decorated.as_json_with(casing))
                    .transpose()?,
                None => None,
            },
        };
        Ok(value.filter(|resolved| !resolved.is_null()))
    }
}

impl Serialize for Decorator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("class", &self.class.name())
            .field("model", &self.object.model_name())
            .field("id", &self.object.id())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
