//! Explicit name-to-class registry.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::TintResult;

use super::{DecoratorClass, DecoratorClassBuilder};

/// Decorator classes addressable by name.
///
/// Builders given a registry resolve association decorators named with
/// [`crate::AssociationOptions::with_name`] or inferred from the association
/// name. Classes must be registered before the classes that refer to them are
/// built.
#[derive(Clone, Debug, Default)]
pub struct DecoratorRegistry {
    classes: BTreeMap<String, DecoratorClass>,
}

impl DecoratorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class` under its own name, returning any class it replaces.
    pub fn register(&mut self, class: DecoratorClass) -> Option<DecoratorClass> {
        debug!(class = class.name(), "registering decorator class");
        self.classes.insert(class.name().to_owned(), class)
    }

    /// Look up a class by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DecoratorClass> {
        self.classes.get(name)
    }

    /// Returns `true` when a class called `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered class names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Build a class that resolves associations through this registry, then
    /// register it.
    ///
    /// # Errors
    ///
    /// Returns the builder's declaration errors; nothing is registered then.
    pub fn define<F>(&mut self, name: &str, declare: F) -> TintResult<DecoratorClass>
    where
        F: FnOnce(DecoratorClassBuilder) -> DecoratorClassBuilder,
    {
        let class = declare(DecoratorClass::builder(name).with_registry(self)).build()?;
        self.register(class.clone());
        Ok(class)
    }
}
