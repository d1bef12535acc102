//! Options accepted by association declarations.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::decorator::DecoratorClass;
use crate::record::Related;

/// Filter applied to the raw associated value before it is decorated.
pub type Scope = Arc<dyn Fn(Related) -> Related + Send + Sync>;

/// Options for [`crate::DecoratorClassBuilder::decorates_association`].
///
/// The child decorator is chosen in this order: the declaring class itself
/// when [`AssociationOptions::with_self`] is set, an explicit class given with
/// [`AssociationOptions::with`], a registered class named with
/// [`AssociationOptions::with_name`], then the class inferred from the final
/// path segment.
///
/// The declarative form accepts `with`, `as`, and `context` keys; any other
/// key is rejected.
///
/// ```rust
/// use serde_json::json;
/// use tint::AssociationOptions;
///
/// let options = AssociationOptions::from_value(json!({"with": "AuthorDecorator", "as": "writer"}))?;
/// assert_eq!(options.alias(), Some("writer"));
/// assert!(AssociationOptions::from_value(json!({"through": "posts"})).is_err());
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationOptions {
    #[serde(skip)]
    decorator: Option<DecoratorClass>,
    #[serde(skip)]
    self_decorated: bool,
    #[serde(rename = "with")]
    decorator_name: Option<String>,
    #[serde(rename = "as")]
    alias: Option<String>,
    #[serde(skip)]
    scope: Option<Scope>,
    #[serde(default)]
    context: Map<String, Value>,
}

impl AssociationOptions {
    /// Options with every setting left to its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the declarative JSON form.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] for unknown keys or mistyped values.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Decorate the association with `class`.
    #[must_use]
    pub fn with(mut self, class: &DecoratorClass) -> Self {
        self.decorator = Some(class.clone());
        self
    }

    /// Decorate the association with the class that declares it, for
    /// recursive structures such as category trees.
    #[must_use]
    pub const fn with_self(mut self) -> Self {
        self.self_decorated = true;
        self
    }

    /// Decorate the association with the registered class called `name`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.decorator_name = Some(name.into());
        self
    }

    /// Expose the association under `alias` instead of its final segment.
    #[must_use]
    pub fn alias_as(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Filter the associated value before decorating it.
    #[must_use]
    pub fn scope<F>(mut self, scope: F) -> Self
    where
        F: Fn(Related) -> Related + Send + Sync + 'static,
    {
        self.scope = Some(Arc::new(scope));
        self
    }

    /// Merge `key` into the context passed to the child decorator.
    #[must_use]
    pub fn context_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Output alias, when one was given.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) const fn decorator(&self) -> Option<&DecoratorClass> {
        self.decorator.as_ref()
    }

    pub(crate) const fn self_decorated(&self) -> bool {
        self.self_decorated
    }

    pub(crate) fn decorator_name(&self) -> Option<&str> {
        self.decorator_name.as_deref()
    }

    pub(crate) fn take_scope(&mut self) -> Option<Scope> {
        self.scope.take()
    }

    pub(crate) fn take_context(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.context)
    }
}

impl fmt::Debug for AssociationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssociationOptions")
            .field("decorator", &self.decorator.as_ref().map(DecoratorClass::name))
            .field("self_decorated", &self.self_decorated)
            .field("decorator_name", &self.decorator_name)
            .field("alias", &self.alias)
            .field("scope", &self.scope.is_some())
            .field("context", &self.context)
            .finish()
    }
}
