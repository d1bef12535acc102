//! Per-decoration context.

use std::fmt;

use serde_json::{Map, Value};

use crate::repository::RepositoryRef;

use super::DecoratorClass;

/// The decorator that resolved an association, and the path it followed.
///
/// Only the class and the path are kept: that is all the planner needs to
/// check whether the parent's eager-load tree already covers the child.
#[derive(Clone)]
pub struct ParentLink {
    class: DecoratorClass,
    association_path: Vec<String>,
}

impl ParentLink {
    /// Link to `class` through `association_path`.
    #[must_use]
    pub fn new<I, S>(class: DecoratorClass, association_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            class,
            association_path: association_path.into_iter().map(Into::into).collect(),
        }
    }

    /// Class of the parent decorator.
    #[must_use]
    pub const fn class(&self) -> &DecoratorClass {
        &self.class
    }

    /// Association path leading from the parent to the current decorator.
    #[must_use]
    pub fn association_path(&self) -> &[String] {
        &self.association_path
    }
}

impl fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentLink")
            .field("class", &self.class.name())
            .field("association_path", &self.association_path)
            .finish()
    }
}

/// Options and context carried into a decoration.
///
/// Caller data and the repository propagate to nested associations; the
/// parent link is replaced at every level.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tint::DecorationContext;
///
/// let context = DecorationContext::new().with_value("locale", json!("en"));
/// assert_eq!(context.data().get("locale"), Some(&json!("en")));
/// assert!(context.parent().is_none());
/// ```
#[derive(Clone, Default)]
pub struct DecorationContext {
    data: Map<String, Value>,
    repository: Option<RepositoryRef>,
    parent: Option<ParentLink>,
}

impl DecorationContext {
    /// Context with no data, repository, or parent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the repository used for eager fetches.
    #[must_use]
    pub fn with_repository(mut self, repository: RepositoryRef) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Replace the caller data.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Add one entry to the caller data.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Set the parent link explicitly.
    #[must_use]
    pub fn with_parent(mut self, parent: ParentLink) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Caller data.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Repository used for eager fetches, if any.
    #[must_use]
    pub const fn repository(&self) -> Option<&RepositoryRef> {
        self.repository.as_ref()
    }

    /// Parent link, present when decorating an association.
    #[must_use]
    pub const fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub(crate) fn for_association(
        &self,
        parent: &DecoratorClass,
        path: &[String],
        extra: &Map<String, Value>,
    ) -> Self {
        let mut data = self.data.clone();
        for (key, value) in extra {
            data.insert(key.clone(), value.clone());
        }
        Self {
            data,
            repository: self.repository.clone(),
            parent: Some(ParentLink::new(parent.clone(), path.iter().cloned())),
        }
    }
}

impl fmt::Debug for DecorationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecorationContext")
            .field("data", &self.data)
            .field("repository", &self.repository.is_some())
            .field("parent", &self.parent)
            .finish()
    }
}
