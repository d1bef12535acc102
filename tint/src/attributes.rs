//! Per-class attribute registry.
//!
//! The registry records which attributes a decorator class exposes, in
//! declaration order, and how each one resolves. Delegated and mapped
//! attributes read members of the wrapped record; overridden attributes call a
//! method defined on the class, either a computed closure or an association.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::decorator::Decorator;
use crate::error::TintResult;

/// Closure backing a computed attribute.
pub type ComputedFn = Arc<dyn Fn(&Decorator) -> TintResult<Option<Value>> + Send + Sync>;

/// How an attribute obtains its value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeKind {
    /// Reads the member with the same name as the attribute.
    Delegated,
    /// Reads `source` but is exposed under the attribute's name.
    Mapped {
        /// Member read from the wrapped record.
        source: String,
    },
    /// Calls the method the class defines under the attribute's name.
    Overridden,
}

/// One declared output attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeDescriptor {
    name: String,
    kind: AttributeKind,
}

impl AttributeDescriptor {
    /// Output name before casing is applied.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolution strategy.
    #[must_use]
    pub const fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Member of the wrapped record this attribute reads, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match &self.kind {
            AttributeKind::Delegated => Some(&self.name),
            AttributeKind::Mapped { source } => Some(source),
            AttributeKind::Overridden => None,
        }
    }
}

#[derive(Clone)]
pub(crate) enum Method {
    Computed(ComputedFn),
    Association(usize),
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computed(_) => f.write_str("Computed(..)"),
            Self::Association(index) => f.debug_tuple("Association").field(index).finish(),
        }
    }
}

/// Ordered set of attributes declared on a decorator class.
#[derive(Clone, Debug, Default)]
pub struct AttributeRegistry {
    attributes: Vec<AttributeDescriptor>,
    methods: BTreeMap<String, Method>,
}

impl AttributeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: Vec::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Declare an attribute reading the same-named member.
    ///
    /// Re-declaring a name keeps its original position and resolution. A name
    /// that already has a method resolves through that method.
    pub fn declare_delegated(&mut self, name: &str) {
        if self.position(name).is_some() {
            return;
        }
        let kind = if self.methods.contains_key(name) {
            AttributeKind::Overridden
        } else {
            AttributeKind::Delegated
        };
        self.attributes.push(AttributeDescriptor {
            name: name.to_owned(),
            kind,
        });
    }

    /// Declare an attribute exposing member `source` under `name`.
    pub fn declare_mapped(&mut self, name: &str, source: &str) {
        let kind = if self.methods.contains_key(name) {
            AttributeKind::Overridden
        } else {
            AttributeKind::Mapped {
                source: source.to_owned(),
            }
        };
        if let Some(existing) = self.attributes.iter_mut().find(|d| d.name == name) {
            existing.kind = kind;
            return;
        }
        self.attributes.push(AttributeDescriptor {
            name: name.to_owned(),
            kind,
        });
    }

    pub(crate) fn define_method(&mut self, name: &str, method: Method) {
        self.methods.insert(name.to_owned(), method);
        if let Some(existing) = self.attributes.iter_mut().find(|d| d.name == name) {
            existing.kind = AttributeKind::Overridden;
        }
    }

    pub(crate) fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Returns `true` when a method is defined under `name`.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Look up a declared attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|d| d.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|d| d.name == name)
    }

    /// Declared attributes in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, AttributeDescriptor> {
        self.attributes.iter()
    }

    /// Number of declared attributes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` when nothing has been declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeRegistry {
    type Item = &'a AttributeDescriptor;
    type IntoIter = std::slice::Iter<'a, AttributeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &AttributeRegistry) -> Vec<&str> {
        registry.iter().map(AttributeDescriptor::name).collect()
    }

    #[test]
    fn delegated_names_form_an_ordered_set() {
        let mut registry = AttributeRegistry::new();
        registry.declare_delegated("b");
        registry.declare_delegated("a");
        registry.declare_delegated("b");
        assert_eq!(names(&registry), vec!["b", "a"]);
    }

    #[test]
    fn mapped_attributes_read_their_source() {
        let mut registry = AttributeRegistry::new();
        registry.declare_mapped("headline", "title");
        let descriptor = registry.get("headline");
        assert_eq!(descriptor.and_then(AttributeDescriptor::source), Some("title"));
    }

    #[test]
    fn existing_methods_are_not_replaced_by_delegation() {
        let mut registry = AttributeRegistry::new();
        registry.define_method("author", Method::Association(0));
        registry.declare_delegated("author");
        assert_eq!(
            registry.get("author").map(AttributeDescriptor::kind),
            Some(&AttributeKind::Overridden)
        );
        assert!(matches!(
            registry.method("author"),
            Some(Method::Association(0))
        ));
    }

    #[test]
    fn later_methods_override_earlier_attributes() {
        let mut registry = AttributeRegistry::new();
        registry.declare_delegated("summary");
        registry.declare_mapped("title", "name");
        registry.define_method("summary", Method::Association(3));
        registry.define_method("title", Method::Association(4));
        assert!(registry
            .iter()
            .all(|d| d.kind() == &AttributeKind::Overridden));
        assert_eq!(names(&registry), vec!["summary", "title"]);
    }

    #[test]
    fn remapping_keeps_position() {
        let mut registry = AttributeRegistry::new();
        registry.declare_delegated("a");
        registry.declare_delegated("b");
        registry.declare_mapped("a", "alpha");
        assert_eq!(names(&registry), vec!["a", "b"]);
        assert_eq!(registry.get("a").and_then(AttributeDescriptor::source), Some("alpha"));
    }
}
