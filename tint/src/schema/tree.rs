//! Recursive entity tree with union merge and path coverage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SchemaSpec;

/// Mapping from entity identifier to the entities it needs alongside it.
///
/// Leaves are empty subtrees. Keys are kept sorted so structurally equal
/// trees compare equal regardless of declaration order.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaTree(BTreeMap<String, SchemaTree>);

impl SchemaTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a tree from a list of declarations.
    #[must_use]
    pub fn from_specs<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = SchemaSpec>,
    {
        let mut tree = Self::new();
        for spec in specs {
            tree.merge_in(spec.into_tree());
        }
        tree
    }

    /// Wrap `subtree` under `path`, one level per segment.
    ///
    /// The last segment carries `subtree`; every preceding segment wraps it
    /// one level deeper. An empty path returns `subtree` unchanged.
    ///
    /// ```rust
    /// use tint::schema::SchemaTree;
    ///
    /// let tree = SchemaTree::nest_under(["post", "author"], SchemaTree::leaf("avatar"));
    /// assert!(tree.covers(["post", "author", "avatar"]));
    /// ```
    #[must_use]
    pub fn nest_under<I, S>(path: I, subtree: Self) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        path.into_iter().rev().fold(subtree, |inner, segment| {
            let mut wrapper = Self::new();
            wrapper.0.insert(segment.into(), inner);
            wrapper
        })
    }

    /// Tree containing a single empty branch named `name`.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::nest_under([name.into()], Self::new())
    }

    /// Recursive union of `a` and `b`.
    ///
    /// Keys present on one side are taken as-is; keys present on both sides
    /// have their subtrees merged.
    #[must_use]
    pub fn merge(a: &Self, b: &Self) -> Self {
        let mut merged = a.clone();
        merged.merge_in(b.clone());
        merged
    }

    /// Fold `other` into `self` in place.
    pub fn merge_in(&mut self, other: Self) {
        for (key, subtree) in other.0 {
            self.0.entry(key).or_default().merge_in(subtree);
        }
    }

    /// Returns `true` when every segment of `path` is present at the
    /// corresponding depth.
    ///
    /// An empty path is trivially covered.
    #[must_use]
    pub fn covers<I, S>(&self, path: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut node = self;
        for segment in path {
            let Some(child) = node.0.get(segment.as_ref()) else {
                return false;
            };
            node = child;
        }
        true
    }

    /// Returns the subtree registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.0.get(key)
    }

    /// Returns `true` when the tree has no branches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level branches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over top-level branches in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.0.iter().map(|(key, subtree)| (key.as_str(), subtree))
    }

    /// Render the tree as a nested JSON object.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(key, subtree)| (key.clone(), subtree.to_value()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Self)> for SchemaTree {
    fn from_iter<T: IntoIterator<Item = (String, Self)>>(iter: T) -> Self {
        let mut tree = Self::new();
        for (key, subtree) in iter {
            tree.merge_in(Self::nest_under([key], subtree));
        }
        tree
    }
}

impl<'a> IntoIterator for &'a SchemaTree {
    type Item = (&'a String, &'a SchemaTree);
    type IntoIter = std::collections::btree_map::Iter<'a, String, SchemaTree>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
