//! Declarative eager-load specifications.

use serde_json::Value;

use super::SchemaTree;

/// One element of an eager-load declaration list.
///
/// Declarations mirror the shapes accepted by relational include APIs: a bare
/// identifier, a mapping from identifier to nested declarations, or a chain of
/// identifiers describing a single deep path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchemaSpec {
    /// A single related entity with no further requirements.
    Leaf(String),
    /// Related entities that carry their own nested requirements.
    Mapping(Vec<(String, Vec<SchemaSpec>)>),
    /// A deep path; each segment nests the following one.
    Chain(Vec<String>),
    /// A tree that has already been built elsewhere.
    Tree(SchemaTree),
}

/// Error raised when a JSON declaration does not describe a schema.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct SchemaSpecError(String);

impl SchemaSpec {
    /// Declare a leaf.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    /// Declare `name` with nested requirements.
    #[must_use]
    pub fn nested<I>(name: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::Mapping(vec![(name.into(), children.into_iter().collect())])
    }

    /// Declare a chain of segments.
    #[must_use]
    pub fn chain<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Chain(segments.into_iter().map(Into::into).collect())
    }

    /// Convert the declaration into a tree.
    #[must_use]
    pub fn into_tree(self) -> SchemaTree {
        match self {
            Self::Leaf(name) => SchemaTree::leaf(name),
            Self::Mapping(entries) => entries
                .into_iter()
                .map(|(name, children)| (name, SchemaTree::from_specs(children)))
                .collect(),
            Self::Chain(segments) => SchemaTree::nest_under(segments, SchemaTree::new()),
            Self::Tree(tree) => tree,
        }
    }

    /// Identifiers that the declaration names, used for validation.
    pub(crate) fn identifiers(&self) -> Vec<&str> {
        match self {
            Self::Leaf(name) => vec![name.as_str()],
            Self::Mapping(entries) => entries
                .iter()
                .flat_map(|(name, children)| {
                    std::iter::once(name.as_str())
                        .chain(children.iter().flat_map(Self::identifiers))
                })
                .collect(),
            Self::Chain(segments) => segments.iter().map(String::as_str).collect(),
            Self::Tree(_) => Vec::new(),
        }
    }

    /// Parse the JSON form of a declaration list.
    ///
    /// Strings are leaves, objects are mappings, and arrays inside the list
    /// are chains. Object values may be `null`, a string, an array of
    /// declarations, or another object.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaSpecError`] when the value contains numbers, booleans,
    /// empty identifiers, or chains with non-string segments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use tint::schema::{SchemaSpec, SchemaTree};
    ///
    /// let specs = SchemaSpec::parse_value(&json!(["tags", {"comments": ["author"]}]))?;
    /// let tree = SchemaTree::from_specs(specs);
    /// assert!(tree.covers(["comments", "author"]));
    /// # Ok::<_, tint::schema::SchemaSpecError>(())
    /// ```
    pub fn parse_value(value: &Value) -> Result<Vec<Self>, SchemaSpecError> {
        match value {
            Value::Array(items) => items.iter().map(Self::parse_element).collect(),
            other => Ok(vec![Self::parse_element(other)?]),
        }
    }

    fn parse_element(value: &Value) -> Result<Self, SchemaSpecError> {
        match value {
            Value::String(name) => Ok(Self::Leaf(identifier(name)?)),
            Value::Object(map) => map
                .iter()
                .map(|(name, nested)| {
                    Ok::<_, SchemaSpecError>((identifier(name)?, Self::parse_nested(nested)?))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Mapping),
            Value::Array(segments) => {
                if segments.is_empty() {
                    return Err(SchemaSpecError("chains need at least one segment".into()));
                }
                segments
                    .iter()
                    .map(|segment| match segment {
                        Value::String(name) => identifier(name),
                        other => Err(SchemaSpecError(format!(
                            "chain segments must be strings, found {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Chain)
            }
            other => Err(SchemaSpecError(format!(
                "expected an identifier, mapping, or chain, found {other}"
            ))),
        }
    }

    fn parse_nested(value: &Value) -> Result<Vec<Self>, SchemaSpecError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Object(map) if map.is_empty() => Ok(Vec::new()),
            Value::Array(items) => items.iter().map(Self::parse_element).collect(),
            other => Ok(vec![Self::parse_element(other)?]),
        }
    }
}

impl From<&str> for SchemaSpec {
    fn from(name: &str) -> Self {
        Self::leaf(name)
    }
}

impl From<String> for SchemaSpec {
    fn from(name: String) -> Self {
        Self::Leaf(name)
    }
}

impl From<SchemaTree> for SchemaSpec {
    fn from(tree: SchemaTree) -> Self {
        Self::Tree(tree)
    }
}

fn identifier(raw: &str) -> Result<String, SchemaSpecError> {
    if raw.trim().is_empty() {
        Err(SchemaSpecError("identifiers must not be empty".into()))
    } else {
        Ok(raw.to_owned())
    }
}
