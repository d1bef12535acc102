//! Association declarations.
//!
//! An association exposes a related record (or collection) under an output
//! key, decorated with another decorator class. Declaring one folds the child
//! class's eager-load tree into the parent's, nested under the association
//! path.

mod binding;
mod options;

pub use binding::{AssociationBinding, Decorated};
pub(crate) use binding::{Target, decorate_related};
pub use options::{AssociationOptions, Scope};

use heck::ToUpperCamelCase;

/// One or more member names followed in order to reach the associated value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssociationPath(Vec<String>);

impl AssociationPath {
    /// Segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The final segment, which names the association by default.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub(crate) fn into_segments(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for AssociationPath {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_owned()])
    }
}

impl From<String> for AssociationPath {
    fn from(segment: String) -> Self {
        Self(vec![segment])
    }
}

impl From<Vec<String>> for AssociationPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for AssociationPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AssociationPath {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// Name of the decorator class inferred for an association segment.
///
/// The segment is singularized and upper-camel-cased, then suffixed with
/// `Decorator`.
///
/// # Examples
///
/// ```
/// use tint::association::inferred_decorator_name;
/// assert_eq!(inferred_decorator_name("comments"), "CommentDecorator");
/// assert_eq!(inferred_decorator_name("categories"), "CategoryDecorator");
/// assert_eq!(inferred_decorator_name("associated"), "AssociatedDecorator");
/// ```
#[must_use]
pub fn inferred_decorator_name(segment: &str) -> String {
    format!("{}Decorator", singularize(segment).to_upper_camel_case())
}

fn singularize(word: &str) -> String {
    const KEEP: [&str; 3] = ["ss", "us", "is"];
    const STRIP_ES: [&str; 5] = ["sses", "shes", "ches", "xes", "zes"];

    if let Some(stem) = word.strip_suffix("ies").filter(|stem| !stem.is_empty()) {
        return format!("{stem}y");
    }
    if STRIP_ES.iter().any(|suffix| word.ends_with(suffix)) {
        return word.strip_suffix("es").unwrap_or(word).to_owned();
    }
    if KEEP.iter().any(|suffix| word.ends_with(suffix)) {
        return word.to_owned();
    }
    word.strip_suffix('s').unwrap_or(word).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("posts", "post")]
    #[case("categories", "category")]
    #[case("addresses", "address")]
    #[case("boxes", "box")]
    #[case("branches", "branch")]
    #[case("status", "status")]
    #[case("class", "class")]
    #[case("author", "author")]
    fn singularizes_common_plurals(#[case] word: &str, #[case] expected: &str) {
        assert_eq!(singularize(word), expected);
    }

    #[rstest]
    #[case("line_items", "LineItemDecorator")]
    #[case("author", "AuthorDecorator")]
    fn infers_decorator_names(#[case] segment: &str, #[case] expected: &str) {
        assert_eq!(inferred_decorator_name(segment), expected);
    }

    #[test]
    fn paths_accept_single_and_chained_segments() {
        assert_eq!(AssociationPath::from("author").segments(), ["author"]);
        let chained = AssociationPath::from(["post", "author"]);
        assert_eq!(chained.last(), Some("author"));
        assert_eq!(chained.segments().len(), 2);
    }
}
