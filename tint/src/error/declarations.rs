//! Declaration errors collected while building one decorator class.

use std::fmt;

use super::TintError;

/// Every declaration rejected while building one decorator class.
///
/// Rendered one line per rejection, each prefixed with the class name.
///
/// # Examples
///
/// ```
/// use tint::{AssociationOptions, DecoratorClass, TintError};
///
/// let err = DecoratorClass::builder("PostDecorator")
///     .attributes([""])
///     .decorates_association("author", AssociationOptions::new())
///     .build()
///     .err();
/// let Some(TintError::Declarations(rejected)) = err else {
///     panic!("expected several declaration errors");
/// };
/// assert_eq!(rejected.class(), "PostDecorator");
/// assert_eq!(rejected.len(), 2);
/// ```
#[derive(Debug)]
pub struct DeclarationErrors {
    class: String,
    errors: Vec<TintError>,
}

impl DeclarationErrors {
    /// Fold the errors recorded for `class` into one.
    ///
    /// Returns `None` when nothing was recorded and the error itself when
    /// exactly one was.
    pub(crate) fn collect(class: &str, mut errors: Vec<TintError>) -> Option<TintError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(TintError::Declarations(Box::new(Self {
                class: class.to_owned(),
                errors,
            }))),
        }
    }

    /// Class whose declarations were rejected.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Rejections in the order they were declared.
    pub fn iter(&self) -> std::slice::Iter<'_, TintError> {
        self.errors.iter()
    }

    /// Number of rejections.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` when nothing was rejected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for DeclarationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, err) in self.errors.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            match err {
                TintError::InvalidDeclaration { message, .. } => {
                    write!(f, "{}: {message}", self.class)?;
                }
                other => write!(f, "{}: {other}", self.class)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for DeclarationErrors {}

impl<'a> IntoIterator for &'a DeclarationErrors {
    type Item = &'a TintError;
    type IntoIter = std::slice::Iter<'a, TintError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
