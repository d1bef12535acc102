//! Constructors for `TintError`.

use super::{FetchError, TintError};

impl TintError {
    /// Build an [`TintError::InvalidDeclaration`] for `class`.
    #[must_use]
    pub fn invalid_declaration(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Build a [`TintError::Fetch`] for `model` from a repository failure.
    #[must_use]
    pub fn fetch(model: impl Into<String>, source: FetchError) -> Self {
        Self::Fetch {
            model: model.into(),
            source,
        }
    }
}

impl From<figment::Error> for TintError {
    fn from(e: figment::Error) -> Self {
        Self::Configuration(Box::new(e))
    }
}
