//! Primary error enum for declaration and decoration flows.

use thiserror::Error;

use super::declarations::DeclarationErrors;

/// Boxed error reported by a [`crate::Repository`] implementation.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while declaring decorator classes or decorating
/// records.
///
/// A record member that does not exist is never an error: it resolves to an
/// absent value and is left out of the projection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TintError {
    /// A declaration was rejected while building a decorator class.
    #[error("invalid declaration on '{class}': {message}")]
    InvalidDeclaration {
        /// Name of the decorator class being built.
        class: String,
        /// Human-readable explanation of the rejected declaration.
        message: String,
    },

    /// An association referred to a decorator class that is not registered.
    #[error("no decorator class named '{name}' is registered")]
    UnknownDecorator {
        /// Name that failed to resolve.
        name: String,
    },

    /// The data-access collaborator failed to fetch a record.
    #[error("failed to fetch '{model}': {source}")]
    Fetch {
        /// Model the fetch targeted.
        model: String,
        /// Underlying error reported by the repository.
        #[source]
        source: FetchError,
    },

    /// A record had to be fetched but no repository was supplied.
    #[error("cannot fetch '{model}' without a repository")]
    MissingRepository {
        /// Model that was requested.
        model: String,
    },

    /// Settings could not be gathered or extracted.
    #[error("failed to load settings: {0}")]
    Configuration(#[from] Box<figment::Error>),

    /// Several declarations on one class were rejected.
    #[error("{count} declarations rejected\n{0}", count = .0.len())]
    Declarations(Box<DeclarationErrors>),

    /// Two attributes project to the same output key under a casing.
    #[error("attributes of '{class}' collide on output key '{key}'")]
    KeyCollision {
        /// Name of the decorator class being projected.
        class: String,
        /// Output key produced twice.
        key: String,
    },
}
