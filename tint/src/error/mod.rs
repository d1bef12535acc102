//! Error types produced while declaring and decorating.

mod constructors;
mod declarations;
mod types;

pub use declarations::DeclarationErrors;
pub use types::{FetchError, TintError};

/// Result alias used throughout the crate.
pub type TintResult<T> = Result<T, TintError>;

#[cfg(test)]
mod tests;
