//! Decorated JSON projection with eager-load planning.
//!
//! `tint` wraps domain records in decorator classes that declare which
//! attributes a record exposes and how it serializes. Each class also
//! accumulates an eager-load tree describing the related records that must be
//! fetched together, so serializing a decorated graph does not issue one
//! query per association.
//!
//! Records implement [`Record`], usually through `#[derive(Record)]`. Fetches
//! are delegated to a [`Repository`]; the crate never builds queries itself.
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use tint::{AssociationOptions, DecorationContext, DecoratorClass, KeyCasing, Record};
//!
//! #[derive(Record)]
//! struct Author {
//!     display_name: String,
//! }
//!
//! #[derive(Record)]
//! struct Post {
//!     title: String,
//!     #[tint(association)]
//!     author: Arc<Author>,
//! }
//!
//! let authors = DecoratorClass::builder("AuthorDecorator")
//!     .attributes(["display_name"])
//!     .build()?;
//! let posts = DecoratorClass::builder("PostDecorator")
//!     .attributes(["title"])
//!     .decorates_association("author", AssociationOptions::new().with(&authors))
//!     .build()?;
//!
//! let post = Arc::new(Post {
//!     title: "Hello".into(),
//!     author: Arc::new(Author { display_name: "Ada".into() }),
//! });
//! let decorated = posts.decorate(post, DecorationContext::new())?;
//! assert_eq!(
//!     decorated.as_json_with(KeyCasing::Camel)?,
//!     json!({"title": "Hello", "author": {"displayName": "Ada"}})
//! );
//! # Ok::<_, tint::TintError>(())
//! ```

pub use tint_macros::Record;

pub mod association;
pub mod attributes;
mod casing;
mod config;
mod decorator;
mod error;
pub mod planner;
mod record;
mod repository;
pub mod schema;

pub use association::{AssociationOptions, Decorated};
pub use casing::{KeyCasing, UnknownKeyCasing, key_casing, set_key_casing};
pub use config::Settings;
pub use decorator::{
    DecorationContext, Decorator, DecoratorClass, DecoratorClassBuilder, DecoratorRegistry,
    ParentLink, strip_js_unsafe,
};
pub use error::{DeclarationErrors, FetchError, TintError, TintResult};
pub use record::{
    IntoRecordId, IntoRelated, Record, RecordId, RecordRef, Related, field_value,
};
pub use repository::{Repository, RepositoryRef};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
