//! Decorator classes and instances.
//!
//! A [`DecoratorClass`] is declared once through a [`DecoratorClassBuilder`]
//! and is immutable afterwards. Decorating a record produces a
//! [`Decorator`], whose [`Decorator::as_json`] walks the class's attribute
//! registry.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use tint::{DecorationContext, DecoratorClass, KeyCasing, Record};
//!
//! #[derive(Record)]
//! struct Post {
//!     title: String,
//!     body: String,
//! }
//!
//! let class = DecoratorClass::builder("PostDecorator")
//!     .attributes(["title"])
//!     .mapped("summary", "body")
//!     .build()?;
//! let post = Arc::new(Post { title: "Hello".into(), body: "World".into() });
//! let decorated = class.decorate(post, DecorationContext::new())?;
//! assert_eq!(
//!     decorated.as_json_with(KeyCasing::Identity)?,
//!     json!({"title": "Hello", "summary": "World"})
//! );
//! # Ok::<_, tint::TintError>(())
//! ```

mod builder;
mod class;
mod context;
mod instance;
mod json;
mod registry;

pub use builder::DecoratorClassBuilder;
pub use class::DecoratorClass;
pub use context::{DecorationContext, ParentLink};
pub use instance::Decorator;
pub use json::strip_js_unsafe;
pub use registry::DecoratorRegistry;
