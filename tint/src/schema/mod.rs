//! Eager-load schema trees.
//!
//! A [`SchemaTree`] records which related entities must be fetched together
//! with a root record. Trees are built from [`SchemaSpec`] declarations and
//! combined with a recursive union, so repeated declarations accumulate
//! instead of overwriting one another.
//!
//! # Example
//!
//! ```rust
//! use tint::schema::{SchemaSpec, SchemaTree};
//!
//! let tree = SchemaTree::from_specs([
//!     SchemaSpec::leaf("author"),
//!     SchemaSpec::nested("comments", [SchemaSpec::leaf("replies")]),
//! ]);
//! assert!(tree.covers(["comments", "replies"]));
//! assert!(!tree.covers(["author", "avatar"]));
//! ```

mod spec;
mod tree;

pub use spec::{SchemaSpec, SchemaSpecError};
pub use tree::SchemaTree;
