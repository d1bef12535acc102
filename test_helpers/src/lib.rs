//! Test helpers shared across crates in the workspace.
//!
//! Provides an in-memory [`Repository`](tint::Repository) that records every
//! fetch, a dynamically shaped record, a guard serializing changes to the
//! process-wide key casing, and a `figment::Jail` wrapper.

pub mod casing;
pub mod figment;
pub mod record;
pub mod repository;

pub use casing::{CasingGuard, use_casing};
pub use figment::with_jail;
pub use record::DynamicRecord;
pub use repository::{Call, MemoryRepository};
