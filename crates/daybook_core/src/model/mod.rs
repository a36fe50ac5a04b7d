//! Domain model for tasks and journal entries.
//!
//! # Responsibility
//! - Define the canonical record shapes owned by the two stores.
//! - Own input normalization (tag casing, content trimming, defaults).
//!
//! # Invariants
//! - Every record is identified by a stable `Uuid` assigned at creation.
//! - `created_at` never changes after creation.
//! - Records serialize with camelCase field names; the SQLite tier maps
//!   to snake_case columns at the repository boundary.

pub mod entry;
pub mod task;
