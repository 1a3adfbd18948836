//! Domain model for timestamped items.
//!
//! # Responsibility
//! - Define the canonical `Item` record and its validation rules.
//! - Declare the storage shape of each record explicitly via `Record`.
//!
//! # Invariants
//! - Every item is identified by a stable, non-nil `ItemId`.
//! - Record shapes are registered by value, never discovered by reflection.

pub mod item;
pub mod schema;
