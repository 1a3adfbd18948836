//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence contract items are stored through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths enforce `Item::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod item_repo;
