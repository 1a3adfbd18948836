//! Item domain model.
//!
//! # Responsibility
//! - Define the single timestamped record persisted by core.
//! - Provide explicit identity so stored rows map back to one value.
//!
//! # Invariants
//! - `id` is never the nil UUID and is never reused for another item.
//! - `timestamp` is always present; it is set at construction and only
//!   changes through direct reassignment.

use crate::model::schema::{Column, ColumnType, Record, RecordSchema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a persisted item.
pub type ItemId = Uuid;

/// Validation errors for item invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Item identity must not be the nil UUID.
    NilId,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "item id must not be nil"),
        }
    }
}

impl Error for ItemValidationError {}

/// One timestamped fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemWire")]
pub struct Item {
    /// Stable identity assigned at construction.
    pub id: ItemId,
    /// Point in time this item records. Freely reassignable.
    pub timestamp: DateTime<Utc>,
}

impl Item {
    /// Creates a new item holding `timestamp` with a generated ID.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
        }
    }

    /// Creates a new item stamped with the current time.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Creates an item with a caller-provided ID.
    ///
    /// Used by import paths where identity already exists externally.
    ///
    /// # Errors
    /// - `ItemValidationError::NilId` when `id` is nil.
    pub fn with_id(id: ItemId, timestamp: DateTime<Utc>) -> Result<Self, ItemValidationError> {
        let item = Self { id, timestamp };
        item.validate()?;
        Ok(item)
    }

    /// Checks item invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        Ok(())
    }
}

impl Record for Item {
    const SCHEMA: RecordSchema = RecordSchema {
        table: "items",
        columns: &[
            Column {
                name: "id",
                ty: ColumnType::Uuid,
                nullable: false,
            },
            Column {
                name: "timestamp_secs",
                ty: ColumnType::EpochSeconds,
                nullable: false,
            },
            Column {
                name: "timestamp_nanos",
                ty: ColumnType::SubsecNanos,
                nullable: false,
            },
        ],
    };
}

#[derive(Deserialize)]
struct ItemWire {
    id: ItemId,
    timestamp: DateTime<Utc>,
}

impl TryFrom<ItemWire> for Item {
    type Error = ItemValidationError;

    fn try_from(value: ItemWire) -> Result<Self, Self::Error> {
        Item::with_id(value.id, value.timestamp)
    }
}
