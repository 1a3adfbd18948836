//! Explicit record shape registration.
//!
//! A persisted type declares its table and typed columns through `Record`.
//! Storage code checks these declarations against the live database instead
//! of inferring the shape at runtime.

/// Logical column type understood by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Hyphenated UUID text.
    Uuid,
    /// Whole seconds since the Unix epoch, negative before 1970.
    EpochSeconds,
    /// Nanoseconds within the second; up to `1_999_999_999` for leap seconds.
    SubsecNanos,
}

impl ColumnType {
    /// SQLite declared type used for this column.
    pub fn sqlite_type(self) -> &'static str {
        match self {
            Self::Uuid => "TEXT",
            Self::EpochSeconds | Self::SubsecNanos => "INTEGER",
        }
    }
}

/// One declared column of a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
}

/// Table name plus columns for one persisted record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub table: &'static str,
    pub columns: &'static [Column],
}

impl RecordSchema {
    /// Looks up a declared column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Implemented by every type stored through core repositories.
pub trait Record {
    const SCHEMA: RecordSchema;
}

#[cfg(test)]
mod tests {
    use super::{ColumnType, Record};
    use crate::model::item::Item;

    #[test]
    fn item_schema_declares_split_timestamp_columns() {
        let secs = Item::SCHEMA
            .column("timestamp_secs")
            .expect("timestamp_secs column should be declared");
        assert_eq!(secs.ty, ColumnType::EpochSeconds);
        assert!(!secs.nullable);

        let nanos = Item::SCHEMA
            .column("timestamp_nanos")
            .expect("timestamp_nanos column should be declared");
        assert_eq!(nanos.ty, ColumnType::SubsecNanos);
        assert_eq!(nanos.ty.sqlite_type(), "INTEGER");
        assert_eq!(Item::SCHEMA.table, "items");
        assert!(Item::SCHEMA.column("missing").is_none());
    }
}
