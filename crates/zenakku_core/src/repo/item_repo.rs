//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Construct, store, retrieve and delete items by identity.
//! - Keep SQL and on-disk value encoding inside the persistence boundary.
//!
//! # Invariants
//! - Timestamps are stored as `(timestamp_secs, timestamp_nanos)` integer
//!   pairs. Every `DateTime<Utc>` maps to exactly one pair, and pair order in
//!   SQL equals chronological order.
//! - Read paths reject corrupt persisted values instead of masking them.

use crate::db::migrations::latest_version;
use crate::db::{register_schema, DbError};
use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::model::schema::Record;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT id, timestamp_secs, timestamp_nanos FROM items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
    /// Connection was not opened through `open_db*`, or belongs to another
    /// schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::UninitializedConnection { .. } => {
                None
            }
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort direction by item timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

/// Query options for listing items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    /// Inclusive lower bound on `timestamp`.
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `timestamp`.
    pub until: Option<DateTime<Utc>>,
    pub order: TimestampOrder,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for item persistence.
pub trait ItemRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId>;
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    fn count_items(&self) -> RepoResult<u64>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Creates a repository after registering `Item::SCHEMA` with `conn`.
    ///
    /// # Errors
    /// - `RepoError::UninitializedConnection` when migrations were not applied.
    /// - `RepoError::Db` when the `items` table disagrees with the declared
    ///   record shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        register_schema(conn, &Item::SCHEMA)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        item.validate()?;

        let (secs, nanos) = timestamp_to_db(&item.timestamp);
        self.conn.execute(
            "INSERT INTO items (id, timestamp_secs, timestamp_nanos) VALUES (?1, ?2, ?3);",
            params![item.id.to_string(), secs, nanos],
        )?;

        Ok(item.id)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let (secs, nanos) = timestamp_to_db(&item.timestamp);
        let changed = self.conn.execute(
            "UPDATE items
             SET
                timestamp_secs = ?1,
                timestamp_nanos = ?2
             WHERE id = ?3;",
            params![secs, nanos, item.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(since) = query.since {
            let (secs, nanos) = timestamp_to_db(&since);
            sql.push_str(
                " AND (timestamp_secs > ? OR (timestamp_secs = ? AND timestamp_nanos >= ?))",
            );
            bind_values.extend([
                Value::Integer(secs),
                Value::Integer(secs),
                Value::Integer(nanos),
            ]);
        }
        if let Some(until) = query.until {
            let (secs, nanos) = timestamp_to_db(&until);
            sql.push_str(
                " AND (timestamp_secs < ? OR (timestamp_secs = ? AND timestamp_nanos < ?))",
            );
            bind_values.extend([
                Value::Integer(secs),
                Value::Integer(secs),
                Value::Integer(nanos),
            ]);
        }

        match query.order {
            TimestampOrder::Ascending => {
                sql.push_str(" ORDER BY timestamp_secs ASC, timestamp_nanos ASC, id ASC")
            }
            TimestampOrder::Descending => {
                sql.push_str(" ORDER BY timestamp_secs DESC, timestamp_nanos DESC, id ASC")
            }
        }

        match (query.limit, query.offset) {
            (Some(limit), 0) => {
                sql.push_str(" LIMIT ?");
                bind_values.push(Value::Integer(i64::from(limit)));
            }
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
                bind_values.push(Value::Integer(i64::from(offset)));
            }
            (None, 0) => {}
            (None, offset) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                bind_values.push(Value::Integer(i64::from(offset)));
            }
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count_items(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative item count `{count}`")))
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in items.id")))?;

    let secs: i64 = row.get("timestamp_secs")?;
    let nanos: i64 = row.get("timestamp_nanos")?;
    let timestamp = timestamp_from_db(secs, nanos).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{secs}s + {nanos}ns` in items.timestamp_secs/timestamp_nanos"
        ))
    })?;

    Ok(Item::with_id(id, timestamp)?)
}

fn timestamp_to_db(value: &DateTime<Utc>) -> (i64, i64) {
    (value.timestamp(), i64::from(value.timestamp_subsec_nanos()))
}

fn timestamp_from_db(secs: i64, nanos: i64) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(nanos).ok()?;
    DateTime::from_timestamp(secs, nanos)
}
