//! Verification of registered record shapes against SQLite tables.

use super::{DbError, DbResult};
use crate::model::schema::RecordSchema;
use log::debug;
use rusqlite::Connection;

struct TableColumn {
    name: String,
    declared_type: String,
    not_null: bool,
}

/// Registers a record shape with an open connection.
///
/// The table must already exist (created by migrations) and carry every
/// declared column with a matching SQLite type and nullability. Extra
/// bookkeeping columns on the table are allowed.
///
/// # Errors
/// - `DbError::SchemaMismatch` when the table or a column disagrees.
pub fn register_schema(conn: &Connection, schema: &RecordSchema) -> DbResult<()> {
    let table_columns = load_table_columns(conn, schema.table)?;
    if table_columns.is_empty() {
        return Err(DbError::SchemaMismatch {
            table: schema.table,
            reason: "table does not exist".to_string(),
        });
    }

    for declared in schema.columns {
        let Some(actual) = table_columns.iter().find(|c| c.name == declared.name) else {
            return Err(DbError::SchemaMismatch {
                table: schema.table,
                reason: format!("missing column `{}`", declared.name),
            });
        };

        let expected_type = declared.ty.sqlite_type();
        if !actual.declared_type.eq_ignore_ascii_case(expected_type) {
            return Err(DbError::SchemaMismatch {
                table: schema.table,
                reason: format!(
                    "column `{}` has type `{}`, expected `{expected_type}`",
                    declared.name, actual.declared_type
                ),
            });
        }

        if !declared.nullable && !actual.not_null {
            return Err(DbError::SchemaMismatch {
                table: schema.table,
                reason: format!("column `{}` must be NOT NULL", declared.name),
            });
        }
    }

    debug!(
        "event=schema_register module=db status=ok table={} columns={}",
        schema.table,
        schema.columns.len()
    );
    Ok(())
}

fn load_table_columns(conn: &Connection, table: &str) -> DbResult<Vec<TableColumn>> {
    let mut stmt = conn.prepare("SELECT name, type, \"notnull\" FROM pragma_table_info(?1);")?;
    let rows = stmt.query_map([table], |row| {
        Ok(TableColumn {
            name: row.get(0)?,
            declared_type: row.get(1)?,
            not_null: row.get::<_, i64>(2)? != 0,
        })
    })?;

    let mut columns = Vec::new();
    for column in rows {
        columns.push(column?);
    }
    Ok(columns)
}
