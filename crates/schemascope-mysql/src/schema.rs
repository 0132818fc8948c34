//! MySQL schema introspection

use async_trait::async_trait;
use regex::Regex;
use schemascope_core::{Column, Connection, ForeignKey, Index, Result, SchemaSource, Value};
use std::sync::LazyLock;

use crate::MySqlConnection;

/// Matches the parenthesized display length in a MySQL column type
/// definition, e.g. `varchar(255)` or `int(11)`.
static DISPLAY_LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("display length pattern is valid"));

/// Extract the displayed character/display length from a raw column type.
///
/// Types without a parenthesized numeric length (`text`, `enum('a','b')`,
/// `double`) yield None.
fn display_length(column_type: &str) -> Option<u32> {
    DISPLAY_LENGTH
        .captures(column_type)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Resolve the unsigned attribute for a column.
///
/// Only integer-family types carry the attribute in MySQL metadata; for
/// every other type the attribute is absent rather than false.
fn unsigned_attribute(data_type: &str, column_type: &str) -> Option<bool> {
    match data_type {
        "tinyint" | "smallint" | "mediumint" | "int" | "bigint" => {
            Some(column_type.contains("unsigned"))
        }
        _ => None,
    }
}

/// Fold one `information_schema.STATISTICS` row into the index list,
/// appending to an existing index when the name repeats (composite keys
/// arrive one row per column, in key order).
fn fold_index_row(indexes: &mut Vec<Index>, name: &str, non_unique: i64, column: String) {
    if let Some(index) = indexes.iter_mut().find(|i| i.name == name) {
        index.columns.push(column);
    } else {
        indexes.push(Index {
            name: name.to_string(),
            columns: vec![column],
            is_unique: non_unique == 0,
            is_primary: name == "PRIMARY",
        });
    }
}

/// Fold one `KEY_COLUMN_USAGE` row into the foreign key list, appending
/// column pairs to an existing constraint when the name repeats.
fn fold_foreign_key_row(
    foreign_keys: &mut Vec<ForeignKey>,
    name: &str,
    column: String,
    referenced_table: String,
    referenced_column: String,
) {
    if let Some(fk) = foreign_keys.iter_mut().find(|f| f.name == name) {
        fk.local_columns.push(column);
        fk.referenced_columns.push(referenced_column);
    } else {
        foreign_keys.push(ForeignKey {
            name: name.to_string(),
            local_columns: vec![column],
            referenced_table,
            referenced_columns: vec![referenced_column],
        });
    }
}

fn row_str(value: Option<&Value>) -> String {
    value.and_then(|v| v.as_str()).unwrap_or("").to_string()
}

#[async_trait]
impl SchemaSource for MySqlConnection {
    #[tracing::instrument(skip(self))]
    async fn list_tables(&self) -> Result<Vec<String>> {
        let db = self.require_database()?;
        let result = self
            .query(
                "SELECT TABLE_NAME
                 FROM information_schema.TABLES
                 WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
                 ORDER BY TABLE_NAME",
                &[Value::String(db.to_string())],
            )
            .await?;

        let tables = result
            .rows
            .iter()
            .filter_map(|row| row.get(0).and_then(|v| v.as_str()).map(|s| s.to_string()))
            .collect();

        Ok(tables)
    }

    #[tracing::instrument(skip(self))]
    async fn get_columns(&self, table: &str) -> Result<Vec<Column>> {
        let db = self.require_database()?;
        let result = self
            .query(
                "SELECT COLUMN_NAME, DATA_TYPE, COLUMN_TYPE, IS_NULLABLE, COLUMN_DEFAULT
                 FROM information_schema.COLUMNS
                 WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
                 ORDER BY ORDINAL_POSITION",
                &[
                    Value::String(db.to_string()),
                    Value::String(table.to_string()),
                ],
            )
            .await?;

        let columns = result
            .rows
            .iter()
            .map(|row| {
                let name = row_str(row.get(0));
                let data_type = row_str(row.get(1)).to_lowercase();
                let column_type = row_str(row.get(2)).to_lowercase();
                let nullable = row.get(3).and_then(|v| v.as_str()) == Some("YES");
                let default = row
                    .get(4)
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());

                Column {
                    length: display_length(&column_type),
                    unsigned: unsigned_attribute(&data_type, &column_type),
                    name,
                    data_type,
                    nullable,
                    default,
                }
            })
            .collect();

        Ok(columns)
    }

    #[tracing::instrument(skip(self))]
    async fn get_indexes(&self, table: &str) -> Result<Vec<Index>> {
        let db = self.require_database()?;
        let result = self
            .query(
                "SELECT INDEX_NAME, NON_UNIQUE, COLUMN_NAME
                 FROM information_schema.STATISTICS
                 WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
                 ORDER BY INDEX_NAME, SEQ_IN_INDEX",
                &[
                    Value::String(db.to_string()),
                    Value::String(table.to_string()),
                ],
            )
            .await?;

        let mut indexes = Vec::new();
        for row in &result.rows {
            let name = row_str(row.get(0));
            let non_unique = row.get(1).and_then(|v| v.as_i64()).unwrap_or(1);
            let column = row_str(row.get(2));
            fold_index_row(&mut indexes, &name, non_unique, column);
        }

        Ok(indexes)
    }

    #[tracing::instrument(skip(self))]
    async fn get_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let db = self.require_database()?;
        // Constraints without a referenced table are local-only and excluded
        let result = self
            .query(
                "SELECT CONSTRAINT_NAME, COLUMN_NAME, REFERENCED_TABLE_NAME, REFERENCED_COLUMN_NAME
                 FROM information_schema.KEY_COLUMN_USAGE
                 WHERE TABLE_SCHEMA = ?
                   AND TABLE_NAME = ?
                   AND REFERENCED_TABLE_NAME IS NOT NULL
                 ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION",
                &[
                    Value::String(db.to_string()),
                    Value::String(table.to_string()),
                ],
            )
            .await?;

        let mut foreign_keys = Vec::new();
        for row in &result.rows {
            let name = row_str(row.get(0));
            let column = row_str(row.get(1));
            let referenced_table = row_str(row.get(2));
            let referenced_column = row_str(row.get(3));
            fold_foreign_key_row(
                &mut foreign_keys,
                &name,
                column,
                referenced_table,
                referenced_column,
            );
        }

        Ok(foreign_keys)
    }
}
