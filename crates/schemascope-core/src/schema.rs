//! Normalized schema model and the introspection trait

use crate::{Result, SchemaScopeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Column information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Lower-case canonical type name (e.g. "varchar", "int", "enum")
    pub data_type: String,
    /// Displayed character/display length, None when not applicable
    pub length: Option<u32>,
    pub nullable: bool,
    /// Default value expression, None when the column has no default
    pub default: Option<String>,
    /// Whether the column is unsigned. None when the source metadata does
    /// not carry the attribute for this column type.
    pub unsigned: Option<bool>,
}

/// Index information. Composite key order matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub is_primary: bool,
}

/// Foreign key information.
///
/// `local_columns` and `referenced_columns` have equal length and positional
/// correspondence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: String,
    pub local_columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

/// A table with its structural metadata. Column order reflects declaration
/// order in the source database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Whether any index is flagged as the primary key
    pub fn has_primary_key(&self) -> bool {
        self.indexes.iter().any(|i| i.is_primary)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// The complete set of tables and their structural metadata for one
/// database connection. Built fresh on every invocation, never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Tables keyed by name, iterated in name order
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Table)> {
        self.tables.iter()
    }

    /// Check the structural invariants of the model.
    ///
    /// Fails with a `Metadata` error when the source reported something
    /// internally inconsistent: duplicate column names, more than one
    /// primary index, an index or foreign key referencing a column the
    /// table does not have, or a foreign key whose local and referenced
    /// column lists differ in length.
    pub fn validate(&self) -> Result<()> {
        for (name, table) in &self.tables {
            let mut seen = BTreeSet::new();
            for column in &table.columns {
                if !seen.insert(column.name.as_str()) {
                    return Err(SchemaScopeError::Metadata(format!(
                        "table '{}' reports column '{}' more than once",
                        name, column.name
                    )));
                }
            }

            let primary_count = table.indexes.iter().filter(|i| i.is_primary).count();
            if primary_count > 1 {
                return Err(SchemaScopeError::Metadata(format!(
                    "table '{}' reports {} primary indexes",
                    name, primary_count
                )));
            }

            for index in &table.indexes {
                for column in &index.columns {
                    if table.column(column).is_none() {
                        return Err(SchemaScopeError::Metadata(format!(
                            "index '{}' on table '{}' references unknown column '{}'",
                            index.name, name, column
                        )));
                    }
                }
            }

            for fk in &table.foreign_keys {
                if fk.local_columns.len() != fk.referenced_columns.len() {
                    return Err(SchemaScopeError::Metadata(format!(
                        "foreign key '{}' on table '{}' maps {} local columns to {} referenced columns",
                        fk.name,
                        name,
                        fk.local_columns.len(),
                        fk.referenced_columns.len()
                    )));
                }
                for column in &fk.local_columns {
                    if table.column(column).is_none() {
                        return Err(SchemaScopeError::Metadata(format!(
                            "foreign key '{}' on table '{}' references unknown column '{}'",
                            fk.name, name, column
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Schema introspection interface.
///
/// Implementations provide the per-table metadata listings; `read_schema`
/// assembles them into a validated [`Schema`]. All listings are read-only.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// List all base tables visible on the connection, in listing order
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Get columns for a table, in declaration order
    async fn get_columns(&self, table: &str) -> Result<Vec<Column>>;

    /// Get indexes for a table, composite columns grouped in key order
    async fn get_indexes(&self, table: &str) -> Result<Vec<Index>>;

    /// Get foreign keys for a table. Constraints whose referenced table is
    /// absent (local-only constraints) are excluded.
    async fn get_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>>;

    /// Read the full schema: one table listing, then a per-table fan-out in
    /// listing order. Fails when the connection cannot be reached, a
    /// metadata query is rejected, or the assembled schema is internally
    /// inconsistent.
    async fn read_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new();
        for table in self.list_tables().await? {
            let columns = self.get_columns(&table).await?;
            let indexes = self.get_indexes(&table).await?;
            let foreign_keys = self.get_foreign_keys(&table).await?;
            schema.insert(
                table,
                Table {
                    columns,
                    indexes,
                    foreign_keys,
                },
            );
        }
        schema.validate()?;
        tracing::debug!(tables = schema.len(), "schema read complete");
        Ok(schema)
    }
}
