//! MySQL connection implementation

use async_trait::async_trait;
use mysql_async::{
    Conn, Opts, OptsBuilder, Params, Pool, PoolConstraints, PoolOpts, Row as MySqlRow,
    consts::ColumnType, prelude::*,
};
use schemascope_core::{Connection, QueryResult, Result, Row, SchemaScopeError, Value};

/// MySQL connection wrapper
pub struct MySqlConnection {
    pool: Pool,
    /// Stored at connect time so introspection can resolve the active
    /// database to a concrete name instead of relying on `DATABASE()`,
    /// which returns NULL when no database was selected.
    database_name: Option<String>,
}

impl MySqlConnection {
    /// Connect to a MySQL database and verify connectivity
    pub async fn connect(
        host: &str,
        port: u16,
        database: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        tracing::info!(host = %host, port = %port, database = ?database, "connecting to MySQL database");

        let mut opts_builder = OptsBuilder::from_opts(Opts::default())
            .ip_or_hostname(host)
            .tcp_port(port);

        if let Some(db) = database {
            opts_builder = opts_builder.db_name(Some(db));
        }
        if let Some(u) = user {
            opts_builder = opts_builder.user(Some(u));
        }
        if let Some(p) = password {
            opts_builder = opts_builder.pass(Some(p));
        }

        let constraints = PoolConstraints::new(1, 1).ok_or_else(|| {
            SchemaScopeError::Connection(
                "Failed to configure MySQL pool constraints (min=1, max=1)".into(),
            )
        })?;
        let pool_opts = PoolOpts::default()
            .with_constraints(constraints)
            .with_reset_connection(false);
        opts_builder = opts_builder.pool_opts(pool_opts);

        let pool = Pool::new(Opts::from(opts_builder));

        // Verify connectivity by acquiring and releasing a connection
        let mut conn = pool.get_conn().await.map_err(|e| {
            SchemaScopeError::Connection(format!("Failed to connect to MySQL: {}", e))
        })?;

        // Resolve the active database name so introspection can use a
        // concrete value instead of DATABASE() at query time.
        let database_name = if let Some(db) = database {
            Some(db.to_string())
        } else {
            let row: Option<(Option<String>,)> = conn
                .query_first("SELECT DATABASE()")
                .await
                .map_err(|e| {
                    SchemaScopeError::Query(format!("Failed to query DATABASE(): {}", e))
                })?;
            row.and_then(|(db,)| db)
        };
        drop(conn);

        tracing::info!(host = %host, port = %port, database = ?database_name, "MySQL connection established");
        Ok(Self {
            pool,
            database_name,
        })
    }

    /// Get a connection from the pool
    async fn get_conn(&self) -> Result<Conn> {
        self.pool.get_conn().await.map_err(|e| {
            SchemaScopeError::Connection(format!("Failed to get MySQL connection: {}", e))
        })
    }

    /// The active database name, resolved at connect time.
    ///
    /// In MySQL, "schema" and "database" are synonymous; introspection
    /// queries scope on this value.
    pub fn database(&self) -> Option<&str> {
        self.database_name.as_deref()
    }

    /// The active database name, or a configuration error when the
    /// connection has no database selected
    pub(crate) fn require_database(&self) -> Result<&str> {
        self.database_name.as_deref().ok_or_else(|| {
            SchemaScopeError::Configuration(
                "no database selected on this connection; set one in the connection profile"
                    .into(),
            )
        })
    }
}

/// Convert a schemascope value into a mysql_async parameter value
fn value_to_mysql_param(value: &Value) -> mysql_async::Value {
    match value {
        Value::Null => mysql_async::Value::NULL,
        Value::Bool(v) => mysql_async::Value::Int(i64::from(*v)),
        Value::Int64(v) => mysql_async::Value::Int(*v),
        Value::UInt64(v) => mysql_async::Value::UInt(*v),
        Value::Float64(v) => mysql_async::Value::Double(*v),
        Value::Decimal(v) => mysql_async::Value::Bytes(v.clone().into_bytes()),
        Value::String(v) => mysql_async::Value::Bytes(v.clone().into_bytes()),
        Value::Bytes(v) => mysql_async::Value::Bytes(v.clone()),
        Value::Date(v) => mysql_async::Value::Bytes(v.to_string().into_bytes()),
        Value::Time(v) => mysql_async::Value::Bytes(v.to_string().into_bytes()),
        Value::DateTime(v) => {
            mysql_async::Value::Bytes(v.format("%Y-%m-%d %H:%M:%S").to_string().into_bytes())
        }
    }
}

/// Convert a mysql_async value to our value type, using column type metadata
/// to correctly interpret byte strings from the text protocol.
fn mysql_value_to_value(val: mysql_async::Value, col_type: ColumnType) -> Value {
    match val {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(bytes) => {
            if let Ok(s) = String::from_utf8(bytes.clone()) {
                match col_type {
                    ColumnType::MYSQL_TYPE_TINY
                    | ColumnType::MYSQL_TYPE_SHORT
                    | ColumnType::MYSQL_TYPE_LONG
                    | ColumnType::MYSQL_TYPE_LONGLONG
                    | ColumnType::MYSQL_TYPE_INT24
                    | ColumnType::MYSQL_TYPE_YEAR => s
                        .parse::<i64>()
                        .map(Value::Int64)
                        .unwrap_or(Value::String(s)),
                    ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => s
                        .parse::<f64>()
                        .map(Value::Float64)
                        .unwrap_or(Value::String(s)),
                    ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                        Value::Decimal(s)
                    }
                    _ => Value::String(s),
                }
            } else {
                Value::Bytes(bytes)
            }
        }
        mysql_async::Value::Int(i) => Value::Int64(i),
        mysql_async::Value::UInt(u) => Value::UInt64(u),
        mysql_async::Value::Float(f) => Value::Float64(f as f64),
        mysql_async::Value::Double(d) => Value::Float64(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            if hour == 0 && min == 0 && sec == 0 && micro == 0 {
                if let Some(date) =
                    chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                {
                    Value::Date(date)
                } else {
                    Value::String(format!("{:04}-{:02}-{:02}", year, month, day))
                }
            } else if let Some(dt) =
                chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                    .and_then(|d| d.and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro))
            {
                Value::DateTime(dt)
            } else {
                Value::String(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, min, sec
                ))
            }
        }
        mysql_async::Value::Time(negative, days, hours, mins, secs, micros) => {
            if !negative && days == 0 {
                if let Some(time) = chrono::NaiveTime::from_hms_micro_opt(
                    hours as u32,
                    mins as u32,
                    secs as u32,
                    micros,
                ) {
                    return Value::Time(time);
                }
            }
            let total_hours = (days as u32) * 24 + (hours as u32);
            let sign = if negative { "-" } else { "" };
            Value::String(format!(
                "{}{:02}:{:02}:{:02}.{:06}",
                sign, total_hours, mins, secs, micros
            ))
        }
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let mut conn = self.get_conn().await?;

        let mysql_rows: Vec<MySqlRow> = if params.is_empty() {
            conn.query(sql)
                .await
                .map_err(|e| SchemaScopeError::Query(format!("Failed to execute query: {}", e)))?
        } else {
            let positional = Params::Positional(params.iter().map(value_to_mysql_param).collect());
            conn.exec(sql, positional)
                .await
                .map_err(|e| SchemaScopeError::Query(format!("Failed to execute query: {}", e)))?
        };

        let mut column_names = Vec::new();
        let mut column_types = Vec::new();
        if let Some(first_row) = mysql_rows.first() {
            for col in first_row.columns_ref() {
                column_names.push(col.name_str().to_string());
                column_types.push(col.column_type());
            }
        }

        let mut rows = Vec::new();
        for mysql_row in mysql_rows {
            let mut values = Vec::new();
            for idx in 0..column_names.len() {
                let mysql_val: mysql_async::Value =
                    mysql_row.get(idx).unwrap_or(mysql_async::Value::NULL);
                let col_type = column_types
                    .get(idx)
                    .copied()
                    .unwrap_or(ColumnType::MYSQL_TYPE_STRING);
                values.push(mysql_value_to_value(mysql_val, col_type));
            }
            rows.push(Row::new(column_names.clone(), values));
        }

        tracing::debug!(row_count = rows.len(), "query executed");
        Ok(QueryResult {
            columns: column_names,
            rows,
        })
    }
}
