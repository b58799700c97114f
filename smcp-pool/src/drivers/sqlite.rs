//! # Sqlite pool driver
//!
//! Connections come from an `r2d2` pool. Every call checks one connection out
//! on a blocking thread, runs the statement to completion and hands it back.

use std::{path::Path, time::Duration};

use r2d2_sqlite::{rusqlite, SqliteConnectionManager};
use smcp_error::Result;

use crate::{Driver, ResultSet, Row, Summary, Value};

use tokio::task::spawn_blocking;

pub const DEFAULT_MAX_SIZE: u32 = 25;
pub const DEFAULT_MIN_IDLE: u32 = 5;
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Builder {
    mgr: SqliteConnectionManager,
    max_size: u32,
    min_idle: u32,
    connection_timeout: Duration,
    memory: bool,
}

impl Builder {
    /// Each in-memory connection is its own database, so the pool is pinned
    /// to a single long-lived connection.
    pub fn memory() -> Self {
        Self {
            mgr: SqliteConnectionManager::memory(),
            max_size: 1,
            min_idle: 1,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            memory: true,
        }
    }

    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            mgr: SqliteConnectionManager::file(path),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: DEFAULT_MIN_IDLE,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            memory: false,
        }
    }

    pub fn max_size(mut self, max_size: u32) -> Self {
        if !self.memory {
            self.max_size = max_size;
        }
        self
    }

    pub fn min_idle(mut self, min_idle: u32) -> Self {
        if !self.memory {
            self.min_idle = min_idle;
        }
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Opens the pool. Blocks until the idle connections are established, so
    /// an unusable location fails here instead of on the first call.
    pub fn build(self) -> Result<SqlitePoolProxy> {
        if self.max_size == 0 {
            return Err(smcp_error::configuration!("Pool max size must be positive"));
        }
        if self.min_idle > self.max_size {
            return Err(smcp_error::configuration!(
                "Pool min idle {} is larger than max size {}",
                self.min_idle,
                self.max_size
            ));
        }

        // At least one connection is opened up front to validate the location.
        let min_idle = self.min_idle.max(1);
        let mut r2d2_builder = r2d2::Builder::new()
            .max_size(self.max_size)
            .min_idle(Some(min_idle))
            .connection_timeout(self.connection_timeout);
        if self.memory {
            r2d2_builder = r2d2_builder.idle_timeout(None).max_lifetime(None);
        }

        let pool = r2d2_builder
            .build(self.mgr)
            .map_err(|e| smcp_error::configuration!("SQLite connection error: {}", e))?;

        log::debug!(
            "SQLite pool ready, max_size: {}, min_idle: {}",
            self.max_size,
            min_idle
        );

        Ok(SqlitePoolProxy::new(pool))
    }
}

#[derive(Clone)]
pub struct SqlitePoolProxy {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl SqlitePoolProxy {
    pub fn new(pool: r2d2::Pool<SqliteConnectionManager>) -> Self {
        Self { pool }
    }

    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }
}

#[async_trait::async_trait]
impl Driver for SqlitePoolProxy {
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<Summary> {
        let sql_string = sql.to_string();
        let pool = self.pool.clone();
        let summary = spawn_blocking(move || {
            log::trace!("Get connection from pool");
            let conn = pool
                .get()
                .map_err(|e| smcp_error::connection!("Get connection from pool timeout: {}", e))?;

            log::trace!("Execute `{}`, {:?}", sql_string, params);
            let mut stmt = conn.prepare(&sql_string).map_err(|e| {
                smcp_error::execution!("Prepare execute error: {}, sql: `{}`", e, sql_string)
            })?;
            let sqlite_param: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();

            // Step to completion; RETURNING clauses and pragmas may yield rows.
            let mut rows = stmt
                .query(&sqlite_param[..])
                .map_err(|e| smcp_error::execution!("Execute error: {}", e))?;
            while rows
                .next()
                .map_err(|e| smcp_error::execution!("Execute error: {}", e))?
                .is_some()
            {}
            drop(rows);
            drop(stmt);

            Result::<Summary>::Ok(summarize(
                &sql_string,
                conn.changes() as u64,
                conn.last_insert_rowid(),
            ))
        })
        .await
        .map_err(|e| smcp_error::runtime!("Tokio join error: {}", e))??;

        Ok(summary)
    }

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<ResultSet> {
        let sql_string = sql.to_string();
        let pool = self.pool.clone();
        let set = spawn_blocking(move || {
            log::trace!("Get connection from pool");
            let conn = pool
                .get()
                .map_err(|e| smcp_error::connection!("Get connection from pool timeout: {}", e))?;

            log::trace!("Prepare query `{}`", sql_string);
            let mut stmt = conn.prepare(&sql_string).map_err(|e| {
                smcp_error::execution!("Prepare query error: {}, sql: `{}`", e, sql_string)
            })?;
            let columns = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>();

            log::trace!("Query {:?}", params);
            let sqlite_param: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
            let mut rows = stmt
                .query(&sqlite_param[..])
                .map_err(|e| smcp_error::execution!("Query error: {}", e))?;

            let mut res = Vec::<Row>::new();
            while let Some(row) = rows
                .next()
                .map_err(|e| smcp_error::execution!("Fetch row error: {}", e))?
            {
                res.push(rusqlite_row_to_row(row, columns.len())?);
            }

            Result::<ResultSet>::Ok(ResultSet { columns, rows: res })
        })
        .await
        .map_err(|e| smcp_error::runtime!("Tokio join error: {}", e))??;

        Ok(set)
    }
}

/// `changes()` and `last_insert_rowid()` keep their values across
/// statements on one connection, so only row-changing statements report them.
fn summarize(sql: &str, changes: u64, last_rowid: i64) -> Summary {
    let keyword = sql
        .trim_start()
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    let inserts = matches!(keyword.as_str(), "INSERT" | "REPLACE");
    let modifies = inserts || matches!(keyword.as_str(), "UPDATE" | "DELETE");

    let rows_affected = if modifies { changes } else { 0 };
    Summary {
        rows_affected,
        last_insert_id: if inserts && rows_affected > 0 {
            last_rowid
        } else {
            0
        },
    }
}

fn rusqlite_row_to_row(src: &rusqlite::Row<'_>, column_count: usize) -> Result<Row> {
    use rusqlite::types::ValueRef;

    let mut values = Vec::<Value>::with_capacity(column_count);
    for i in 0..column_count {
        let v = src
            .get_ref(i)
            .map_err(|e| smcp_error::execution!("Get column {} error: {}", i, e))?;
        let value = match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::I64(v),
            ValueRef::Real(v) => Value::F64(v),
            ValueRef::Text(v) => Value::Str(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Value::Bytes(v.to_vec()),
        };
        values.push(value);
    }

    Ok(Row { values })
}

impl rusqlite::ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        match &self {
            Value::Null => <Option<u8> as rusqlite::ToSql>::to_sql(&None),
            Value::Bool(v) => <bool as rusqlite::ToSql>::to_sql(v),
            Value::I64(v) => <i64 as rusqlite::ToSql>::to_sql(v),
            Value::F64(v) => <f64 as rusqlite::ToSql>::to_sql(v),
            Value::Str(v) => <String as rusqlite::ToSql>::to_sql(v),
            Value::Bytes(v) => <Vec<u8> as rusqlite::ToSql>::to_sql(v),
        }
    }
}
