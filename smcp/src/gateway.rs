use smcp_error::Result;
use smcp_pool::{Connection, Driver};

use crate::{
    classify::{is_read_only, truncate_for_log},
    model::{ExecuteResult, QueryResult, Table},
    normalize,
    schema::{self, SchemaSnapshot},
};

/// Routes statements to the engine after checking them against the declared
/// intent. Engine error text is logged here and replaced by a generic message.
#[derive(Clone)]
pub struct Gateway {
    conn: Connection,
}

impl Gateway {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn from_driver<D: Driver + 'static>(driver: D) -> Self {
        Self::new(Connection::from_driver(driver))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub async fn reflect(&self) -> Result<SchemaSnapshot> {
        schema::reflect(&self.conn).await
    }

    pub async fn get_schema(&self) -> Result<Vec<Table>> {
        Ok(self.reflect().await?.tables)
    }

    pub async fn query(&self, sql: &str) -> Result<QueryResult> {
        log::debug!("Executing query: {}", truncate_for_log(sql));

        if !is_read_only(sql) {
            return Err(smcp_error::policy_violation!(
                "only SELECT queries are allowed for query operations"
            ));
        }

        let set = self.conn.query(sql, vec![]).await.map_err(|e| {
            log::error!("Query execution failed: {}", e);
            smcp_error::execution!("query execution failed")
        })?;
        let result = normalize::query_result(set);

        log::info!(
            "Query executed successfully, rows_returned: {}",
            result.count()
        );
        Ok(result)
    }

    pub async fn execute(&self, sql: &str) -> Result<ExecuteResult> {
        log::debug!("Executing statement: {}", truncate_for_log(sql));

        if is_read_only(sql) {
            return Err(smcp_error::policy_violation!(
                "SELECT queries should use the query operation instead"
            ));
        }

        let summary = self.conn.execute(sql, vec![]).await.map_err(|e| {
            log::error!("Statement execution failed: {}", e);
            smcp_error::execution!("statement execution failed")
        })?;
        let result = ExecuteResult::new(summary.rows_affected, summary.last_insert_id);

        log::info!(
            "Statement executed successfully, rows_affected: {}, last_insert_id: {}",
            result.rows_affected,
            result.last_insert_id
        );
        Ok(result)
    }
}
