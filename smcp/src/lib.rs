//! # Statement gateway
//!
//! Exposes a SQLite database through three operations: schema reflection,
//! read-only queries and write/DDL execution. Statements are classified
//! lexically before they reach the engine, and results are rendered into a
//! stable text report for tool callers.

mod classify;
mod gateway;
mod handler;
mod model;
mod normalize;
mod render;
mod schema;

pub use async_trait::async_trait;
pub use smcp_error as error;
pub use smcp_pool as pool;

pub use classify::{is_read_only, truncate_for_log, READ_ONLY_PREFIXES};
pub use gateway::Gateway;
pub use handler::{
    ToolHandler, ToolOutput, EXECUTE_FAILED, EXECUTE_SQL_INVALID, GET_SCHEMA_FAILED, QUERY_FAILED,
    QUERY_SQL_REQUIRED,
};
pub use model::{Column, ExecuteResult, ForeignKey, QueryResult, Record, Table};
pub use render::{
    format_execute, format_query, format_tables, MAX_DISPLAY_ROWS, NULL_PLACEHOLDER,
};
pub use schema::{SchemaSnapshot, AUTO_INDEX_PREFIX};
