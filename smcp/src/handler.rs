use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    gateway::Gateway,
    render::{format_execute, format_query, format_tables},
};

pub const GET_SCHEMA_FAILED: &str =
    "Failed to retrieve table information. Please check your database connection.";
pub const QUERY_SQL_REQUIRED: &str = "SQL query parameter is required";
pub const QUERY_FAILED: &str = "Query execution failed. Please check your SQL syntax and try again.";
pub const EXECUTE_SQL_INVALID: &str = "Missing or invalid 'sql' argument";
pub const EXECUTE_FAILED: &str =
    "Statement execution failed. Please check your SQL syntax and try again.";

/// Text result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub fn error<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Maps tool names and argument objects onto gateway calls.
#[derive(Clone)]
pub struct ToolHandler {
    gateway: Gateway,
}

impl ToolHandler {
    pub const TOOLS: [&'static str; 3] = ["get_schema", "query", "execute"];

    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub async fn call(&self, name: &str, args: Option<&JsonValue>) -> ToolOutput {
        match name {
            "get_schema" => self.get_schema().await,
            "query" => self.query(args).await,
            "execute" => self.execute(args).await,
            _ => ToolOutput::error(format!("Unknown tool: {}", name)),
        }
    }

    pub async fn get_schema(&self) -> ToolOutput {
        log::info!("Handling get_schema request");

        match self.gateway.get_schema().await {
            Ok(tables) => ToolOutput::ok(format_tables(&tables)),
            Err(e) => {
                log::error!("Failed to list tables: {}", e);
                ToolOutput::error(GET_SCHEMA_FAILED)
            }
        }
    }

    pub async fn query(&self, args: Option<&JsonValue>) -> ToolOutput {
        log::info!("Handling query request");

        let sql = match sql_argument(args) {
            Some(sql) if !sql.is_empty() => sql,
            _ => return ToolOutput::error(QUERY_SQL_REQUIRED),
        };

        match self.gateway.query(sql).await {
            Ok(result) => ToolOutput::ok(format_query(&result)),
            Err(e) => {
                log::error!("Query execution failed: {}", e);
                ToolOutput::error(QUERY_FAILED)
            }
        }
    }

    pub async fn execute(&self, args: Option<&JsonValue>) -> ToolOutput {
        log::info!("Handling execute request");

        let sql = match sql_argument(args) {
            Some(sql) => sql,
            None => return ToolOutput::error(EXECUTE_SQL_INVALID),
        };

        match self.gateway.execute(sql).await {
            Ok(result) => ToolOutput::ok(format_execute(&result)),
            Err(e) => {
                log::error!("Statement execution failed: {}", e);
                ToolOutput::error(EXECUTE_FAILED)
            }
        }
    }
}

fn sql_argument(args: Option<&JsonValue>) -> Option<&str> {
    args?.get("sql")?.as_str()
}
