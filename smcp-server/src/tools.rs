use serde_json::{json, Value as JsonValue};
use smcp::READ_ONLY_PREFIXES;

pub const SQL_MAX_LENGTH: usize = 10000;

fn sql_input(description: &str) -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "sql": {
                "type": "string",
                "description": description,
                "minLength": 1,
                "maxLength": SQL_MAX_LENGTH,
            }
        },
        "required": ["sql"],
    })
}

fn annotations(read_only: bool, destructive: bool, idempotent: bool) -> JsonValue {
    json!({
        "readOnlyHint": read_only,
        "destructiveHint": destructive,
        "idempotentHint": idempotent,
    })
}

/// Descriptors returned by `tools/list`, one per entry of `ToolHandler::TOOLS`.
pub fn descriptors() -> Vec<JsonValue> {
    vec![
        json!({
            "name": "get_schema",
            "description": "List all tables in the SQLite database with their schema information including columns, types, constraints, and indexes",
            "inputSchema": {"type": "object", "properties": {}},
            "annotations": annotations(true, false, true),
        }),
        json!({
            "name": "query",
            "description": format!(
                "Execute SELECT queries against the SQLite database. Only {} queries are allowed.",
                READ_ONLY_PREFIXES.join(", ")
            ),
            "inputSchema": sql_input("SQL SELECT query to execute"),
            "annotations": annotations(true, false, true),
        }),
        json!({
            "name": "execute",
            "description": "Execute DDL/DML operations (INSERT, UPDATE, DELETE, CREATE, ALTER, DROP, etc.) against the SQLite database. SELECT queries are not allowed - use query instead.",
            "inputSchema": sql_input("SQL statement to execute (non-SELECT operations only)"),
            "annotations": annotations(false, true, false),
        }),
    ]
}
