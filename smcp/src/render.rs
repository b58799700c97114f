//! Text reports handed back to tool callers.

use std::fmt::Write;

use crate::model::{ExecuteResult, QueryResult, Table};

/// Rows shown inline by `format_query`. The reported count is never capped.
pub const MAX_DISPLAY_ROWS: usize = 10;
pub const NULL_PLACEHOLDER: &str = "<NULL>";

const DEFAULT_FK_ACTION: &str = "NO ACTION";

pub fn format_tables(tables: &[Table]) -> String {
    if tables.is_empty() {
        return "No tables found in the database.".to_string();
    }

    let mut out = String::from("Database Tables:\n\n");
    for table in tables {
        out.push_str("Table: ");
        out.push_str(&table.name);
        out.push('\n');

        if !table.columns.is_empty() {
            out.push_str("Columns:\n");
            for col in &table.columns {
                let _ = write!(out, "  - {} ({})", col.name, col.ty);
                if col.not_null {
                    out.push_str(" NOT NULL");
                }
                if col.primary_key {
                    out.push_str(" PRIMARY KEY");
                }
                if let Some(default) = &col.default_value {
                    out.push_str(" DEFAULT ");
                    out.push_str(default);
                }
                out.push('\n');
            }
        }

        if !table.indexes.is_empty() {
            out.push_str("Indexes:\n");
            for index in &table.indexes {
                let _ = writeln!(out, "  - {}", index);
            }
        }

        if !table.foreign_keys.is_empty() {
            out.push_str("Foreign Keys:\n");
            for fk in &table.foreign_keys {
                let _ = write!(out, "  - {} -> {}({})", fk.from, fk.table, fk.to);
                if fk.on_delete != DEFAULT_FK_ACTION {
                    let _ = write!(out, " ON DELETE {}", fk.on_delete);
                }
                if fk.on_update != DEFAULT_FK_ACTION {
                    let _ = write!(out, " ON UPDATE {}", fk.on_update);
                }
                out.push('\n');
            }
        }
        out.push('\n');
    }

    out
}

pub fn format_query(result: &QueryResult) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "Query Results:\nColumns: {}\nRow Count: {}\n\n",
        result.columns().join(", "),
        result.count()
    );

    if result.count() > 0 {
        out.push_str("Data:\n");
        for (i, row) in result.rows().iter().enumerate() {
            if i >= MAX_DISPLAY_ROWS {
                let _ = writeln!(out, "... (showing first {} rows)", MAX_DISPLAY_ROWS);
                break;
            }

            let pairs = row
                .iter()
                .map(|(col, value)| {
                    if value.is_null() {
                        format!("{}={}", col, NULL_PLACEHOLDER)
                    } else {
                        format!("{}={}", col, value)
                    }
                })
                .collect::<Vec<_>>();
            let _ = writeln!(out, "Row {}: {}", i + 1, pairs.join(", "));
        }
    }

    out
}

pub fn format_execute(result: &ExecuteResult) -> String {
    let mut out = String::from("Execution Result:\n");
    let _ = writeln!(out, "Rows Affected: {}", result.rows_affected);
    if result.last_insert_id > 0 {
        let _ = writeln!(out, "Last Insert ID: {}", result.last_insert_id);
    }
    let _ = writeln!(out, "Message: {}", result.message);
    out
}
