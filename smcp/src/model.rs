use std::sync::Arc;

use serde::{ser::SerializeMap, Serialize, Serializer};
use smcp_pool::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    /// Declared type as stored by the engine, possibly empty.
    #[serde(rename = "type")]
    pub ty: String,
    pub not_null: bool,
    /// Default expression exactly as written in the DDL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// One column pair of a foreign key. Composite keys share `id` and are
/// ordered by `seq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub id: i64,
    pub seq: i64,
    pub table: String,
    pub from: String,
    pub to: String,
    pub on_update: String,
    pub on_delete: String,
    #[serde(rename = "match")]
    pub match_type: String,
}

/// Column names plus fully scanned rows. `count` always equals `rows.len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    columns: Arc<[String]>,
    rows: Vec<Record>,
    count: usize,
}

impl QueryResult {
    pub fn new(columns: Arc<[String]>, rows: Vec<Record>) -> Self {
        let count = rows.len();
        Self {
            columns,
            rows,
            count,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// A row keyed by the column list of the cursor that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// Missing trailing values become `Null` and surplus values are dropped,
    /// so a record always has exactly one value per column.
    pub fn new(columns: Arc<[String]>, mut values: Vec<Value>) -> Self {
        values.resize(columns.len(), Value::Null);
        Self { columns, values }
    }

    /// First value under `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecuteResult {
    pub rows_affected: u64,
    /// Zero when the statement assigned no new rowid.
    #[serde(skip_serializing_if = "is_zero")]
    pub last_insert_id: i64,
    pub message: String,
}

impl ExecuteResult {
    pub fn new(rows_affected: u64, last_insert_id: i64) -> Self {
        Self {
            rows_affected,
            last_insert_id,
            message: format!(
                "Statement executed successfully, {} rows affected",
                rows_affected
            ),
        }
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
