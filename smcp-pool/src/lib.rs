mod connection;
mod drivers;
mod value;

pub use connection::Connection;
pub use value::{FromValue, ToValue, Value};

pub use drivers::sqlite;

use smcp_error::Result;

/// Storage engine seam. Implementations run each statement to completion on
/// one pooled connection before returning.
#[async_trait::async_trait]
pub trait Driver: Send + Sync {
    /// Runs a statement that does not produce rows.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<Summary>;
    /// Runs a statement and scans its cursor fully.
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<ResultSet>;
}

/// What the engine reports after a non-row statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub rows_affected: u64,
    /// Zero when the statement did not assign a new rowid.
    pub last_insert_id: i64,
}

/// A fully scanned cursor. `columns` is captured once when the cursor opens.
#[derive(Debug, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub(crate) values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get<T: FromValue>(&self, index: usize) -> Result<<T as FromValue>::Output> {
        if let Some(v) = self.values.get(index) {
            Ok(T::from_value(v)?)
        } else {
            Err(smcp_error::from_value!(
                "Index out of range: index: {}, values length: {}",
                index,
                self.values.len()
            ))
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_get() {
        let row = Row::new(vec![Value::I64(1), Value::Str("bob".into()), Value::Null]);
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
        assert_eq!(row.get::<String>(1).unwrap(), "bob");
        assert_eq!(row.get::<Option<String>>(2).unwrap(), None);
        assert!(row.get::<i64>(3).is_err());
    }
}
