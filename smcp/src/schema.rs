use smcp_error::Result;
use smcp_pool::{Connection, ToValue};

use crate::model::{Column, ForeignKey, Table};

/// Prefix the engine gives to indexes it creates for UNIQUE and PRIMARY KEY
/// constraints.
pub const AUTO_INDEX_PREFIX: &str = "sqlite_autoindex";

const LIST_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'";
const TABLE_COLUMNS_SQL: &str =
    r#"SELECT name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1)"#;
const TABLE_INDEXES_SQL: &str = "SELECT name FROM pragma_index_list(?1)";
const TABLE_FOREIGN_KEYS_SQL: &str = r#"SELECT id, seq, "table", "from", "to", on_update, on_delete, "match" FROM pragma_foreign_key_list(?1)"#;
const PRIMARY_KEY_COLUMNS_SQL: &str =
    "SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk";

/// Best-effort reflection of every user table. Tables that failed to reflect
/// are listed in `skipped`, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub tables: Vec<Table>,
    pub skipped: Vec<String>,
}

impl SchemaSnapshot {
    fn absorb(mut self, name: String, reflected: Result<Table>) -> Self {
        match reflected {
            Ok(table) => self.tables.push(table),
            Err(e) => {
                log::error!("Failed to get table info for table {}: {}", name, e);
                self.skipped.push(name);
            }
        }
        self
    }
}

pub(crate) async fn reflect(conn: &Connection) -> Result<SchemaSnapshot> {
    log::debug!("Get database schema");

    let names = conn
        .query_map(LIST_TABLES_SQL, vec![], |row| row.get::<String>(0))
        .await
        .map_err(|e| {
            log::error!("Failed to retrieve table names: {}", e);
            smcp_error::reflection!("failed to retrieve table information")
        })?;

    let mut snapshot = SchemaSnapshot {
        tables: Vec::with_capacity(names.len()),
        skipped: vec![],
    };
    for name in names {
        let reflected = reflect_table(conn, &name).await;
        snapshot = snapshot.absorb(name, reflected);
    }

    log::info!(
        "Successfully retrieved table information, table_count: {}, skipped: {}",
        snapshot.tables.len(),
        snapshot.skipped.len()
    );

    Ok(snapshot)
}

async fn reflect_table(conn: &Connection, name: &str) -> Result<Table> {
    let columns = conn
        .query_map(TABLE_COLUMNS_SQL, vec![name.to_value()], |row| {
            Ok(Column {
                name: row.get::<String>(0)?,
                ty: row.get::<Option<String>>(1)?.unwrap_or_default(),
                not_null: row.get::<bool>(2)?,
                default_value: row.get::<Option<String>>(3)?,
                primary_key: row.get::<i64>(4)? > 0,
            })
        })
        .await?;

    let indexes = conn
        .query_map(TABLE_INDEXES_SQL, vec![name.to_value()], |row| {
            row.get::<String>(0)
        })
        .await?
        .into_iter()
        .filter(|index| !index.starts_with(AUTO_INDEX_PREFIX))
        .collect::<Vec<_>>();

    let mut foreign_keys = Vec::<ForeignKey>::new();
    let rows = conn
        .query_map(TABLE_FOREIGN_KEYS_SQL, vec![name.to_value()], |row| {
            Ok((
                ForeignKey {
                    id: row.get::<i64>(0)?,
                    seq: row.get::<i64>(1)?,
                    table: row.get::<String>(2)?,
                    from: row.get::<String>(3)?,
                    to: String::new(),
                    on_update: row.get::<String>(5)?,
                    on_delete: row.get::<String>(6)?,
                    match_type: row.get::<String>(7)?,
                },
                row.get::<Option<String>>(4)?,
            ))
        })
        .await?;
    for (mut fk, to) in rows {
        fk.to = match to {
            Some(to) => to,
            None => implicit_target(conn, &fk.table, fk.seq).await?,
        };
        foreign_keys.push(fk);
    }

    Ok(Table {
        name: name.to_string(),
        columns,
        indexes,
        foreign_keys,
    })
}

/// `REFERENCES parent` without a column list targets the parent's primary key.
async fn implicit_target(conn: &Connection, table: &str, seq: i64) -> Result<String> {
    let pk = conn
        .query_map(PRIMARY_KEY_COLUMNS_SQL, vec![table.to_value()], |row| {
            row.get::<String>(0)
        })
        .await?;

    Ok(usize::try_from(seq)
        .ok()
        .and_then(|i| pk.into_iter().nth(i))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use smcp_error::ErrorKind;
    use smcp_pool::{Driver, ResultSet, Row, Summary, Value};

    use super::*;

    /// Serves a canned catalog and fails column lookups for one table.
    struct CatalogDouble {
        tables: Vec<&'static str>,
        broken: &'static str,
        list_fails: bool,
    }

    fn text(v: &str) -> Value {
        Value::Str(v.into())
    }

    fn set(columns: &[&str], rows: Vec<Vec<Value>>) -> ResultSet {
        ResultSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.into_iter().map(Row::new).collect(),
        }
    }

    #[async_trait::async_trait]
    impl Driver for CatalogDouble {
        async fn execute(&self, _sql: &str, _params: Vec<Value>) -> Result<Summary> {
            unreachable!()
        }

        async fn query(&self, sql: &str, params: Vec<Value>) -> Result<ResultSet> {
            if sql == LIST_TABLES_SQL {
                if self.list_fails {
                    return Err(smcp_error::execution!("database disk image is malformed"));
                }
                let rows = self.tables.iter().map(|t| vec![text(t)]).collect();
                return Ok(set(&["name"], rows));
            }

            let table = match params.first() {
                Some(Value::Str(t)) => t.clone(),
                _ => unreachable!(),
            };
            if sql == TABLE_COLUMNS_SQL {
                if table == self.broken {
                    return Err(smcp_error::execution!("no such table: {}", table));
                }
                return Ok(set(
                    &["name", "type", "notnull", "dflt_value", "pk"],
                    vec![
                        vec![text("id"), text("INTEGER"), Value::I64(0), Value::Null, Value::I64(1)],
                        vec![text("label"), text(""), Value::I64(1), text("'none'"), Value::I64(0)],
                    ],
                ));
            }
            if sql == TABLE_INDEXES_SQL {
                return Ok(set(
                    &["name"],
                    vec![
                        vec![text("idx_label")],
                        vec![text("sqlite_autoindex_t_1")],
                    ],
                ));
            }
            if sql == TABLE_FOREIGN_KEYS_SQL {
                return Ok(set(&["id"], vec![]));
            }
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_skips_broken_table() {
        let conn = Connection::from_driver(CatalogDouble {
            tables: vec!["alpha", "broken", "gamma"],
            broken: "broken",
            list_fails: false,
        });

        let snapshot = reflect(&conn).await.unwrap();
        assert_eq!(
            snapshot.tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["alpha", "gamma"]
        );
        assert_eq!(snapshot.skipped, vec!["broken".to_string()]);

        let alpha = &snapshot.tables[0];
        assert_eq!(alpha.columns.len(), 2);
        assert!(alpha.columns[0].primary_key);
        assert_eq!(alpha.columns[1].ty, "");
        assert!(alpha.columns[1].not_null);
        assert_eq!(alpha.columns[1].default_value.as_deref(), Some("'none'"));
        assert_eq!(alpha.indexes, vec!["idx_label".to_string()]);
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let conn = Connection::from_driver(CatalogDouble {
            tables: vec![],
            broken: "",
            list_fails: true,
        });

        let err = reflect(&conn).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reflection);
        assert_eq!(err.message(), "failed to retrieve table information");
    }
}
