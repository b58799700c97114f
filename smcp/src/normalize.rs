use std::sync::Arc;

use smcp_pool::ResultSet;

use crate::model::{QueryResult, Record};

/// Shapes a scanned cursor into a `QueryResult`. Every record shares the
/// column list captured when the cursor opened.
pub(crate) fn query_result(set: ResultSet) -> QueryResult {
    let columns: Arc<[String]> = set.columns.into();
    let rows = set
        .rows
        .into_iter()
        .map(|row| Record::new(columns.clone(), row.into_values()))
        .collect::<Vec<_>>();

    QueryResult::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use smcp_pool::{Row, Value};

    use super::*;

    #[test]
    fn test_preserves_order_and_nulls() {
        let set = ResultSet {
            columns: vec!["id".into(), "email".into(), "score".into()],
            rows: vec![
                Row::new(vec![Value::I64(1), Value::Null, Value::F64(0.5)]),
                Row::new(vec![
                    Value::I64(2),
                    Value::Str("".into()),
                    Value::I64(0),
                ]),
            ],
        };

        let result = query_result(set);
        assert_eq!(result.columns(), &["id", "email", "score"]);
        assert_eq!(result.count(), 2);
        assert_eq!(result.count(), result.rows().len());

        let first = &result.rows()[0];
        assert_eq!(first.get("email"), Some(&Value::Null));
        let second = &result.rows()[1];
        assert_eq!(second.get("email"), Some(&Value::Str("".into())));
        assert_eq!(
            second.iter().map(|(c, _)| c).collect::<Vec<_>>(),
            vec!["id", "email", "score"]
        );
    }

    #[test]
    fn test_empty_cursor() {
        let result = query_result(ResultSet {
            columns: vec!["a".into()],
            rows: vec![],
        });
        assert_eq!(result.columns(), &["a"]);
        assert_eq!(result.count(), 0);
    }
}
