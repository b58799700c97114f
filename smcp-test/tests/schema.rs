use smcp::{format_tables, AUTO_INDEX_PREFIX};
use smcp_test::{run_test, SHOP_SCHEMA};

#[tokio::test]
async fn test_shop_report() {
    run_test(SHOP_SCHEMA, |gateway| async move {
        let tables = gateway.get_schema().await.unwrap();
        let report = format_tables(&tables);

        assert!(report.contains("Table: users\n"));
        assert!(report.contains("Table: orders\n"));
        assert!(report.contains("  - email (TEXT)\n"));
        assert!(report.contains("  - user_id -> users(id)\n"));
        assert!(report.contains("Foreign Keys:\n"));
        assert!(report.contains("  - idx_users_email\n"));
        assert!(report.contains("  - created_at (DATETIME) DEFAULT CURRENT_TIMESTAMP\n"));
        assert!(!report.contains(AUTO_INDEX_PREFIX));
    })
    .await;
}

#[tokio::test]
async fn test_columns_in_declaration_order() {
    run_test(SHOP_SCHEMA, |gateway| async move {
        let tables = gateway.get_schema().await.unwrap();
        assert_eq!(
            tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["users", "orders"]
        );

        let users = &tables[0];
        assert_eq!(
            users.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "name", "email", "age", "created_at"]
        );
        assert!(users.columns[0].primary_key);
        assert_eq!(users.columns[0].ty, "INTEGER");
        assert!(users.columns[1].not_null);
        assert_eq!(users.columns[4].default_value.as_deref(), Some("CURRENT_TIMESTAMP"));
        assert_eq!(users.columns[3].default_value, None);
        assert_eq!(users.indexes, vec!["idx_users_email".to_string()]);

        let orders = &tables[1];
        assert_eq!(orders.columns.len(), 5);
        assert_eq!(orders.columns[4].ty, "DECIMAL(10,2)");
        assert_eq!(orders.columns[3].default_value.as_deref(), Some("1"));
        assert_eq!(orders.foreign_keys.len(), 1);
        let fk = &orders.foreign_keys[0];
        assert_eq!((fk.from.as_str(), fk.table.as_str(), fk.to.as_str()), ("user_id", "users", "id"));
        assert_eq!(fk.on_delete, "NO ACTION");
        assert_eq!(fk.match_type, "NONE");
    })
    .await;
}

#[tokio::test]
async fn test_composite_and_implicit_foreign_keys() {
    let setup = [
        "CREATE TABLE parent (a INTEGER, b INTEGER, PRIMARY KEY (a, b))",
        "CREATE TABLE owner (code TEXT PRIMARY KEY)",
        "CREATE TABLE child (
            x INTEGER,
            y INTEGER,
            p TEXT REFERENCES owner ON DELETE CASCADE,
            FOREIGN KEY (x, y) REFERENCES parent (a, b) ON UPDATE SET NULL
        )",
    ];
    run_test(&setup, |gateway| async move {
        let tables = gateway.get_schema().await.unwrap();
        let parent = &tables[0];
        assert!(parent.columns.iter().all(|c| c.primary_key));

        let child = &tables[2];
        let mut composite = child
            .foreign_keys
            .iter()
            .filter(|fk| fk.from == "x" || fk.from == "y")
            .collect::<Vec<_>>();
        composite.sort_by_key(|fk| fk.seq);
        assert_eq!(composite.len(), 2);
        assert_eq!(composite[0].id, composite[1].id);
        assert_eq!((composite[0].seq, composite[0].to.as_str()), (0, "a"));
        assert_eq!((composite[1].seq, composite[1].to.as_str()), (1, "b"));

        let implicit = child
            .foreign_keys
            .iter()
            .find(|fk| fk.from == "p")
            .unwrap();
        assert_eq!(implicit.table, "owner");
        assert_eq!(implicit.to, "code");

        let report = format_tables(&tables);
        assert!(report.contains("  - p -> owner(code) ON DELETE CASCADE\n"));
        assert!(report.contains("  - x -> parent(a) ON UPDATE SET NULL\n"));
    })
    .await;
}

#[tokio::test]
async fn test_schema_is_not_cached() {
    run_test(&[], |gateway| async move {
        assert_eq!(
            format_tables(&gateway.get_schema().await.unwrap()),
            "No tables found in the database."
        );

        gateway
            .execute("CREATE TABLE later (v TEXT)")
            .await
            .unwrap();
        let snapshot = gateway.reflect().await.unwrap();
        assert_eq!(snapshot.tables.len(), 1);
        assert!(snapshot.skipped.is_empty());
    })
    .await;
}
