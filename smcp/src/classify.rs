use std::borrow::Cow;

/// Leading keywords of statements allowed on the read path.
pub const READ_ONLY_PREFIXES: &[&str] = &["SELECT", "WITH", "EXPLAIN"];

const LOG_STATEMENT_LIMIT: usize = 100;
const ELLIPSIS: &str = "...";

/// Lexical read-only check on the leading keyword.
///
/// This is a prefix test, not a parser: a statement with a side-effecting
/// sub-clause under a read-looking prefix, or a write hidden behind a leading
/// comment, is classified by its first word only.
pub fn is_read_only(sql: &str) -> bool {
    let normalized = sql.trim().to_uppercase();
    READ_ONLY_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

/// Shortens a statement for log lines. Longer than 100 chars keeps the first
/// 97 followed by `...`.
pub fn truncate_for_log(sql: &str) -> Cow<'_, str> {
    if sql.chars().count() <= LOG_STATEMENT_LIMIT {
        return Cow::Borrowed(sql);
    }

    let keep = LOG_STATEMENT_LIMIT - ELLIPSIS.len();
    let mut short = sql.chars().take(keep).collect::<String>();
    short.push_str(ELLIPSIS);
    Cow::Owned(short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_prefixes() {
        assert!(is_read_only("SELECT 1"));
        assert!(is_read_only("select * from users"));
        assert!(is_read_only("  \n\tSelect name FROM users"));
        assert!(is_read_only("WITH t AS (SELECT 1) SELECT * FROM t"));
        assert!(is_read_only("explain query plan select 1"));
        assert!(is_read_only("EXPLAIN SELECT 1"));
    }

    #[test]
    fn test_write_statements() {
        assert!(!is_read_only("INSERT INTO users (name) VALUES ('x')"));
        assert!(!is_read_only("update users set name = 'y'"));
        assert!(!is_read_only("DELETE FROM users"));
        assert!(!is_read_only("CREATE TABLE t (a INTEGER)"));
        assert!(!is_read_only("DROP TABLE t"));
        assert!(!is_read_only("PRAGMA table_info(users)"));
    }

    #[test]
    fn test_total_on_odd_input() {
        assert!(!is_read_only(""));
        assert!(!is_read_only("   "));
        assert!(!is_read_only("SEL"));
        assert!(!is_read_only("ünïcode"));
    }

    #[test]
    fn test_lexical_limitations_are_kept() {
        // A CTE wrapping an insert still reads as a query.
        assert!(is_read_only(
            "WITH x AS (SELECT 1) INSERT INTO users (name) SELECT 'a' FROM x"
        ));
        // Only the first word counts, so a leading comment hides a select.
        assert!(!is_read_only("-- comment\nSELECT 1"));
        assert!(is_read_only("SELECTION"));
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("SELECT 1"), "SELECT 1");

        let exact = "a".repeat(100);
        assert_eq!(truncate_for_log(&exact), exact.as_str());

        let long = "b".repeat(150);
        let short = truncate_for_log(&long);
        assert_eq!(short.chars().count(), 100);
        assert!(short.ends_with("..."));
        assert!(short.starts_with(&"b".repeat(97)));

        let multibyte = "é".repeat(120);
        assert_eq!(truncate_for_log(&multibyte).chars().count(), 100);
    }
}
