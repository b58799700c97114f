use std::future::Future;

use smcp::{pool::sqlite, Gateway};

/// Users and orders with a unique column, an explicit index and a foreign key.
pub const SHOP_SCHEMA: &[&str] = &[
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        age INTEGER,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        product_name TEXT NOT NULL,
        quantity INTEGER DEFAULT 1,
        price DECIMAL(10,2),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )",
    "CREATE INDEX idx_users_email ON users(email)",
];

pub const SHOP_USERS: &str = "INSERT INTO users (name, email, age) VALUES
    ('John Doe', 'john@example.com', 30),
    ('Jane Smith', 'jane@example.com', 25),
    ('Bob Wilson', 'bob@example.com', 35)";

/// Runs `f` against a gateway over a fresh file database. The setup
/// statements go through `Gateway::execute` first.
pub async fn run_test<Fn, Fut>(setup: &[&str], f: Fn)
where
    Fn: FnOnce(Gateway) -> Fut,
    Fut: Future<Output = ()>,
{
    env_logger::try_init().ok();

    let dir = tempfile::tempdir().unwrap();
    let pool = sqlite::Builder::file(dir.path().join("test.db"))
        .max_size(4)
        .min_idle(1)
        .build()
        .unwrap();
    let gateway = Gateway::from_driver(pool);

    for sql in setup {
        gateway.execute(sql).await.unwrap();
    }

    f(gateway).await;
}
