use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL,
            categories TEXT NOT NULL,
            rating REAL,
            brand TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_products_name ON products(name);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
