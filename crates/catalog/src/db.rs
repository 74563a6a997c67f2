//! Connection handling and schema for the embedded catalog database.

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use bibloteka_core::DomainError;

/// Catalog storage error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Deterministic input failure (maps to HTTP 400).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Underlying database failure (maps to HTTP 500).
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// One table per entity; `ON DELETE CASCADE` keeps dependents tied to their
/// book, notifications stand alone as an append-only log.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS books(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        author TEXT,
        cover_url TEXT,
        source TEXT DEFAULT 'local',
        external_key TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS inventory(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        quantity INTEGER DEFAULT 0,
        price INTEGER,
        condition TEXT,
        owner_name TEXT,
        owner_phone TEXT,
        owner_email TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS listings(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL CHECK (type IN ('sell','rent','digital','buy')),
        book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        price INTEGER,
        quantity INTEGER,
        condition TEXT,
        contact_name TEXT,
        contact_phone TEXT,
        contact_email TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS comments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        user_name TEXT,
        text TEXT NOT NULL,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS notifications(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        message TEXT NOT NULL,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_inventory_book ON inventory(book_id)",
    "CREATE INDEX IF NOT EXISTS idx_listings_book ON listings(book_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_book ON comments(book_id)",
];

/// Handle over the embedded catalog database.
///
/// `SqlitePool` is `Send + Sync` and cheap to clone, so the store is shared
/// by cloning; SQLite's single-writer journaling serializes concurrent
/// mutations without application-level locking.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pub(crate) pool: SqlitePool,
}

impl CatalogStore {
    /// Open (creating if missing) the catalog database at `path` with WAL and
    /// enforced foreign keys, and apply the schema.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    /// In-memory store for tests. A single pooled connection keeps every
    /// query on the same `:memory:` database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(sqlx::Error::from)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    async fn apply_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Per-table row counts for the diagnostics endpoint.
    pub async fn table_counts(&self) -> Result<TableCounts, StoreError> {
        Ok(TableCounts {
            books: self.count("books").await?,
            inventory: self.count("inventory").await?,
            listings: self.count("listings").await?,
            comments: self.count("comments").await?,
            notifications: self.count("notifications").await?,
        })
    }

    async fn count(&self, table: &str) -> Result<i64, sqlx::Error> {
        // Table names come from the fixed list above, never from input.
        let row = sqlx::query(&format!("SELECT COUNT(*) AS c FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        row.try_get("c")
    }
}

/// Row counts reported by `GET /api/diag`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableCounts {
    pub books: i64,
    pub inventory: i64,
    pub listings: i64,
    pub comments: i64,
    pub notifications: i64,
}
