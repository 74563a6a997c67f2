//! Book CRUD and the filtered catalog listing.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::Row;

use bibloteka_core::{BookSource, DomainError};

use crate::db::{CatalogStore, StoreError};

/// Text search results are capped tighter than the unfiltered listing.
const SEARCH_CAP: i64 = 100;
const LISTING_CAP: i64 = 200;

/// Input for creating a book record.
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub source: Option<BookSource>,
    pub external_key: Option<String>,
}

/// Filter for the catalog listing.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Substring match against title or author.
    pub query: Option<String>,
    /// Annotate each book with its summed inventory quantity.
    pub with_inventory: bool,
    /// Keep only books whose summed inventory quantity is positive.
    /// Listings deliberately do not count toward "in stock".
    pub only_in_stock: bool,
}

/// A book as served by the API. `stock_qty` is only present when the caller
/// asked for the inventory annotation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub source: Option<String>,
    pub external_key: Option<String>,
    pub created_at: String,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_qty: Option<i64>,
}

impl CatalogStore {
    /// Insert a book, returning its new id.
    pub async fn create_book(&self, book: NewBook) -> Result<i64, StoreError> {
        if book.title.trim().is_empty() {
            return Err(DomainError::validation("title required").into());
        }

        let source = book.source.unwrap_or_default();
        let result = sqlx::query(
            "INSERT INTO books (title, author, cover_url, source, external_key)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&book.title)
        .bind(book.author.as_deref().unwrap_or(""))
        .bind(book.cover_url.as_deref().unwrap_or(""))
        .bind(source.as_str())
        .bind(&book.external_key)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Look up a book title for notification phrasing; falls back to a
    /// generic `ID n` label when the book is gone or was never there.
    pub async fn book_title_or_id(&self, book_id: i64) -> String {
        let found = sqlx::query("SELECT title FROM books WHERE id = ?1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .and_then(|row| row.try_get::<String, _>("title").ok());
        found.unwrap_or_else(|| format!("ID {book_id}"))
    }

    /// Newest-first catalog listing, optionally text-filtered and annotated
    /// with summed stock quantities.
    pub async fn list_books(&self, filter: BookFilter) -> Result<Vec<BookRow>, StoreError> {
        let mut rows: Vec<BookRow> = match filter.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let pattern = format!("%{q}%");
                sqlx::query_as(
                    "SELECT * FROM books WHERE title LIKE ?1 OR author LIKE ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2",
                )
                .bind(&pattern)
                .bind(SEARCH_CAP)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as(
                    "SELECT * FROM books ORDER BY created_at DESC, id DESC LIMIT ?1",
                )
                .bind(LISTING_CAP)
                .fetch_all(&self.pool)
                .await?
            }
        };

        if filter.with_inventory {
            let stock = self.stock_by_book().await?;
            for book in &mut rows {
                book.stock_qty = Some(stock.get(&book.id).copied().unwrap_or(0));
            }
            if filter.only_in_stock {
                rows.retain(|book| book.stock_qty.unwrap_or(0) > 0);
            }
        }

        Ok(rows)
    }

    /// Delete a book; inventory, listings and comments go with it (cascade).
    pub async fn delete_book(&self, book_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Summed inventory quantity per book. Null quantities count as zero.
    async fn stock_by_book(&self) -> Result<HashMap<i64, i64>, StoreError> {
        let rows = sqlx::query(
            "SELECT book_id, SUM(COALESCE(quantity, 0)) AS qty
             FROM inventory GROUP BY book_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stock = HashMap::with_capacity(rows.len());
        for row in rows {
            stock.insert(row.try_get("book_id")?, row.try_get("qty")?);
        }
        Ok(stock)
    }
}
