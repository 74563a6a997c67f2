//! Per-book comments.

use serde::Serialize;

use bibloteka_core::DomainError;

use crate::db::{CatalogStore, StoreError};

const COMMENTS_CAP: i64 = 200;

/// Input for posting a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub book_id: i64,
    pub user_name: Option<String>,
    pub text: String,
}

/// A comment as served by the API.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub book_id: i64,
    pub user_name: Option<String>,
    pub text: String,
    pub created_at: String,
}

impl CatalogStore {
    /// Insert a comment, returning its new id.
    pub async fn create_comment(&self, comment: NewComment) -> Result<i64, StoreError> {
        if comment.text.trim().is_empty() {
            return Err(DomainError::validation("text required").into());
        }

        let result = sqlx::query(
            "INSERT INTO comments (book_id, user_name, text) VALUES (?1, ?2, ?3)",
        )
        .bind(comment.book_id)
        .bind(&comment.user_name)
        .bind(&comment.text)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Comments for one book, newest first, capped.
    pub async fn list_comments(&self, book_id: i64) -> Result<Vec<CommentRow>, StoreError> {
        let rows = sqlx::query_as(
            "SELECT * FROM comments WHERE book_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )
        .bind(book_id)
        .bind(COMMENTS_CAP)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
