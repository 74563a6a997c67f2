//! Persisted notification history; backs the bus's replay-on-connect.

use async_trait::async_trait;
use sqlx::Row;

use bibloteka_notify::NotificationHistory;

use crate::db::{CatalogStore, StoreError};

impl CatalogStore {
    /// Append one message to the notification log.
    pub async fn append_notification(&self, message: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO notifications (message) VALUES (?1)")
            .bind(message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// The most recent `limit` messages, oldest first.
    pub async fn recent_notifications(&self, limit: u32) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT message FROM notifications ORDER BY id DESC LIMIT ?1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut messages = rows
            .into_iter()
            .map(|row| row.try_get::<String, _>("message"))
            .collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }
}

#[async_trait]
impl NotificationHistory for CatalogStore {
    async fn append(&self, message: &str) -> anyhow::Result<()> {
        self.append_notification(message).await?;
        Ok(())
    }

    async fn recent(&self, limit: u32) -> anyhow::Result<Vec<String>> {
        Ok(self.recent_notifications(limit).await?)
    }
}
