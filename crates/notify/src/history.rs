//! Persistence seam for the notification bus.

use async_trait::async_trait;

/// Durable append-only log of notification messages.
///
/// Implemented by the catalog store; the bus only needs append and a bounded
/// tail for replay-on-connect.
#[async_trait]
pub trait NotificationHistory: Send + Sync {
    /// Append one message to the persisted history.
    async fn append(&self, message: &str) -> anyhow::Result<()>;

    /// The most recent `limit` messages, oldest first.
    async fn recent(&self, limit: u32) -> anyhow::Result<Vec<String>>;
}
