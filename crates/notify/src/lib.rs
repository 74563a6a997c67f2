//! Notification bus: best-effort live fan-out of short ticker messages.
//!
//! - At-least-once acceptable (a reconnecting subscriber may see an event in
//!   both replay and live delivery)
//! - Publish order is preserved per subscriber
//! - History persistence is best-effort; a storage failure never blocks
//!   delivery to live subscribers

pub mod bus;
pub mod history;

pub use bus::{NotificationBus, Subscription, REPLAY_LIMIT};
pub use history::NotificationHistory;
