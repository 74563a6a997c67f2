//! Catalog store: durable CRUD for books, inventory, listings, comments and
//! the notification history, plus the availability aggregation over them.
//!
//! Backed by one embedded SQLite database (WAL, foreign keys enforced with
//! cascading delete from books). All access goes through [`CatalogStore`].

pub mod availability;
pub mod books;
pub mod comments;
pub mod db;
pub mod inventory;
pub mod listings;
pub mod notifications;


pub use availability::{Availability, AvailabilityRow};
pub use books::{BookFilter, BookRow, NewBook};
pub use comments::{CommentRow, NewComment};
pub use db::{CatalogStore, StoreError, TableCounts};
pub use inventory::{NewInventoryRecord, StockAggregate};
pub use listings::{ListingRow, NewListing};
