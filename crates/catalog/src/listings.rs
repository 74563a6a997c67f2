//! Marketplace listings: sell/rent/digital offers and buy requests.

use serde::Serialize;

use bibloteka_core::{ContactInfo, ListingKind};

use crate::db::{CatalogStore, StoreError};

/// The global feed (no book filter) returns at most this many listings.
const FEED_CAP: i64 = 100;

/// Input for posting a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub kind: ListingKind,
    pub book_id: i64,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub condition: Option<String>,
    pub contact: ContactInfo,
}

/// A listing as served by the API.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ListingRow {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub book_id: i64,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub condition: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: String,
}

impl CatalogStore {
    /// Insert a listing, returning its new id. Quantity defaults to 1 when
    /// absent.
    pub async fn create_listing(&self, listing: NewListing) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO listings
                 (type, book_id, price, quantity, condition,
                  contact_name, contact_phone, contact_email)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(listing.kind.as_str())
        .bind(listing.book_id)
        .bind(listing.price)
        .bind(listing.quantity.unwrap_or(1))
        .bind(&listing.condition)
        .bind(&listing.contact.name)
        .bind(&listing.contact.phone)
        .bind(&listing.contact.email)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All listings for one book (newest first), or the global recent feed
    /// when no book is given.
    pub async fn list_listings(
        &self,
        book_id: Option<i64>,
    ) -> Result<Vec<ListingRow>, StoreError> {
        let rows = match book_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT * FROM listings WHERE book_id = ?1
                     ORDER BY created_at DESC, id DESC",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT * FROM listings ORDER BY created_at DESC, id DESC LIMIT ?1",
                )
                .bind(FEED_CAP)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }
}
