//! Availability aggregation: the merged supply/demand view for one book.

use serde::Serialize;

use bibloteka_core::ListingKind;

use crate::db::{CatalogStore, StoreError};

/// One supply or demand row, regardless of whether it originates from
/// declared stock or a posted listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AvailabilityRow {
    /// `inventory` or `listing`.
    pub source: String,
    /// Listing kind; null for inventory rows and for demand rows' condition
    /// counterpart.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub quantity: i64,
    pub price: Option<i64>,
    pub condition: Option<String>,
    pub created_at: String,
}

/// The two ordered lists served by `GET /api/availability`.
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub supply: Vec<AvailabilityRow>,
    pub demand: Vec<AvailabilityRow>,
}

impl CatalogStore {
    /// Merged supply (inventory plus sell/rent/digital listings) and demand
    /// (buy listings) for one book.
    ///
    /// Supply ordering: priced rows before unpriced, then ascending price,
    /// then descending quantity, then newest first. Demand is newest first
    /// with condition forced null (buy requests have no condition semantics).
    ///
    /// Empty lists are a normal outcome, never an error.
    pub async fn availability(&self, book_id: i64) -> Result<Availability, StoreError> {
        let supply = sqlx::query_as(&format!(
            "SELECT * FROM (
                 SELECT 'inventory' AS source, NULL AS type,
                        owner_name AS name, owner_phone AS phone, owner_email AS email,
                        quantity AS quantity, price AS price, condition AS condition, created_at
                 FROM inventory WHERE book_id = ?1 AND quantity > 0
                 UNION ALL
                 SELECT 'listing' AS source, type AS type,
                        contact_name AS name, contact_phone AS phone, contact_email AS email,
                        COALESCE(quantity, 1) AS quantity, price AS price, condition AS condition, created_at
                 FROM listings
                 WHERE book_id = ?1 AND type IN ({})
                   AND COALESCE(quantity, 1) > 0
             )
             ORDER BY (price IS NULL), price ASC, quantity DESC, created_at DESC",
            supply_kind_list(),
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        let demand = sqlx::query_as(
            "SELECT 'listing' AS source, type AS type,
                    contact_name AS name, contact_phone AS phone, contact_email AS email,
                    COALESCE(quantity, 1) AS quantity, price AS price, NULL AS condition, created_at
             FROM listings WHERE book_id = ?1 AND type = 'buy'
             ORDER BY created_at DESC, id DESC",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Availability { supply, demand })
    }
}

/// Quoted SQL IN-list of the supply-side listing kinds, derived from the
/// enum so adding a variant cannot desynchronize the query.
fn supply_kind_list() -> String {
    ListingKind::ALL
        .iter()
        .filter(|kind| kind.is_supply())
        .map(|kind| format!("'{}'", kind.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}
