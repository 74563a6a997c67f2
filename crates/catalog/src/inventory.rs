//! Inventory records: declared physical stock for a book.

use serde::Serialize;
use sqlx::Row;

use bibloteka_core::ContactInfo;

use crate::db::{CatalogStore, StoreError};

/// Input for an "add stock" action.
///
/// Quantity is stored as given, nulls included; aggregation treats null as
/// zero. No decrement operation exists, so summed stock never goes negative.
#[derive(Debug, Clone, Default)]
pub struct NewInventoryRecord {
    pub book_id: i64,
    pub quantity: Option<i64>,
    pub price: Option<i64>,
    pub condition: Option<String>,
    pub owner: ContactInfo,
}

/// Stock summary for one book: `{qty, min_price, max_price}` with null price
/// bounds when no records exist.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StockAggregate {
    pub qty: i64,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl CatalogStore {
    /// Insert an inventory record, returning its new id.
    pub async fn create_inventory(
        &self,
        record: NewInventoryRecord,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO inventory
                 (book_id, quantity, price, condition, owner_name, owner_phone, owner_email)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(record.book_id)
        .bind(record.quantity.unwrap_or(0))
        .bind(record.price)
        .bind(&record.condition)
        .bind(&record.owner.name)
        .bind(&record.owner.phone)
        .bind(&record.owner.email)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Aggregate stock across all inventory records for one book.
    pub async fn inventory_aggregate(
        &self,
        book_id: i64,
    ) -> Result<StockAggregate, StoreError> {
        let row = sqlx::query(
            "SELECT SUM(COALESCE(quantity, 0)) AS qty,
                    MIN(price) AS min_price,
                    MAX(price) AS max_price
             FROM inventory WHERE book_id = ?1",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(StockAggregate {
            // SUM over zero rows is NULL.
            qty: row.try_get::<Option<i64>, _>("qty")?.unwrap_or(0),
            min_price: row.try_get("min_price")?,
            max_price: row.try_get("max_price")?,
        })
    }
}
