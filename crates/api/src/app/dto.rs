//! Request/query DTOs and their mapping into store inputs.
//!
//! Required fields are `Option` here on purpose: handlers turn their absence
//! into a 400 with a field-naming message instead of a generic 422 from the
//! JSON extractor.

use serde::Deserialize;

use bibloteka_catalog::{NewBook, NewComment, NewInventoryRecord};
use bibloteka_core::{BookSource, ContactInfo};

// -------------------------
// Query DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct BooksQuery {
    pub query: Option<String>,
    #[serde(rename = "withInventory")]
    pub with_inventory: Option<String>,
    #[serde(rename = "onlyInStock")]
    pub only_in_stock: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookIdQuery {
    pub book_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtSearchQuery {
    pub query: Option<String>,
    pub limit: Option<u32>,
    pub max: Option<u32>,
}

/// Query-string flags arrive as `1` or `true` (the frontend sends `1`).
pub fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub source: Option<BookSource>,
    pub external_key: Option<String>,
}

impl CreateBookRequest {
    pub fn into_new_book(self, title: String) -> NewBook {
        NewBook {
            title,
            author: self.author,
            cover_url: self.cover_url,
            source: self.source,
            external_key: self.external_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInventoryRequest {
    pub book_id: Option<i64>,
    pub quantity: Option<i64>,
    pub price: Option<i64>,
    pub condition: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,
}

impl CreateInventoryRequest {
    pub fn into_record(self, book_id: i64) -> NewInventoryRecord {
        NewInventoryRecord {
            book_id,
            quantity: self.quantity,
            price: self.price,
            condition: self.condition,
            owner: ContactInfo::new(self.owner_name, self.owner_phone, self.owner_email),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub book_id: Option<i64>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub condition: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl CreateListingRequest {
    pub fn contact(&self) -> ContactInfo {
        ContactInfo::new(
            self.contact_name.clone(),
            self.contact_phone.clone(),
            self.contact_email.clone(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub book_id: Option<i64>,
    pub user_name: Option<String>,
    pub text: Option<String>,
}

impl CreateCommentRequest {
    pub fn into_comment(self, book_id: i64, text: String) -> NewComment {
        NewComment {
            book_id,
            user_name: self.user_name,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_one_and_true_only() {
        assert!(flag(Some("1")));
        assert!(flag(Some("true")));
        assert!(!flag(Some("0")));
        assert!(!flag(Some("yes")));
        assert!(!flag(None));
    }
}
