//! Domain vocabulary for the Bibloteka book marketplace.
//!
//! This crate contains the shared value types and the domain error model,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod contact;
pub mod error;
pub mod listing;

pub use contact::ContactInfo;
pub use error::DomainError;
pub use listing::{BookSource, ListingKind};
