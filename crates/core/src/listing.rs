use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The four listing variants a book can be offered (or requested) under.
///
/// `Sell`, `Rent` and `Digital` are supply-side: they carry a meaningful price
/// and condition. `Buy` is demand-side: price is optional and condition does
/// not apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Sell,
    Rent,
    Digital,
    Buy,
}

impl ListingKind {
    pub const ALL: [ListingKind; 4] = [Self::Sell, Self::Rent, Self::Digital, Self::Buy];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Rent => "rent",
            Self::Digital => "digital",
            Self::Buy => "buy",
        }
    }

    /// True for the variants that count toward supply (everything but `Buy`).
    pub fn is_supply(self) -> bool {
        !matches!(self, Self::Buy)
    }

    /// Verb used when phrasing the ticker notification for a new listing.
    ///
    /// Exhaustive on purpose: adding a variant forces a phrasing decision.
    pub fn notification_verb(self) -> &'static str {
        match self {
            Self::Sell => "put up for sale",
            Self::Rent => "offered for rent",
            Self::Digital => "shared digitally",
            Self::Buy => "is looking for",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sell" => Ok(Self::Sell),
            "rent" => Ok(Self::Rent),
            "digital" => Ok(Self::Digital),
            "buy" => Ok(Self::Buy),
            other => Err(DomainError::validation(format!(
                "type must be one of sell, rent, digital, buy (got {other:?})"
            ))),
        }
    }
}

/// Where a book record came from: manual entry or an external search result.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSource {
    Local,
    Api,
}

impl BookSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Api => "api",
        }
    }
}

impl Default for BookSource {
    fn default() -> Self {
        Self::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in ListingKind::ALL {
            assert_eq!(kind.as_str().parse::<ListingKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_a_validation_error() {
        let err = "lend".parse::<ListingKind>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn only_buy_counts_as_demand() {
        assert!(ListingKind::Sell.is_supply());
        assert!(ListingKind::Rent.is_supply());
        assert!(ListingKind::Digital.is_supply());
        assert!(!ListingKind::Buy.is_supply());
    }

    #[test]
    fn each_kind_has_a_distinct_verb() {
        let verbs: std::collections::HashSet<_> =
            ListingKind::ALL.iter().map(|k| k.notification_verb()).collect();
        assert_eq!(verbs.len(), ListingKind::ALL.len());
    }
}
