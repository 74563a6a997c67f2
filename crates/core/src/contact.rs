use serde::{Deserialize, Serialize};

/// Optional contact triple attached to inventory records and listings.
///
/// All three fields are free text and individually optional; the marketplace
/// has no account model, so this is how counterparties reach each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactInfo {
    pub fn new(
        name: Option<String>,
        phone: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self { name, phone, email }
    }

    /// Display name for notification phrasing, with a generic fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Someone")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_when_unnamed() {
        let anon = ContactInfo::default();
        assert_eq!(anon.display_name(), "Someone");

        let named = ContactInfo::new(Some("Arta".into()), None, None);
        assert_eq!(named.display_name(), "Arta");
    }
}
