use serde::{Deserialize, Serialize};

/// One registry candidate for a company-name search.
///
/// Only `legal_name` takes part in matching. Every other field is carried
/// through to the caller untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Registry identifier (the LEI code for GLEIF).
    pub id: String,
    pub legal_name: String,
    /// Registry lifecycle state such as `ACTIVE` or `INACTIVE`.
    pub status: String,
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub jurisdiction: String,
    pub category: String,
    /// Formatted legal address, see [`format_address`].
    pub address: String,
    pub registration_date: String,
    pub last_update: String,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>, legal_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            legal_name: legal_name.into(),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn has_legal_name(&self) -> bool {
        !self.legal_name.trim().is_empty()
    }
}

/// Joins the non-empty address components with `", "`: address lines first,
/// then city, region, postal code and country.
pub fn format_address<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    city: &'a str,
    region: &'a str,
    postal_code: &'a str,
    country: &'a str,
) -> String {
    lines
        .into_iter()
        .chain([city, region, postal_code, country])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
