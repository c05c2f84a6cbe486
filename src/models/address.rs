use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address of a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub site: Option<String>,
    pub sub_number: Option<String>,
    pub unit_number: Option<String>,
    pub lot_number: Option<String>,
    pub street_number: Option<String>,
    pub street: String,
    pub suburb: String,
    pub display_suburb: bool,
    pub region: Option<String>,
    pub state: String,
    pub postcode: String,
    pub country: String,
    /// Whether the street address may be published
    pub display: bool,
}

impl Address {
    /// `unit/number street`, or just the street when no numbers are present
    pub fn street_line(&self) -> String {
        let number = match (non_empty(&self.unit_number), non_empty(&self.street_number)) {
            (Some(unit), Some(number)) => Some(format!("{}/{}", unit, number)),
            (None, Some(number)) => Some(number.to_string()),
            (Some(unit), None) => Some(unit.to_string()),
            (None, None) => None,
        };

        let parts: Vec<&str> = [number.as_deref(), Some(self.street.trim())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        parts.join(" ")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locality: Vec<&str> = [self.suburb.as_str(), self.state.as_str(), self.postcode.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        let segments: Vec<String> = [self.street_line(), locality.join(" ")]
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect();
        f.write_str(&segments.join(", "))
    }
}
