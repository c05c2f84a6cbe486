use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive bracket reported instead of an exact figure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Range {
    pub min: String,
    pub max: String,
}

impl Range {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// A figure that is either a single value or a min/max bracket.
///
/// Values are kept as the feed wrote them; feeds mix plain integers, decimals
/// and the occasional currency-formatted string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Quantity {
    Scalar { value: String },
    Range(Range),
}

impl Quantity {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar {
            value: value.into(),
        }
    }

    pub fn range(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self::Range(Range::new(min, max))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar { value } => Some(value),
            Self::Range(_) => None,
        }
    }

    pub fn as_range(&self) -> Option<&Range> {
        match self {
            Self::Scalar { .. } => None,
            Self::Range(range) => Some(range),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::scalar("")
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar { value } => f.write_str(value),
            Self::Range(range) => range.fmt(f),
        }
    }
}

/// Sale price
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Price {
    pub value: Quantity,
    pub tax: Option<String>,
    pub display: bool,
    pub plus_sav: bool,
}

impl Price {
    pub fn is_range(&self) -> bool {
        self.value.is_range()
    }
}

/// Rental or commercial rent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rent {
    pub value: Quantity,
    /// e.g. `week`, `month`, `annual`
    pub period: Option<String>,
    pub plus_outgoings: bool,
    pub plus_sav: bool,
    pub tax: Option<String>,
    pub display: bool,
}

impl Rent {
    pub fn is_range(&self) -> bool {
        self.value.is_range()
    }
}

/// Land or floor area with its unit of measure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Area {
    pub value: Quantity,
    pub unit: Option<String>,
}

impl Area {
    pub fn is_range(&self) -> bool {
        self.value.is_range()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {}", self.value, unit),
            None => self.value.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_detected_by_variant() {
        let price = Price {
            value: Quantity::range("100", "200"),
            ..Default::default()
        };
        assert!(price.is_range());
        assert_eq!(price.value.as_range(), Some(&Range::new("100", "200")));
        assert_eq!(price.value.as_scalar(), None);
    }

    #[test]
    fn scalar_is_not_a_range() {
        let rent = Rent {
            value: Quantity::scalar("150"),
            ..Default::default()
        };
        assert!(!rent.is_range());
        assert_eq!(rent.value.as_scalar(), Some("150"));
    }

    #[test]
    fn area_renders_with_unit() {
        let area = Area {
            value: Quantity::range("400", "650"),
            unit: Some("squareMeter".to_string()),
        };
        assert_eq!(area.to_string(), "400 - 650 squareMeter");

        let bare = Area {
            value: Quantity::scalar("12"),
            unit: None,
        };
        assert_eq!(bare.to_string(), "12");
    }

    #[test]
    fn reassigning_switches_representation() {
        let mut price = Price {
            value: Quantity::scalar("500000"),
            ..Default::default()
        };
        price.value = Quantity::range("450000", "520000");
        assert!(price.is_range());
    }
}
