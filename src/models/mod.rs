mod address;
mod asset;
mod category;
mod contact;
mod quantity;

pub use address::Address;
pub use asset::{Asset, AssetLocation, MAIN_FLOOR_PLAN_ID, MAIN_IMAGE_ID};
pub use category::Category;
pub use contact::{IdValue, Person, PhoneType};
pub use quantity::{Area, Price, Quantity, Range, Rent};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of listing, taken from the listing element's name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Residential,
    Rental,
    Land,
    Rural,
    Commercial,
    CommercialLand,
    Business,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Rental => "rental",
            Self::Land => "land",
            Self::Rural => "rural",
            Self::Commercial => "commercial",
            Self::CommercialLand => "commercialLand",
            Self::Business => "business",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "residential" => Ok(Self::Residential),
            "rental" => Ok(Self::Rental),
            "land" => Ok(Self::Land),
            "rural" => Ok(Self::Rural),
            "commercial" => Ok(Self::Commercial),
            "commercialLand" => Ok(Self::CommercialLand),
            "business" => Ok(Self::Business),
            other => Err(format!("unknown property type: {}", other)),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth measurement of one side of a block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Depth {
    pub value: String,
    pub unit: Option<String>,
    /// `left`, `right` or `rear`
    pub side: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LandDetails {
    pub area: Option<Area>,
    pub frontage: Option<Area>,
    pub depths: Vec<Depth>,
    pub cross_over: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildingDetails {
    pub area: Option<Area>,
    pub energy_rating: Option<String>,
}

/// One listing from a feed document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Property {
    pub property_type: PropertyType,
    pub status: String,
    pub unique_id: String,
    pub agent_id: String,
    pub mod_time: String,
    pub authority: Option<String>,
    pub exclusivity: Option<String>,
    pub commercial_listing_type: Option<String>,
    pub under_offer: bool,
    pub is_multiple: bool,
    pub headline: String,
    pub description: String,
    pub price_view: Option<String>,
    pub municipality: Option<String>,
    pub zone: Option<String>,
    pub car_spaces: Option<String>,
    pub parking_comments: Option<String>,
    pub external_link: Option<String>,
    pub auction_date: Option<String>,
    pub current_lease_end_date: Option<String>,
    pub further_options: Option<String>,
    pub outgoings_period: Option<String>,
    pub land_category: Option<String>,

    pub agents: Vec<Person>,
    pub categories: Vec<Category>,
    pub highlights: Vec<IdValue>,
    pub images: Vec<Asset>,
    pub floor_plans: Vec<Asset>,

    pub address: Option<Address>,
    pub price: Option<Price>,
    pub rent: Option<Rent>,
    pub land_details: Option<LandDetails>,
    pub building_details: Option<BuildingDetails>,
    pub vendor_details: Option<Person>,
}

impl Property {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            status: String::new(),
            unique_id: String::new(),
            agent_id: String::new(),
            mod_time: String::new(),
            authority: None,
            exclusivity: None,
            commercial_listing_type: None,
            under_offer: false,
            is_multiple: false,
            headline: String::new(),
            description: String::new(),
            price_view: None,
            municipality: None,
            zone: None,
            car_spaces: None,
            parking_comments: None,
            external_link: None,
            auction_date: None,
            current_lease_end_date: None,
            further_options: None,
            outgoings_period: None,
            land_category: None,
            agents: Vec::new(),
            categories: Vec::new(),
            highlights: Vec::new(),
            images: Vec::new(),
            floor_plans: Vec::new(),
            address: None,
            price: None,
            rent: None,
            land_details: None,
            building_details: None,
            vendor_details: None,
        }
    }

    /// Parse `modTime`, which feeds write either as `2009-01-01-12:30:00`
    /// or as a compact `20090101123000`.
    pub fn modified_at(&self) -> Option<NaiveDateTime> {
        let raw = self.mod_time.trim();
        ["%Y-%m-%d-%H:%M:%S", "%Y%m%d%H%M%S", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn agent_by_id(&self, id: &str) -> Option<&Person> {
        self.agents.iter().find(|agent| agent.id.as_deref() == Some(id))
    }

    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id() == Some(id))
    }

    pub fn highlight_by_id(&self, id: &str) -> Option<&IdValue> {
        self.highlights
            .iter()
            .find(|highlight| highlight.id.as_deref() == Some(id))
    }

    pub fn image_by_id(&self, id: &str) -> Option<&Asset> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn floor_plan_by_id(&self, id: &str) -> Option<&Asset> {
        self.floor_plans.iter().find(|plan| plan.id == id)
    }

    pub fn main_image(&self) -> Option<&Asset> {
        self.images.iter().find(|image| image.is_main_image())
    }

    pub fn main_floor_plan(&self) -> Option<&Asset> {
        self.floor_plans.iter().find(|plan| plan.is_main_floor_plan())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn floor_plan_count(&self) -> usize {
        self.floor_plans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn image(id: &str, url: &str) -> Asset {
        Asset {
            id: id.to_string(),
            format: Some("jpg".to_string()),
            mod_time: None,
            location: AssetLocation::Remote(url.to_string()),
        }
    }

    #[test]
    fn property_type_round_trips_through_names() {
        for name in [
            "residential",
            "rental",
            "land",
            "rural",
            "commercial",
            "commercialLand",
            "business",
        ] {
            let parsed: PropertyType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!("holidayRental".parse::<PropertyType>().is_err());
    }

    #[test]
    fn lookups_return_first_match() {
        let mut property = Property::new(PropertyType::Residential);
        property.images.push(image("a", "http://x/1.jpg"));
        property.images.push(image("m", "http://x/2.jpg"));
        property.images.push(image("m", "http://x/3.jpg"));
        property.floor_plans.push(Asset {
            id: "1".to_string(),
            format: None,
            mod_time: None,
            location: AssetLocation::Local(PathBuf::from("/d/plan.pdf")),
        });
        property.highlights.push(IdValue::new(Some("1".to_string()), "Pool"));
        property.agents.push(Person {
            id: Some("7".to_string()),
            name: "Jo".to_string(),
            ..Default::default()
        });
        property.categories.push(Category::Commercial {
            id: Some("9".to_string()),
            name: "Retail".to_string(),
        });

        assert_eq!(property.main_image().unwrap().remote_url(), Some("http://x/2.jpg"));
        assert_eq!(property.image_by_id("a").unwrap().remote_url(), Some("http://x/1.jpg"));
        assert!(property.image_by_id("zz").is_none());
        assert_eq!(property.main_floor_plan().unwrap().filename(), Some("plan.pdf"));
        assert_eq!(property.highlight_by_id("1").unwrap().value, "Pool");
        assert_eq!(property.agent_by_id("7").unwrap().name, "Jo");
        assert!(property.agent_by_id("8").is_none());
        assert_eq!(property.category_by_id("9").unwrap().name(), "Retail");
        assert_eq!(property.image_count(), 3);
        assert_eq!(property.agent_count(), 1);
        assert_eq!(property.floor_plan_count(), 1);
    }

    #[test]
    fn mod_time_accepts_both_feed_formats() {
        let mut property = Property::new(PropertyType::Land);
        property.mod_time = "2009-01-01-12:30:00".to_string();
        let dashed = property.modified_at().unwrap();

        property.mod_time = "20090101123000".to_string();
        assert_eq!(property.modified_at().unwrap(), dashed);

        property.mod_time = "yesterday".to_string();
        assert!(property.modified_at().is_none());
    }
}
