use crate::error::{FeedError, Result};
use crate::feeds::types::{AssetBase, ParserConfig};
use crate::feeds::xml::{parse_document, parse_document_bytes, Element};
use crate::models::{
    Address, Area, Asset, AssetLocation, BuildingDetails, Category, Depth, IdValue, LandDetails,
    Person, PhoneType, Price, Property, PropertyType, Quantity, Rent,
};
use std::path::Path;
use tracing::{debug, warn};

/// Maps listing feed documents into [`Property`] records
#[derive(Debug, Clone, Default)]
pub struct FeedParser {
    config: ParserConfig,
}

impl FeedParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a feed file, resolving asset paths per the configured [`AssetBase`]
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Property>> {
        let asset_dir = match &self.config.asset_base {
            AssetBase::SourceDir => path.parent(),
            AssetBase::Dir(dir) => Some(dir.as_path()),
            AssetBase::Disabled => None,
        };
        self.parse_file_with_assets(path, asset_dir)
    }

    pub fn parse_file_with_assets(
        &self,
        path: &Path,
        asset_dir: Option<&Path>,
    ) -> Result<Vec<Property>> {
        if !path.is_file() {
            return Err(FeedError::MissingFile(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.parse_bytes(&bytes, asset_dir)
    }

    /// Parse a feed document held in memory.
    ///
    /// Each child of the root element becomes one property, in document order.
    pub fn parse_str(&self, xml: &str, asset_dir: Option<&Path>) -> Result<Vec<Property>> {
        if xml.trim().is_empty() {
            return Err(FeedError::EmptyDocument);
        }

        let root = parse_document(xml, self.config.trim_text)?;
        Ok(map_document(&root, asset_dir))
    }

    /// Parse raw feed bytes, honouring the encoding named in the XML declaration
    pub fn parse_bytes(&self, bytes: &[u8], asset_dir: Option<&Path>) -> Result<Vec<Property>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(FeedError::EmptyDocument);
        }

        let root = parse_document_bytes(bytes, self.config.trim_text)?;
        Ok(map_document(&root, asset_dir))
    }
}

fn map_document(root: &Element, asset_dir: Option<&Path>) -> Vec<Property> {
    let mut properties = Vec::with_capacity(root.children().len());
    for node in root.children() {
        let property_type = match node.name().parse::<PropertyType>() {
            Ok(property_type) => property_type,
            Err(err) => {
                warn!("Skipping listing element: {}", err);
                continue;
            }
        };
        properties.push(map_property(node, property_type, asset_dir));
    }
    properties
}

fn map_property(node: &Element, property_type: PropertyType, asset_dir: Option<&Path>) -> Property {
    let mut property = Property::new(property_type);

    property.mod_time = node.attr("modTime").unwrap_or_default().to_string();
    property.status = node.attr("status").unwrap_or_default().to_string();
    property.agent_id = required_text(node, "agentID");
    property.unique_id = required_text(node, "uniqueID");
    property.headline = required_text(node, "headline");
    property.description = required_text(node, "description");

    property.under_offer = flag(node.child_attr("underOffer", "value"));
    property.is_multiple = flag(node.child_attr("isMultiple", "value"));
    property.commercial_listing_type = owned(node.child_attr("commercialListingType", "value"));
    property.exclusivity = owned(node.child_attr("exclusivity", "value"));
    property.authority = owned(node.child_text("commercialAuthority"))
        .or_else(|| owned(node.child_attr("authority", "value")));

    property.price_view = owned(node.child_text("priceView"));
    property.municipality = owned(node.child_text("municipality"));
    property.zone = owned(node.child_text("zone"));
    property.car_spaces = owned(node.child_text("carSpaces"));
    property.parking_comments = owned(node.child_text("parkingComments"));
    property.current_lease_end_date = owned(node.child_text("currentLeaseEndDate"));
    property.further_options = owned(node.child_text("furtherOptions"));
    property.auction_date = owned(node.child_attr("auction", "date"));
    property.outgoings_period = owned(node.child_attr("outgoings", "period"));
    property.land_category = owned(node.child_attr("landCategory", "name"));
    property.external_link = node.child("externalLink").and_then(|link| {
        let text = link.text();
        if text.is_empty() {
            owned(link.attr("href"))
        } else {
            Some(text.to_string())
        }
    });

    property.agents = node.children_named("listingAgent").filter_map(map_agent).collect();
    property.vendor_details = node.child("vendorDetails").map(map_vendor);

    property.price = node.child("price").map(map_price);
    property.rent = node
        .child("commercialRent")
        .or_else(|| node.child("rent"))
        .map(map_rent);

    property.address = node.child("address").map(map_address);
    property.categories = map_categories(node);
    property.highlights = node
        .children_named("highlight")
        .filter(|highlight| !highlight.text().is_empty())
        .map(|highlight| IdValue::new(owned(highlight.attr("id")), highlight.text()))
        .collect();

    if let Some(images) = node.child("images") {
        property.images = images
            .children_named("img")
            .filter_map(|img| map_asset(img, asset_dir))
            .collect();
    }
    if let Some(objects) = node.child("objects") {
        property.floor_plans = objects
            .children()
            .iter()
            .filter(|child| matches!(child.name(), "floorplan" | "floorPlan"))
            .filter_map(|plan| map_asset(plan, asset_dir))
            .collect();
    }

    property.land_details = node.child("landDetails").map(map_land_details);
    property.building_details = node.child("buildingDetails").map(map_building_details);

    property
}

/// Text of a required child, or an empty string when the child is missing
fn required_text(node: &Element, name: &str) -> String {
    node.child_text(name).unwrap_or_default().to_string()
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Feed yes/no attributes: absent, empty, `0`, `no` and `false` all read as false
fn flag(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => false,
        Some(v) => {
            !(v.is_empty()
                || v == "0"
                || v.eq_ignore_ascii_case("no")
                || v.eq_ignore_ascii_case("false"))
        }
    }
}

/// A nested `<range><min/><max/></range>` selects a range, otherwise the element text
fn quantity(node: &Element) -> Quantity {
    match node.child("range") {
        Some(range) => range_of(range),
        None => Quantity::scalar(node.text()),
    }
}

fn range_of(range: &Element) -> Quantity {
    Quantity::range(
        range.child_text("min").unwrap_or_default(),
        range.child_text("max").unwrap_or_default(),
    )
}

fn map_price(node: &Element) -> Price {
    Price {
        value: quantity(node),
        tax: owned(node.attr("tax")),
        display: flag(node.attr("display")),
        plus_sav: flag(node.attr("plusSAV")),
    }
}

/// Rent brackets are reported per square metre, one level deeper than prices
fn map_rent(node: &Element) -> Rent {
    let value = match node
        .child("rentPerSquareMetre")
        .and_then(|per_metre| per_metre.child("range"))
        .or_else(|| node.child("range"))
    {
        Some(range) => range_of(range),
        None => Quantity::scalar(node.text()),
    };

    Rent {
        value,
        period: owned(node.attr("period")),
        plus_outgoings: flag(node.attr("plusOutgoings")),
        plus_sav: flag(node.attr("plusSAV")),
        tax: owned(node.attr("tax")),
        display: flag(node.attr("display")),
    }
}

fn map_area(node: &Element) -> Area {
    Area {
        value: quantity(node),
        unit: owned(node.attr("unit")),
    }
}

fn map_land_details(node: &Element) -> LandDetails {
    LandDetails {
        area: node.child("area").map(map_area),
        frontage: node.child("frontage").map(map_area),
        depths: node
            .children_named("depth")
            .map(|depth| Depth {
                value: depth.text().to_string(),
                unit: owned(depth.attr("unit")),
                side: owned(depth.attr("side")),
            })
            .collect(),
        cross_over: owned(node.child_attr("crossOver", "value")),
    }
}

fn map_building_details(node: &Element) -> BuildingDetails {
    BuildingDetails {
        area: node.child("area").map(map_area),
        energy_rating: owned(node.child_text("energyRating")),
    }
}

fn apply_telephones(node: &Element, person: &mut Person) {
    for telephone in node.children_named("telephone") {
        let code = telephone.attr("type").unwrap_or_default();
        match PhoneType::from_code(code) {
            Some(kind) => person.set_phone(kind, telephone.text()),
            None => debug!("Ignoring telephone with type {:?}", code),
        }
    }
}

/// Agents without a name are not listed
fn map_agent(node: &Element) -> Option<Person> {
    let name = node.child_text("name").filter(|name| !name.is_empty())?;

    let mut person = Person {
        id: owned(node.attr("id")),
        name: name.to_string(),
        email: owned(node.child_text("email")),
        twitter_url: owned(node.child_text("twitterURL")),
        facebook_url: owned(node.child_text("facebookURL")),
        linkedin_url: owned(node.child_text("linkedinURL")),
        ..Default::default()
    };
    apply_telephones(node, &mut person);
    Some(person)
}

fn map_vendor(node: &Element) -> Person {
    let mut person = Person {
        name: required_text(node, "name"),
        email: owned(node.child_text("email")),
        ..Default::default()
    };
    apply_telephones(node, &mut person);
    person
}

fn map_address(node: &Element) -> Address {
    Address {
        site: owned(node.child_text("site")),
        sub_number: owned(node.child_text("subNumber")),
        unit_number: owned(node.child_text("unitNumber")),
        lot_number: owned(node.child_text("lotNumber")),
        street_number: owned(node.child_text("streetNumber")),
        street: required_text(node, "street"),
        suburb: required_text(node, "suburb"),
        display_suburb: flag(node.child_attr("suburb", "display")),
        region: owned(node.child_text("region")),
        state: required_text(node, "state"),
        postcode: required_text(node, "postcode"),
        country: required_text(node, "country"),
        display: flag(node.attr("display")),
    }
}

/// Category names arrive as a `name` attribute or a `<name>` child
fn category_name(node: &Element) -> Option<String> {
    node.attr("name")
        .or_else(|| node.child_text("name"))
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
}

/// All three taxonomies may appear on one listing; each tag adds an entry
fn map_categories(node: &Element) -> Vec<Category> {
    let mut categories = Vec::new();

    for child in node.children() {
        let category = match child.name() {
            "category" => category_name(child).map(|name| Category::Residential {
                id: owned(child.attr("id")),
                name,
            }),
            "commercialCategory" => category_name(child).map(|name| Category::Commercial {
                id: owned(child.attr("id")),
                name,
            }),
            "businessCategory" => category_name(child).map(|name| Category::Business {
                id: owned(child.attr("id")),
                name,
                sub_category: child
                    .child("businessSubCategory")
                    .and_then(category_name)
                    .or_else(|| owned(child.attr("subCategory"))),
            }),
            _ => continue,
        };

        match category {
            Some(category) => categories.push(category),
            None => debug!("Skipping unnamed <{}>", child.name()),
        }
    }

    categories
}

/// Assets need a `file` or `url` attribute; `file` wins when both are given
fn map_asset(node: &Element, asset_dir: Option<&Path>) -> Option<Asset> {
    let location = match (node.attr("file"), node.attr("url")) {
        (Some(file), _) => AssetLocation::Local(match asset_dir {
            Some(dir) => dir.join(file),
            None => file.into(),
        }),
        (None, Some(url)) => AssetLocation::Remote(url.to_string()),
        (None, None) => return None,
    };

    Some(Asset {
        id: node.attr("id").unwrap_or_default().to_string(),
        format: owned(node.attr("format")),
        mod_time: owned(node.attr("modTime")),
        location,
    })
}
