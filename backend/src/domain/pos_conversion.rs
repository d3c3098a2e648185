//! Conversion of OSM nodes into POS drafts.
//!
//! Everything here is pure: the same node always yields the same draft, and
//! no identity or timestamps are ever assigned.

use std::fmt;

use super::osm_node::NAME_TAG;
use super::{CampusType, OsmNode, PosDetails, PosDraft, PosType};

const VENDING_TAG: &str = "vending";
const SHOP_TAG: &str = "shop";
const AMENITY_TAG: &str = "amenity";
const OPERATOR_TAG: &str = "operator";
const CUISINE_TAG: &str = "cuisine";
const OPENING_HOURS_TAG: &str = "opening_hours";
const DESCRIPTION_TAG: &str = "description";

/// Campus assigned to every imported POS until coordinate lookup exists.
pub const DEFAULT_CAMPUS: CampusType = CampusType::Altstadt;

/// Raised when a node lacks the data a POS requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosConversionError {
    node_id: i64,
    field: &'static str,
}

impl PosConversionError {
    fn incomplete(node_id: i64, field: &'static str) -> Self {
        Self { node_id, field }
    }

    /// Node that failed conversion.
    pub fn node_id(&self) -> i64 {
        self.node_id
    }

    /// Tag, or tag group, that was missing or unusable.
    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl fmt::Display for PosConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "osm node {} is missing required POS data ({})",
            self.node_id, self.field
        )
    }
}

impl std::error::Error for PosConversionError {}

/// Convert an admissible node into a POS draft.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use campus_coffee_backend::domain::{OsmNode, PosType, convert_osm_node};
///
/// let tags: BTreeMap<String, String> = [
///     ("name", " Mensa Triplex "),
///     ("addr:street", "Grabengasse"),
///     ("addr:housenumber", "14"),
///     ("addr:postcode", "69117"),
///     ("addr:city", "Heidelberg"),
///     ("amenity", "cafeteria"),
/// ]
/// .into_iter()
/// .map(|(key, value)| (key.to_owned(), value.to_owned()))
/// .collect();
/// let node = OsmNode::new(1, 49.41, 8.70, tags)?;
///
/// let draft = convert_osm_node(&node)?;
/// assert_eq!(draft.name(), "Mensa Triplex");
/// assert_eq!(draft.details().pos_type, PosType::Cafeteria);
/// assert_eq!(draft.details().description, "Mensa Triplex");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn convert_osm_node(node: &OsmNode) -> Result<PosDraft, PosConversionError> {
    let node_id = node.node_id();
    if !node.is_admissible_pos() {
        return Err(PosConversionError::incomplete(node_id, "name or address"));
    }

    let name = node
        .name()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PosConversionError::incomplete(node_id, NAME_TAG))?;
    let postal_code = parse_postal_code(node)?;
    let (street, house_number, city) = match (node.street(), node.house_number(), node.city()) {
        (Some(street), Some(house_number), Some(city)) => (street, house_number, city),
        _ => return Err(PosConversionError::incomplete(node_id, "address")),
    };

    let description = synthesise_description(node).unwrap_or_else(|| name.to_owned());

    PosDraft::new(PosDetails {
        name: name.to_owned(),
        description,
        pos_type: classify_pos_type(node),
        campus: classify_campus(node.latitude(), node.longitude()),
        street: street.to_owned(),
        house_number: house_number.to_owned(),
        postal_code,
        city: city.to_owned(),
        osm_node_id: Some(node_id),
    })
    .map_err(|_| PosConversionError::incomplete(node_id, NAME_TAG))
}

fn parse_postal_code(node: &OsmNode) -> Result<i32, PosConversionError> {
    node.postal_code()
        .and_then(|raw| raw.parse::<i32>().ok())
        .ok_or_else(|| PosConversionError::incomplete(node.node_id(), "addr:postcode"))
}

/// Classify the outlet type. The first matching rule wins.
pub fn classify_pos_type(node: &OsmNode) -> PosType {
    if node
        .tag(VENDING_TAG)
        .is_some_and(|vending| vending.contains("coffee"))
    {
        PosType::VendingMachine
    } else if node.tag(SHOP_TAG) == Some("bakery") {
        PosType::Bakery
    } else if node.tag(AMENITY_TAG) == Some("cafeteria") {
        PosType::Cafeteria
    } else {
        PosType::Cafe
    }
}

/// Assign a campus from coordinates.
///
/// Campus boundaries are not modelled yet, so every location maps to
/// [`DEFAULT_CAMPUS`].
// TODO: replace with a polygon lookup once campus boundary data is sourced.
pub fn classify_campus(_latitude: f64, _longitude: f64) -> CampusType {
    DEFAULT_CAMPUS
}

/// Build a description from operator, cuisine, opening hours and an
/// explicit `description` tag. Returns `None` when nothing applies.
pub fn synthesise_description(node: &OsmNode) -> Option<String> {
    let mut description = String::new();

    if let Some(operator) = node.tag(OPERATOR_TAG) {
        description.push_str(operator);
        description.push(' ');
    }
    if let Some(cuisine) = node.tag(CUISINE_TAG) {
        description.push_str("serving ");
        description.push_str(cuisine);
        description.push(' ');
    }
    if let Some(hours) = node.tag(OPENING_HOURS_TAG) {
        description.push_str("(Open: ");
        description.push_str(hours);
        description.push_str(") ");
    }
    if let Some(explicit) = node.tag(DESCRIPTION_TAG) {
        if !description.is_empty() {
            description.push_str("- ");
        }
        description.push_str(explicit);
    }

    let trimmed = description.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[path = "pos_conversion_tests.rs"]
mod tests;
