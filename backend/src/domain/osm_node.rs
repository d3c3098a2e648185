//! OpenStreetMap node value used as the input to POS conversion.
//!
//! Nodes are built by the source adapter per fetch and discarded once
//! converted. The tag set is owned privately and only ever lent out as a
//! shared borrow, so nothing downstream can mutate it.

use std::collections::BTreeMap;
use std::fmt;

/// Tag holding the display name of the node.
pub const NAME_TAG: &str = "name";
/// Tag holding the street of the postal address.
pub const STREET_TAG: &str = "addr:street";
/// Tag holding the house number, which may carry a suffix such as `21a`.
pub const HOUSE_NUMBER_TAG: &str = "addr:housenumber";
/// Tag holding the postal code as free text.
pub const POSTCODE_TAG: &str = "addr:postcode";
/// Tag holding the city of the postal address.
pub const CITY_TAG: &str = "addr:city";

const ADDRESS_TAGS: [&str; 4] = [STREET_TAG, HOUSE_NUMBER_TAG, POSTCODE_TAG, CITY_TAG];

/// Validation errors returned by [`OsmNode::new`].
#[derive(Debug, Clone, PartialEq)]
pub enum OsmNodeValidationError {
    InvalidLatitude { node_id: i64, latitude: f64 },
    InvalidLongitude { node_id: i64, longitude: f64 },
}

impl fmt::Display for OsmNodeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLatitude { node_id, latitude } => write!(
                f,
                "osm node {node_id} latitude {latitude} must be finite and within [-90, 90]"
            ),
            Self::InvalidLongitude { node_id, longitude } => write!(
                f,
                "osm node {node_id} longitude {longitude} must be finite and within [-180, 180]"
            ),
        }
    }
}

impl std::error::Error for OsmNodeValidationError {}

/// An OpenStreetMap node carrying coordinates and free-form tags.
///
/// ## Invariants
/// - `latitude` is finite and within `[-90, 90]`.
/// - `longitude` is finite and within `[-180, 180]`.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use campus_coffee_backend::domain::OsmNode;
///
/// let tags = BTreeMap::from([("name".to_owned(), "Cafe Botanik".to_owned())]);
/// let node = OsmNode::new(5_589_879_349, 49.4177, 8.6702, tags)?;
/// assert_eq!(node.name(), Some("Cafe Botanik"));
/// assert!(!node.is_admissible_pos());
/// # Ok::<(), campus_coffee_backend::domain::OsmNodeValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OsmNode {
    node_id: i64,
    latitude: f64,
    longitude: f64,
    tags: BTreeMap<String, String>,
}

impl OsmNode {
    /// Construct a node, rejecting coordinates outside WGS84 ranges.
    pub fn new(
        node_id: i64,
        latitude: f64,
        longitude: f64,
        tags: BTreeMap<String, String>,
    ) -> Result<Self, OsmNodeValidationError> {
        if !valid_latitude(latitude) {
            return Err(OsmNodeValidationError::InvalidLatitude { node_id, latitude });
        }
        if !valid_longitude(longitude) {
            return Err(OsmNodeValidationError::InvalidLongitude { node_id, longitude });
        }

        Ok(Self {
            node_id,
            latitude,
            longitude,
            tags,
        })
    }

    /// OpenStreetMap node identifier.
    pub fn node_id(&self) -> i64 {
        self.node_id
    }

    /// Latitude in WGS84.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in WGS84.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Value of `key`, if the tag is present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Whether the tag is present, regardless of its value.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.tag(NAME_TAG)
    }

    pub fn street(&self) -> Option<&str> {
        self.tag(STREET_TAG)
    }

    pub fn house_number(&self) -> Option<&str> {
        self.tag(HOUSE_NUMBER_TAG)
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.tag(POSTCODE_TAG)
    }

    pub fn city(&self) -> Option<&str> {
        self.tag(CITY_TAG)
    }

    /// Whether this node carries enough data to become a point of sale.
    ///
    /// The name must be non-blank. Address tags only need to exist: an empty
    /// `addr:street` value still passes.
    pub fn is_admissible_pos(&self) -> bool {
        self.has_non_blank_name() && ADDRESS_TAGS.iter().all(|key| self.has_tag(key))
    }

    fn has_non_blank_name(&self) -> bool {
        self.name().is_some_and(|name| !name.trim().is_empty())
    }
}

fn valid_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}

fn valid_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

#[cfg(test)]
mod tests {
    //! Admissibility and construction coverage for OSM nodes.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn admissible_tags() -> BTreeMap<String, String> {
        [
            (NAME_TAG, "Cafe Botanik"),
            (STREET_TAG, "Im Neuenheimer Feld"),
            (HOUSE_NUMBER_TAG, "304"),
            (POSTCODE_TAG, "69120"),
            (CITY_TAG, "Heidelberg"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
    }

    fn node(tags: BTreeMap<String, String>) -> OsmNode {
        OsmNode::new(42, 49.41, 8.67, tags).expect("fixture coordinates are valid")
    }

    #[rstest]
    fn complete_node_is_admissible(admissible_tags: BTreeMap<String, String>) {
        assert!(node(admissible_tags).is_admissible_pos());
    }

    #[rstest]
    #[case::missing("")]
    #[case::blank("   \t")]
    fn blank_or_missing_name_is_not_admissible(
        mut admissible_tags: BTreeMap<String, String>,
        #[case] name: &str,
    ) {
        if name.is_empty() {
            admissible_tags.remove(NAME_TAG);
        } else {
            admissible_tags.insert(NAME_TAG.to_owned(), name.to_owned());
        }
        assert!(!node(admissible_tags).is_admissible_pos());
    }

    #[rstest]
    #[case(STREET_TAG)]
    #[case(HOUSE_NUMBER_TAG)]
    #[case(POSTCODE_TAG)]
    #[case(CITY_TAG)]
    fn missing_address_tag_is_not_admissible(
        mut admissible_tags: BTreeMap<String, String>,
        #[case] missing: &str,
    ) {
        admissible_tags.remove(missing);
        assert!(!node(admissible_tags).is_admissible_pos());
    }

    #[rstest]
    fn empty_address_values_still_count_as_present(
        mut admissible_tags: BTreeMap<String, String>,
    ) {
        admissible_tags.insert(STREET_TAG.to_owned(), String::new());
        admissible_tags.insert(CITY_TAG.to_owned(), String::new());
        assert!(node(admissible_tags).is_admissible_pos());
    }

    #[rstest]
    #[case::nan_latitude(f64::NAN, 8.67)]
    #[case::latitude_out_of_range(91.0, 8.67)]
    #[case::infinite_longitude(49.41, f64::INFINITY)]
    #[case::longitude_out_of_range(49.41, -180.5)]
    fn rejects_invalid_coordinates(#[case] latitude: f64, #[case] longitude: f64) {
        let result = OsmNode::new(7, latitude, longitude, BTreeMap::new());
        assert!(result.is_err());
    }

    #[rstest]
    fn accessors_expose_address_tags(admissible_tags: BTreeMap<String, String>) {
        let node = node(admissible_tags);
        assert_eq!(node.node_id(), 42);
        assert_eq!(node.street(), Some("Im Neuenheimer Feld"));
        assert_eq!(node.house_number(), Some("304"));
        assert_eq!(node.postal_code(), Some("69120"));
        assert_eq!(node.city(), Some("Heidelberg"));
        assert_eq!(node.tag("amenity"), None);
    }
}
