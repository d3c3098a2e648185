//! DTOs for decoding OpenStreetMap API node responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into a
//! domain [`OsmNode`] in one pass. Missing fields are decode failures rather
//! than defaults.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::OsmNode;

#[derive(Debug, Deserialize)]
pub(super) struct NodeResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<NodeElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NodeElementDto {
    pub(super) id: Option<i64>,
    pub(super) lat: Option<f64>,
    pub(super) lon: Option<f64>,
    pub(super) tags: Option<BTreeMap<String, String>>,
}

impl NodeResponseDto {
    pub(super) fn into_domain_node(self, requested: i64) -> Result<OsmNode, String> {
        let element = self
            .elements
            .into_iter()
            .next()
            .ok_or_else(|| "response contains no elements".to_owned())?;
        element.into_domain_node(requested)
    }
}

impl NodeElementDto {
    fn into_domain_node(self, requested: i64) -> Result<OsmNode, String> {
        let id = self.id.ok_or("element is missing id")?;
        if id != requested {
            return Err(format!("element id {id} does not match requested node"));
        }
        let latitude = self.lat.ok_or("element is missing lat")?;
        let longitude = self.lon.ok_or("element is missing lon")?;
        let tags = self.tags.ok_or("element is missing tags")?;

        OsmNode::new(id, latitude, longitude, tags).map_err(|error| error.to_string())
    }
}
