//! Driven port for fetching single OpenStreetMap nodes.
//!
//! The import orchestration only needs "give me node N or tell me why not";
//! transport, retries and payload formats stay inside the adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::OsmNode;

define_port_error! {
    /// Errors raised while fetching an OSM node.
    pub enum OsmNodeSourceError {
        /// The remote source has no node with this identifier.
        NotFound { node_id: i64 } =>
            "osm node {node_id} does not exist",
        /// The remote source could not be reached or answered with a failure.
        Transport { node_id: i64, message: String } =>
            "failed to fetch osm node {node_id}: {message}",
        /// The remote source answered, but the payload was incomplete or malformed.
        Decode { node_id: i64, message: String } =>
            "failed to decode osm node {node_id}: {message}",
    }
}

impl OsmNodeSourceError {
    /// Identifier of the node the failure relates to.
    pub fn node_id(&self) -> i64 {
        match self {
            Self::NotFound { node_id }
            | Self::Transport { node_id, .. }
            | Self::Decode { node_id, .. } => *node_id,
        }
    }
}

/// Port for obtaining one node from an OSM data source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OsmNodeSource: Send + Sync {
    /// Fetch the node with the given identifier.
    async fn fetch_node(&self, node_id: i64) -> Result<OsmNode, OsmNodeSourceError>;
}

/// Fixture source serving a fixed set of nodes; anything else is not found.
#[derive(Debug, Clone, Default)]
pub struct FixtureOsmNodeSource {
    nodes: BTreeMap<i64, OsmNode>,
}

impl FixtureOsmNodeSource {
    /// Build a fixture source from the given nodes, keyed by their ids.
    pub fn new(nodes: impl IntoIterator<Item = OsmNode>) -> Self {
        Self {
            nodes: nodes
                .into_iter()
                .map(|node| (node.node_id(), node))
                .collect(),
        }
    }
}

#[async_trait]
impl OsmNodeSource for FixtureOsmNodeSource {
    async fn fetch_node(&self, node_id: i64) -> Result<OsmNode, OsmNodeSourceError> {
        self.nodes
            .get(&node_id)
            .cloned()
            .ok_or_else(|| OsmNodeSourceError::not_found(node_id))
    }
}
