//! OpenStreetMap API outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `OsmNodeSource`
//! port against the API 0.6 JSON node endpoint.

mod dto;
mod http_source;

pub use http_source::{
    DEFAULT_OSM_API_BASE_URL, DEFAULT_USER_AGENT, OsmApiHttpIdentity, OsmApiHttpSource,
};
