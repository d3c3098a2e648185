//! Reqwest-backed OpenStreetMap node source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain nodes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::NodeResponseDto;
use crate::domain::OsmNode;
use crate::domain::ports::{OsmNodeSource, OsmNodeSourceError};

/// Public OpenStreetMap API host.
pub const DEFAULT_OSM_API_BASE_URL: &str = "https://api.openstreetmap.org/";
/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "campus-coffee-osm-import/0.1";

/// Outbound identity sent with every OSM API request.
pub struct OsmApiHttpIdentity {
    /// HTTP user-agent; the OSM usage policy requires an identifying value.
    pub user_agent: String,
}

impl Default for OsmApiHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Node source adapter that performs HTTP GET requests against one API host.
pub struct OsmApiHttpSource {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl OsmApiHttpSource {
    /// Build an adapter with the default identity and an explicit request
    /// timeout.
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use campus_coffee_backend::outbound::osm_api::{
    ///     DEFAULT_OSM_API_BASE_URL, OsmApiHttpSource,
    /// };
    /// use reqwest::Url;
    ///
    /// let base_url = Url::parse(DEFAULT_OSM_API_BASE_URL)?;
    /// let source = OsmApiHttpSource::new(base_url, Duration::from_secs(10))?;
    /// # drop(source);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, OsmApiHttpIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: OsmApiHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            user_agent: identity.user_agent,
        })
    }

    fn node_url(&self, node_id: i64) -> Result<Url, OsmNodeSourceError> {
        self.base_url
            .join(&format!("api/0.6/node/{node_id}.json"))
            .map_err(|error| OsmNodeSourceError::transport(node_id, error.to_string()))
    }
}

#[async_trait]
impl OsmNodeSource for OsmApiHttpSource {
    async fn fetch_node(&self, node_id: i64) -> Result<OsmNode, OsmNodeSourceError> {
        let url = self.node_url(node_id)?;
        debug!(node_id, %url, "fetching osm node");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| map_transport_error(node_id, error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(node_id, error))?;
        if !status.is_success() {
            return Err(map_status_error(node_id, status, body.as_ref()));
        }

        parse_node(node_id, body.as_ref())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_node(node_id: i64, body: &[u8]) -> Result<OsmNode, OsmNodeSourceError> {
    let decoded: NodeResponseDto = serde_json::from_slice(body).map_err(|error| {
        OsmNodeSourceError::decode(node_id, format!("invalid OSM API JSON payload: {error}"))
    })?;
    decoded
        .into_domain_node(node_id)
        .map_err(|message| OsmNodeSourceError::decode(node_id, message))
}

fn map_transport_error(node_id: i64, error: reqwest::Error) -> OsmNodeSourceError {
    if error.is_timeout() {
        OsmNodeSourceError::transport(node_id, format!("request timed out: {error}"))
    } else {
        OsmNodeSourceError::transport(node_id, error.to_string())
    }
}

fn map_status_error(node_id: i64, status: StatusCode, body: &[u8]) -> OsmNodeSourceError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => OsmNodeSourceError::not_found(node_id),
        _ => {
            let body_preview = body_preview(body);
            let message = if body_preview.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                format!("status {}: {}", status.as_u16(), body_preview)
            };
            OsmNodeSourceError::transport(node_id, message)
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
