//! Import configuration loaded via OrthoConfig.
//!
//! Every value is optional in the environment and configuration files; the
//! accessors apply defaults so callers never handle `None` themselves.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::osm_api::{DEFAULT_OSM_API_BASE_URL, DEFAULT_USER_AGENT};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable multi-field lines.
    Pretty,
}

/// Configuration values controlling OSM imports.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAMPUS_COFFEE")]
pub struct OsmImportSettings {
    /// Root of the OpenStreetMap API, without the `/api/0.6` suffix.
    pub osm_api_base_url: Option<String>,
    /// Per-request timeout for OSM API calls, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// User agent sent to the OSM API.
    pub user_agent: Option<String>,
    /// PostgreSQL connection URL for the POS store.
    pub database_url: Option<String>,
    /// `json` (default) or `pretty`.
    pub log_format: Option<String>,
}

impl OsmImportSettings {
    /// Return the configured API root, falling back to the public OSM host.
    pub fn osm_api_base_url(&self) -> &str {
        self.osm_api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_OSM_API_BASE_URL)
    }

    /// Return the request timeout, falling back to ten seconds. Zero is
    /// raised to one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Return the configured user agent, falling back to the default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the log format. Unrecognised values fall back to JSON.
    pub fn log_format(&self) -> LogFormat {
        match self.log_format.as_deref().map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}
