//! Driving port for importing OSM nodes as points of sale.
//!
//! Import is best effort: every attempted node yields an outcome value and
//! neither entry point returns an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Why a node was skipped without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsmImportSkipReason {
    /// The source has no node with this identifier.
    NotFound,
    /// The source could not be reached or returned an unusable payload.
    SourceUnavailable,
    /// The node lacks a name or address tags, or has a non-numeric postcode.
    Incomplete,
}

/// Whether a successful import created a record or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosUpsertKind {
    Created,
    Updated,
}

/// Result of importing one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum OsmImportOutcome {
    /// The node was converted and written to the store.
    Imported {
        node_id: i64,
        pos_id: i64,
        name: String,
        change: PosUpsertKind,
    },
    /// The node was not eligible for import.
    Skipped {
        node_id: i64,
        reason: OsmImportSkipReason,
    },
    /// The node converted cleanly but the store rejected the write.
    Failed { node_id: i64, message: String },
}

impl OsmImportOutcome {
    /// Node identifier this outcome belongs to.
    pub fn node_id(&self) -> i64 {
        match self {
            Self::Imported { node_id, .. }
            | Self::Skipped { node_id, .. }
            | Self::Failed { node_id, .. } => *node_id,
        }
    }

    /// `true` only when the store accepted the write.
    pub fn is_imported(&self) -> bool {
        matches!(self, Self::Imported { .. })
    }
}

/// Batch request; `None` entries are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsmImportBatchRequest {
    pub node_ids: Vec<Option<i64>>,
}

impl OsmImportBatchRequest {
    /// Build a request without null entries.
    pub fn from_node_ids(node_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            node_ids: node_ids.into_iter().map(Some).collect(),
        }
    }
}

/// Batch response listing one outcome per attempted id, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsmImportBatchReport {
    /// Ids whose import succeeded, in input order. Repeated ids repeat.
    pub imported_node_ids: Vec<i64>,
    pub outcomes: Vec<OsmImportOutcome>,
}

impl OsmImportBatchReport {
    /// Build a report from per-node outcomes.
    pub fn from_outcomes(outcomes: Vec<OsmImportOutcome>) -> Self {
        let imported_node_ids = outcomes
            .iter()
            .filter(|outcome| outcome.is_imported())
            .map(OsmImportOutcome::node_id)
            .collect();
        Self {
            imported_node_ids,
            outcomes,
        }
    }
}

/// Driving port for OSM-to-POS import.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OsmImportCommand: Send + Sync {
    /// Import a single node.
    async fn import_node(&self, node_id: i64) -> OsmImportOutcome;

    /// Import every non-null id in order, continuing past failures.
    async fn import_nodes(&self, request: OsmImportBatchRequest) -> OsmImportBatchReport;
}
