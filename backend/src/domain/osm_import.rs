//! OSM import orchestration service.
//!
//! This service drives one node at a time through fetch, admissibility,
//! conversion, identity resolution and upsert. Every failure is folded into an
//! [`OsmImportOutcome`]; the batch entry point never aborts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    OsmImportBatchReport, OsmImportBatchRequest, OsmImportCommand, OsmImportOutcome,
    OsmImportSkipReason, OsmNodeSource, OsmNodeSourceError, PosRepository, PosRepositoryError,
    PosUpsertKind,
};
use crate::domain::{Pos, PosDraft, convert_osm_node};

/// Domain service implementing [`OsmImportCommand`].
#[derive(Clone)]
pub struct OsmImportService<S, R> {
    node_source: Arc<S>,
    pos_repo: Arc<R>,
}

impl<S, R> OsmImportService<S, R> {
    /// Create a new import service.
    pub fn new(node_source: Arc<S>, pos_repo: Arc<R>) -> Self {
        Self {
            node_source,
            pos_repo,
        }
    }
}

impl<S, R> OsmImportService<S, R>
where
    S: OsmNodeSource,
    R: PosRepository,
{
    /// Find the record a draft should overwrite: same OSM node first, then
    /// same name.
    async fn resolve_existing(
        &self,
        node_id: i64,
        draft: &PosDraft,
    ) -> Result<Option<Pos>, PosRepositoryError> {
        if let Some(existing) = self.pos_repo.find_by_osm_node_id(node_id).await? {
            debug!(node_id, pos_id = existing.id(), "matched pos by osm node id");
            return Ok(Some(existing));
        }

        let by_name = self.pos_repo.find_by_name(draft.name()).await?;
        if let Some(existing) = &by_name {
            debug!(node_id, pos_id = existing.id(), "matched pos by name");
        }
        Ok(by_name)
    }

    async fn store(&self, node_id: i64, draft: PosDraft) -> OsmImportOutcome {
        let existing = match self.resolve_existing(node_id, &draft).await {
            Ok(existing) => existing,
            Err(err) => return failed(node_id, &err),
        };
        let (draft, change) = match existing {
            Some(pos) => (draft.with_id(pos.id()), PosUpsertKind::Updated),
            None => (draft, PosUpsertKind::Created),
        };

        match self.pos_repo.upsert(&draft).await {
            Ok(pos) => {
                info!(node_id, pos_id = pos.id(), ?change, "imported osm node");
                OsmImportOutcome::Imported {
                    node_id,
                    pos_id: pos.id(),
                    name: pos.name().to_owned(),
                    change,
                }
            }
            Err(err) => failed(node_id, &err),
        }
    }
}

fn skip_reason(error: &OsmNodeSourceError) -> OsmImportSkipReason {
    match error {
        OsmNodeSourceError::NotFound { .. } => OsmImportSkipReason::NotFound,
        OsmNodeSourceError::Transport { .. } | OsmNodeSourceError::Decode { .. } => {
            OsmImportSkipReason::SourceUnavailable
        }
    }
}

fn failed(node_id: i64, err: &PosRepositoryError) -> OsmImportOutcome {
    error!(node_id, error = %err, "osm import failed while writing pos");
    OsmImportOutcome::Failed {
        node_id,
        message: err.to_string(),
    }
}

#[async_trait]
impl<S, R> OsmImportCommand for OsmImportService<S, R>
where
    S: OsmNodeSource,
    R: PosRepository,
{
    async fn import_node(&self, node_id: i64) -> OsmImportOutcome {
        info!(node_id, "importing osm node");

        let node = match self.node_source.fetch_node(node_id).await {
            Ok(node) => node,
            Err(err) => {
                warn!(node_id, error = %err, "skipping osm node: fetch failed");
                return OsmImportOutcome::Skipped {
                    node_id,
                    reason: skip_reason(&err),
                };
            }
        };

        if !node.is_admissible_pos() {
            warn!(node_id, "skipping osm node: missing name or address tags");
            return OsmImportOutcome::Skipped {
                node_id,
                reason: OsmImportSkipReason::Incomplete,
            };
        }

        let draft = match convert_osm_node(&node) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(node_id, error = %err, "skipping osm node: conversion failed");
                return OsmImportOutcome::Skipped {
                    node_id,
                    reason: OsmImportSkipReason::Incomplete,
                };
            }
        };

        self.store(node_id, draft).await
    }

    async fn import_nodes(&self, request: OsmImportBatchRequest) -> OsmImportBatchReport {
        let mut outcomes = Vec::with_capacity(request.node_ids.len());
        for node_id in request.node_ids.into_iter().flatten() {
            outcomes.push(self.import_node(node_id).await);
        }

        let report = OsmImportBatchReport::from_outcomes(outcomes);
        info!(
            attempted = report.outcomes.len(),
            imported = report.imported_node_ids.len(),
            "osm batch import finished"
        );
        report
    }
}

#[cfg(test)]
#[path = "osm_import_tests/mod.rs"]
mod tests;
