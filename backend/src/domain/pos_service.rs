//! POS domain service.
//!
//! Implements the direct read/write driving ports over a [`PosRepository`].
//! Store failures surface as typed [`Error`] values; nothing is swallowed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{PosCommand, PosQuery, PosRepository, PosRepositoryError};
use crate::domain::{Error, Pos, PosDraft};

pub(crate) fn map_repository_error(error: PosRepositoryError) -> Error {
    match error {
        PosRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("pos name '{name}' already exists"))
                .with_details(json!({ "name": name }))
        }
        PosRepositoryError::NotFound { id } => Error::not_found(format!("pos {id} not found")),
        PosRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("pos repository unavailable: {message}"))
        }
        PosRepositoryError::Query { message } => {
            Error::internal(format!("pos repository error: {message}"))
        }
    }
}

/// POS service implementing [`PosCommand`] and [`PosQuery`].
#[derive(Clone)]
pub struct PosService<R> {
    pos_repo: Arc<R>,
}

impl<R> PosService<R> {
    /// Create a new service over the given repository.
    pub fn new(pos_repo: Arc<R>) -> Self {
        Self { pos_repo }
    }
}

impl<R> PosService<R>
where
    R: PosRepository,
{
    async fn ensure_exists(&self, id: i64) -> Result<(), Error> {
        self.pos_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("pos {id} not found")))
    }
}

#[async_trait]
impl<R> PosCommand for PosService<R>
where
    R: PosRepository,
{
    async fn upsert(&self, draft: PosDraft) -> Result<Pos, Error> {
        match draft.id() {
            None => info!(name = draft.name(), "creating pos"),
            Some(id) if id <= 0 => {
                warn!(pos_id = id, "rejecting update of non-positive pos id");
                return Err(Error::invalid_request(format!(
                    "pos id {id} is not a store-assigned identifier"
                )));
            }
            Some(id) => {
                info!(pos_id = id, "updating pos");
                self.ensure_exists(id).await?;
            }
        }

        match self.pos_repo.upsert(&draft).await {
            Ok(pos) => {
                info!(pos_id = pos.id(), name = pos.name(), "upserted pos");
                Ok(pos)
            }
            Err(err) => {
                error!(name = draft.name(), error = %err, "pos upsert failed");
                Err(map_repository_error(err))
            }
        }
    }

    async fn clear(&self) -> Result<(), Error> {
        warn!("clearing all pos records");
        self.pos_repo.clear().await.map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> PosQuery for PosService<R>
where
    R: PosRepository,
{
    async fn get_by_id(&self, id: i64) -> Result<Pos, Error> {
        debug!(pos_id = id, "loading pos");
        self.pos_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("pos {id} not found")))
    }

    async fn get_all(&self) -> Result<Vec<Pos>, Error> {
        debug!("loading all pos records");
        self.pos_repo.list_all().await.map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "pos_service_tests.rs"]
mod tests;
