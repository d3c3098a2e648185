//! Driven port for persisting point-of-sale records.
//!
//! The store owns identity, timestamps and name uniqueness. Domain services
//! never pre-check uniqueness; they rely on [`PosRepositoryError::DuplicateName`]
//! being raised atomically with the write.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Pos, PosDraft};

define_port_error! {
    /// Errors raised by POS persistence adapters.
    pub enum PosRepositoryError {
        /// Another record already uses this name.
        DuplicateName { name: String } =>
            "pos name '{name}' already exists",
        /// No record exists with this identifier.
        NotFound { id: i64 } =>
            "pos {id} does not exist",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "pos persistence connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "pos persistence query failed: {message}",
    }
}

/// Port for reading and writing POS records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PosRepository: Send + Sync {
    /// Create the record when `draft.id()` is `None`, otherwise update the
    /// record with that id in place.
    ///
    /// Creation assigns `id`, `created_at` and `updated_at`; updates reassign
    /// `updated_at` only.
    async fn upsert(&self, draft: &PosDraft) -> Result<Pos, PosRepositoryError>;

    /// Load one record by store identity.
    async fn find_by_id(&self, id: i64) -> Result<Option<Pos>, PosRepositoryError>;

    /// Load the record imported from the given OSM node, if any.
    async fn find_by_osm_node_id(&self, node_id: i64)
    -> Result<Option<Pos>, PosRepositoryError>;

    /// Load the record with exactly this name, if any.
    async fn find_by_name(&self, name: &str) -> Result<Option<Pos>, PosRepositoryError>;

    /// Load every record ordered by id.
    async fn list_all(&self) -> Result<Vec<Pos>, PosRepositoryError>;

    /// Remove every record.
    async fn clear(&self) -> Result<(), PosRepositoryError>;
}
