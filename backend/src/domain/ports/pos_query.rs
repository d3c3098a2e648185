//! Driving port for reading POS records.

use async_trait::async_trait;

use crate::domain::{Error, Pos};

/// Read-side operations on POS records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PosQuery: Send + Sync {
    /// Load one POS, failing with `NotFound` when the id is unknown.
    async fn get_by_id(&self, id: i64) -> Result<Pos, Error>;

    /// Load every POS ordered by id.
    async fn get_all(&self) -> Result<Vec<Pos>, Error>;
}
