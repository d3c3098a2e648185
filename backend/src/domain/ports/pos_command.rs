//! Driving port for writing POS records directly, outside the import flow.

use async_trait::async_trait;

use crate::domain::{Error, Pos, PosDraft};

/// Direct create/update/reset operations on POS records.
///
/// Unlike [`super::OsmImportCommand`], failures here propagate to the caller
/// as typed [`Error`] values: a duplicate name is `Conflict`, updating an
/// unknown id is `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PosCommand: Send + Sync {
    /// Create the POS, or update it in place when the draft carries an id.
    async fn upsert(&self, draft: PosDraft) -> Result<Pos, Error>;

    /// Remove every POS. Administrative reset only.
    async fn clear(&self) -> Result<(), Error>;
}
