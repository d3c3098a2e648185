//! Mapping from pool and Diesel failures to `PosRepositoryError`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::PosRepositoryError;

use super::pool::PoolError;

/// Unique constraint on `pos.osm_node_id`, named in the create migration.
pub(super) const OSM_NODE_ID_CONSTRAINT: &str = "pos_osm_node_id_unique";

pub(super) fn map_pool_error(error: PoolError) -> PosRepositoryError {
    PosRepositoryError::connection(error.into_message())
}

/// Map Diesel errors raised while writing `name`.
///
/// Unique violations on any constraint other than the OSM node one are
/// reported as [`PosRepositoryError::DuplicateName`].
pub(super) fn map_write_error(error: DieselError, name: &str) -> PosRepositoryError {
    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(
                constraint = ?info.constraint_name(),
                message = info.message(),
                "pos write hit unique constraint"
            );
            if info.constraint_name() == Some(OSM_NODE_ID_CONSTRAINT) {
                PosRepositoryError::query("osm node is already linked to another pos")
            } else {
                PosRepositoryError::duplicate_name(name)
            }
        }
        _ => map_diesel_error(error),
    }
}

pub(super) fn map_diesel_error(error: DieselError) -> PosRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => PosRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => PosRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PosRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) => {
            PosRepositoryError::query(format!("database error: {}", info.message()))
        }
        other => PosRepositoryError::query(other.to_string()),
    }
}
