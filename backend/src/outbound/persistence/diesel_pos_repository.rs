//! PostgreSQL-backed `PosRepository` implementation using Diesel ORM.
//!
//! Identity comes from the `pos.id` sequence and timestamps from the injected
//! clock. Name uniqueness is enforced by the table constraint, never by a
//! read-before-write check.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{PosRepository, PosRepositoryError};
use crate::domain::{CampusType, Pos, PosDetails, PosDraft, PosType};

use super::models::{NewPosRow, PosRow, PosUpdate};
use super::pool::DbPool;
use super::pos_error_mapping::{map_diesel_error, map_pool_error, map_write_error};
use super::schema::pos;

/// Diesel-backed implementation of the POS repository port.
#[derive(Clone)]
pub struct DieselPosRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselPosRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Convert a database row into a validated domain POS.
fn row_to_pos(row: PosRow) -> Result<Pos, PosRepositoryError> {
    let PosRow {
        id,
        name,
        description,
        pos_type,
        campus,
        street,
        house_number,
        postal_code,
        city,
        osm_node_id,
        created_at,
        updated_at,
    } = row;

    let pos_type = pos_type
        .parse::<PosType>()
        .map_err(|err| PosRepositoryError::query(err.to_string()))?;
    let campus = campus
        .parse::<CampusType>()
        .map_err(|err| PosRepositoryError::query(err.to_string()))?;

    Pos::new(
        id,
        created_at,
        updated_at,
        PosDetails {
            name,
            description,
            pos_type,
            campus,
            street,
            house_number,
            postal_code,
            city,
            osm_node_id,
        },
    )
    .map_err(|err| PosRepositoryError::query(format!("pos {id} is invalid: {err}")))
}

#[async_trait]
impl PosRepository for DieselPosRepository {
    async fn upsert(&self, draft: &PosDraft) -> Result<Pos, PosRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = draft.details();
        let now = self.clock.utc();

        let row = match draft.id() {
            None => {
                let new_row = NewPosRow {
                    name: &details.name,
                    description: &details.description,
                    pos_type: details.pos_type.as_str(),
                    campus: details.campus.as_str(),
                    street: &details.street,
                    house_number: &details.house_number,
                    postal_code: details.postal_code,
                    city: &details.city,
                    osm_node_id: details.osm_node_id,
                    created_at: now,
                    updated_at: now,
                };

                diesel::insert_into(pos::table)
                    .values(&new_row)
                    .returning(PosRow::as_returning())
                    .get_result::<PosRow>(&mut conn)
                    .await
                    .map_err(|err| map_write_error(err, &details.name))?
            }
            Some(id) => {
                let changes = PosUpdate {
                    name: &details.name,
                    description: &details.description,
                    pos_type: details.pos_type.as_str(),
                    campus: details.campus.as_str(),
                    street: &details.street,
                    house_number: &details.house_number,
                    postal_code: details.postal_code,
                    city: &details.city,
                    osm_node_id: details.osm_node_id,
                    updated_at: now,
                };

                diesel::update(pos::table.find(id))
                    .set(&changes)
                    .returning(PosRow::as_returning())
                    .get_result::<PosRow>(&mut conn)
                    .await
                    .optional()
                    .map_err(|err| map_write_error(err, &details.name))?
                    .ok_or_else(|| PosRepositoryError::not_found(id))?
            }
        };

        row_to_pos(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Pos>, PosRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = pos::table
            .find(id)
            .select(PosRow::as_select())
            .first::<PosRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_pos).transpose()
    }

    async fn find_by_osm_node_id(
        &self,
        node_id: i64,
    ) -> Result<Option<Pos>, PosRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = pos::table
            .filter(pos::osm_node_id.eq(node_id))
            .select(PosRow::as_select())
            .first::<PosRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_pos).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Pos>, PosRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = pos::table
            .filter(pos::name.eq(name))
            .select(PosRow::as_select())
            .first::<PosRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_pos).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Pos>, PosRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PosRow> = pos::table
            .order(pos::id.asc())
            .select(PosRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_pos).collect()
    }

    async fn clear(&self) -> Result<(), PosRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(pos::table)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
