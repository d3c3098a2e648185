//! Diesel row models for the `pos` table.
//!
//! These types are internal to the persistence layer and must not leak into
//! the domain. Enum columns are stored as their upper-case labels.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::pos;

/// Row struct for reading from the pos table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PosRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub pos_type: String,
    pub campus: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: i32,
    pub city: String,
    pub osm_node_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating pos records; the id comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pos)]
pub(crate) struct NewPosRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub pos_type: &'a str,
    pub campus: &'a str,
    pub street: &'a str,
    pub house_number: &'a str,
    pub postal_code: i32,
    pub city: &'a str,
    pub osm_node_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating pos records in place.
///
/// `treat_none_as_null` so clearing `osm_node_id` is written through.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pos)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PosUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub pos_type: &'a str,
    pub campus: &'a str,
    pub street: &'a str,
    pub house_number: &'a str,
    pub postal_code: i32,
    pub city: &'a str,
    pub osm_node_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
