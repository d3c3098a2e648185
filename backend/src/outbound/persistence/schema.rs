//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Campus points of sale.
    ///
    /// `name` and `osm_node_id` carry unique constraints; the store relies on
    /// them to reject duplicates atomically with the write.
    pos (id) {
        /// Primary key assigned by a `BIGSERIAL` sequence.
        id -> Int8,
        name -> Varchar,
        description -> Text,
        /// Upper-case `PosType` label.
        pos_type -> Varchar,
        /// Upper-case `CampusType` label.
        campus -> Varchar,
        street -> Varchar,
        house_number -> Varchar,
        postal_code -> Int4,
        city -> Varchar,
        /// Originating OpenStreetMap node, if imported.
        osm_node_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
