//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or when the
//! `test-support` feature is enabled.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{CampusType, OsmNode, Pos, PosDetails, PosType};

/// Fixed instant used by fixture clocks and persisted fixtures.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 14, 9, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Clock frozen at `utc_now`.
    pub fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock frozen at [`fixture_timestamp`].
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(fixture_timestamp()))
}

/// Valid POS details with the given name and no OSM back-reference.
pub fn sample_details(name: &str) -> PosDetails {
    PosDetails {
        name: name.to_owned(),
        description: format!("{name} on campus"),
        pos_type: PosType::Cafe,
        campus: CampusType::Altstadt,
        street: "Hauptstrasse".to_owned(),
        house_number: "120".to_owned(),
        postal_code: 69117,
        city: "Heidelberg".to_owned(),
        osm_node_id: None,
    }
}

/// Persisted POS stamped with [`fixture_timestamp`].
pub fn persisted_pos(id: i64, details: PosDetails) -> Pos {
    Pos::new(id, fixture_timestamp(), fixture_timestamp(), details).expect("valid fixture pos")
}

/// Node carrying exactly the given tags, located in Heidelberg.
pub fn osm_node(node_id: i64, pairs: &[(&str, &str)]) -> OsmNode {
    let tags: BTreeMap<String, String> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    OsmNode::new(node_id, 49.4094, 8.6942, tags).expect("valid fixture coordinates")
}

/// Node with a name and complete address tags.
pub fn admissible_osm_node(node_id: i64, name: &str) -> OsmNode {
    osm_node(
        node_id,
        &[
            ("name", name),
            ("addr:street", "Hauptstrasse"),
            ("addr:housenumber", "120"),
            ("addr:postcode", "69117"),
            ("addr:city", "Heidelberg"),
        ],
    )
}
