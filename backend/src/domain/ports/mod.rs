//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`OsmNodeSource`, `PosRepository`) describe what the domain
//! needs from infrastructure. Driving ports (`OsmImportCommand`, `PosCommand`,
//! `PosQuery`) describe what the domain offers to callers.

mod macros;
pub(crate) use macros::define_port_error;

mod osm_import_command;
mod osm_node_source;
mod pos_command;
mod pos_query;
mod pos_repository;

#[cfg(test)]
pub use osm_import_command::MockOsmImportCommand;
pub use osm_import_command::{
    OsmImportBatchReport, OsmImportBatchRequest, OsmImportCommand, OsmImportOutcome,
    OsmImportSkipReason, PosUpsertKind,
};
#[cfg(test)]
pub use osm_node_source::MockOsmNodeSource;
pub use osm_node_source::{FixtureOsmNodeSource, OsmNodeSource, OsmNodeSourceError};
#[cfg(test)]
pub use pos_command::MockPosCommand;
pub use pos_command::PosCommand;
#[cfg(test)]
pub use pos_query::MockPosQuery;
pub use pos_query::PosQuery;
#[cfg(test)]
pub use pos_repository::MockPosRepository;
pub use pos_repository::{PosRepository, PosRepositoryError};

#[cfg(test)]
mod tests;
