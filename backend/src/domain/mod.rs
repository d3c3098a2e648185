//! Domain primitives, services and ports.
//!
//! Purpose: model OSM nodes and campus points of sale, convert one into the
//! other, and orchestrate imports behind ports so adapters stay swappable.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - OsmNode: immutable source node with private tags.
//! - PosDraft / Pos: unsaved versus persisted point of sale.
//! - convert_osm_node: pure node-to-draft conversion.
//! - OsmImportService / PosService: driving-port implementations.

pub mod error;
pub mod osm_import;
pub mod osm_node;
pub mod pos;
pub mod pos_conversion;
pub mod pos_service;
pub mod ports;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::osm_import::OsmImportService;
pub use self::osm_node::{OsmNode, OsmNodeValidationError};
pub use self::pos::{
    CampusType, Pos, PosDetails, PosDraft, PosType, PosValidationError, UnknownLabelError,
};
pub use self::pos_conversion::{
    DEFAULT_CAMPUS, PosConversionError, classify_campus, classify_pos_type, convert_osm_node,
    synthesise_description,
};
pub use self::pos_service::PosService;
