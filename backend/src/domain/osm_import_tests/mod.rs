//! Shared fixtures and module wiring for OSM import unit tests.

use std::sync::Arc;

use crate::domain::OsmImportService;
use crate::domain::ports::{MockOsmNodeSource, MockPosRepository};

pub(super) const NODE_ID: i64 = 5_589_879_349;

pub(super) fn make_service(
    node_source: MockOsmNodeSource,
    pos_repo: MockPosRepository,
) -> OsmImportService<MockOsmNodeSource, MockPosRepository> {
    OsmImportService::new(Arc::new(node_source), Arc::new(pos_repo))
}

/// Source that serves `node` for every request.
pub(super) fn serving(node: crate::domain::OsmNode) -> MockOsmNodeSource {
    let mut source = MockOsmNodeSource::new();
    source
        .expect_fetch_node()
        .returning(move |_| Ok(node.clone()));
    source
}

mod batch_behaviour;
mod import_behaviour;
