//! Behavioural unit coverage for batch import.

use std::sync::{Arc, Mutex};

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    OsmImportBatchRequest, OsmImportCommand, OsmImportOutcome, OsmImportSkipReason,
    OsmNodeSourceError,
};
use crate::test_support::{admissible_osm_node, persisted_pos};

fn repo_accepting_everything() -> MockPosRepository {
    let mut repo = MockPosRepository::new();
    repo.expect_find_by_osm_node_id().returning(|_| Ok(None));
    repo.expect_find_by_name().returning(|_| Ok(None));
    repo.expect_upsert()
        .returning(|draft| Ok(persisted_pos(1, draft.details().clone())));
    repo
}

#[rstest]
#[tokio::test]
async fn nulls_are_dropped_and_failures_do_not_abort() {
    let mut source = MockOsmNodeSource::new();
    source
        .expect_fetch_node()
        .returning(|node_id| match node_id {
            1 => Ok(admissible_osm_node(1, "Cafe Eins")),
            other => Err(OsmNodeSourceError::not_found(other)),
        });

    let request = OsmImportBatchRequest {
        node_ids: vec![Some(1), None, Some(2)],
    };
    let report = make_service(source, repo_accepting_everything())
        .import_nodes(request)
        .await;

    assert_eq!(report.imported_node_ids, vec![1]);
    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(
        report.outcomes[1],
        OsmImportOutcome::Skipped {
            node_id: 2,
            reason: OsmImportSkipReason::NotFound
        }
    ));
}

#[rstest]
#[tokio::test]
async fn ids_are_attempted_in_input_order_without_deduplication() {
    let requested = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&requested);
    let mut source = MockOsmNodeSource::new();
    source.expect_fetch_node().times(3).returning(move |node_id| {
        recorder.lock().expect("recorder lock").push(node_id);
        Ok(admissible_osm_node(node_id, &format!("Cafe {node_id}")))
    });

    let report = make_service(source, repo_accepting_everything())
        .import_nodes(OsmImportBatchRequest::from_node_ids([3, 1, 3]))
        .await;

    assert_eq!(report.imported_node_ids, vec![3, 1, 3]);
    assert_eq!(*requested.lock().expect("recorder lock"), vec![3, 1, 3]);
}

#[rstest]
#[tokio::test]
async fn empty_request_attempts_nothing() {
    let mut source = MockOsmNodeSource::new();
    source.expect_fetch_node().times(0);

    let report = make_service(source, MockPosRepository::new())
        .import_nodes(OsmImportBatchRequest {
            node_ids: vec![None, None],
        })
        .await;

    assert!(report.outcomes.is_empty());
    assert!(report.imported_node_ids.is_empty());
}
