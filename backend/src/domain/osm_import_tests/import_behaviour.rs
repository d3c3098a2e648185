//! Behavioural unit coverage for single-node import.

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    OsmImportCommand, OsmImportOutcome, OsmImportSkipReason, OsmNodeSourceError,
    PosRepositoryError, PosUpsertKind,
};
use crate::test_support::{admissible_osm_node, osm_node, persisted_pos, sample_details};

#[rstest]
#[case::not_found(OsmNodeSourceError::not_found(NODE_ID), OsmImportSkipReason::NotFound)]
#[case::transport(
    OsmNodeSourceError::transport(NODE_ID, "connection reset"),
    OsmImportSkipReason::SourceUnavailable
)]
#[case::decode(
    OsmNodeSourceError::decode(NODE_ID, "missing lat"),
    OsmImportSkipReason::SourceUnavailable
)]
#[tokio::test]
async fn fetch_failures_skip_without_touching_the_store(
    #[case] failure: OsmNodeSourceError,
    #[case] reason: OsmImportSkipReason,
) {
    let mut source = MockOsmNodeSource::new();
    source
        .expect_fetch_node()
        .with(eq(NODE_ID))
        .times(1)
        .return_once(move |_| Err(failure));
    let mut repo = MockPosRepository::new();
    repo.expect_find_by_osm_node_id().times(0);
    repo.expect_upsert().times(0);

    let outcome = make_service(source, repo).import_node(NODE_ID).await;

    assert_eq!(
        outcome,
        OsmImportOutcome::Skipped {
            node_id: NODE_ID,
            reason
        }
    );
    assert!(!outcome.is_imported());
}

#[rstest]
#[case::no_name(osm_node(NODE_ID, &[("addr:street", "a"), ("addr:housenumber", "1"), ("addr:postcode", "69117"), ("addr:city", "HD")]))]
#[case::no_city(osm_node(NODE_ID, &[("name", "Cafe"), ("addr:street", "a"), ("addr:housenumber", "1"), ("addr:postcode", "69117")]))]
#[case::bad_postcode(osm_node(NODE_ID, &[("name", "Cafe"), ("addr:street", "a"), ("addr:housenumber", "1"), ("addr:postcode", "abc"), ("addr:city", "HD")]))]
#[tokio::test]
async fn incomplete_nodes_are_skipped(#[case] node: crate::domain::OsmNode) {
    let mut repo = MockPosRepository::new();
    repo.expect_upsert().times(0);

    let outcome = make_service(serving(node), repo).import_node(NODE_ID).await;

    assert_eq!(
        outcome,
        OsmImportOutcome::Skipped {
            node_id: NODE_ID,
            reason: OsmImportSkipReason::Incomplete
        }
    );
}

#[rstest]
#[tokio::test]
async fn new_node_is_created() {
    let mut repo = MockPosRepository::new();
    repo.expect_find_by_osm_node_id()
        .with(eq(NODE_ID))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_find_by_name()
        .withf(|name| name == "Cafe Botanik")
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_upsert()
        .withf(|draft| draft.id().is_none() && draft.details().osm_node_id == Some(NODE_ID))
        .times(1)
        .return_once(|draft| Ok(persisted_pos(7, draft.details().clone())));

    let outcome = make_service(serving(admissible_osm_node(NODE_ID, "Cafe Botanik")), repo)
        .import_node(NODE_ID)
        .await;

    assert_eq!(
        outcome,
        OsmImportOutcome::Imported {
            node_id: NODE_ID,
            pos_id: 7,
            name: "Cafe Botanik".to_owned(),
            change: PosUpsertKind::Created,
        }
    );
}

#[rstest]
#[tokio::test]
async fn node_already_imported_updates_matching_record() {
    let mut previous = sample_details("Cafe Botanik (old)");
    previous.osm_node_id = Some(NODE_ID);
    let existing = persisted_pos(3, previous);

    let mut repo = MockPosRepository::new();
    repo.expect_find_by_osm_node_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_find_by_name().times(0);
    repo.expect_upsert()
        .withf(|draft| draft.id() == Some(3) && draft.name() == "Cafe Botanik")
        .times(1)
        .return_once(|draft| Ok(persisted_pos(3, draft.details().clone())));

    let outcome = make_service(serving(admissible_osm_node(NODE_ID, "Cafe Botanik")), repo)
        .import_node(NODE_ID)
        .await;

    assert!(matches!(
        outcome,
        OsmImportOutcome::Imported {
            pos_id: 3,
            change: PosUpsertKind::Updated,
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn record_with_same_name_is_adopted() {
    let existing = persisted_pos(9, sample_details("Cafe Botanik"));

    let mut repo = MockPosRepository::new();
    repo.expect_find_by_osm_node_id().return_once(|_| Ok(None));
    repo.expect_find_by_name()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_upsert()
        .withf(|draft| draft.id() == Some(9) && draft.details().osm_node_id == Some(NODE_ID))
        .times(1)
        .return_once(|draft| Ok(persisted_pos(9, draft.details().clone())));

    let outcome = make_service(serving(admissible_osm_node(NODE_ID, "Cafe Botanik")), repo)
        .import_node(NODE_ID)
        .await;

    assert!(outcome.is_imported());
}

#[rstest]
#[case::duplicate(
    PosRepositoryError::duplicate_name("Cafe Botanik"),
    "pos name 'Cafe Botanik' already exists"
)]
#[case::connection(
    PosRepositoryError::connection("pool timed out"),
    "pos persistence connection failed: pool timed out"
)]
#[tokio::test]
async fn store_rejections_become_failed_outcomes(
    #[case] failure: PosRepositoryError,
    #[case] message: &str,
) {
    let mut repo = MockPosRepository::new();
    repo.expect_find_by_osm_node_id().return_once(|_| Ok(None));
    repo.expect_find_by_name().return_once(|_| Ok(None));
    repo.expect_upsert().return_once(move |_| Err(failure));

    let outcome = make_service(serving(admissible_osm_node(NODE_ID, "Cafe Botanik")), repo)
        .import_node(NODE_ID)
        .await;

    assert_eq!(
        outcome,
        OsmImportOutcome::Failed {
            node_id: NODE_ID,
            message: message.to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn lookup_failure_becomes_failed_outcome() {
    let mut repo = MockPosRepository::new();
    repo.expect_find_by_osm_node_id()
        .return_once(|_| Err(PosRepositoryError::query("relation \"pos\" does not exist")));
    repo.expect_upsert().times(0);

    let outcome = make_service(serving(admissible_osm_node(NODE_ID, "Cafe Botanik")), repo)
        .import_node(NODE_ID)
        .await;

    assert!(matches!(outcome, OsmImportOutcome::Failed { .. }));
}
