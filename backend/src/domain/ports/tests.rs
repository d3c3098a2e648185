//! Behaviour of port-level value types and fixtures.

use std::collections::BTreeMap;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::OsmNode;

fn imported(node_id: i64) -> OsmImportOutcome {
    OsmImportOutcome::Imported {
        node_id,
        pos_id: node_id * 10,
        name: format!("pos-{node_id}"),
        change: PosUpsertKind::Created,
    }
}

#[rstest]
fn batch_report_lists_imported_ids_in_input_order() {
    let report = OsmImportBatchReport::from_outcomes(vec![
        imported(3),
        OsmImportOutcome::Skipped {
            node_id: 1,
            reason: OsmImportSkipReason::NotFound,
        },
        imported(2),
        OsmImportOutcome::Failed {
            node_id: 4,
            message: "pos name 'x' already exists".to_owned(),
        },
        imported(3),
    ]);

    assert_eq!(report.imported_node_ids, vec![3, 2, 3]);
    assert_eq!(report.outcomes.len(), 5);
}

#[rstest]
fn outcome_serialises_with_status_tag() {
    let value = serde_json::to_value(OsmImportOutcome::Skipped {
        node_id: 9,
        reason: OsmImportSkipReason::SourceUnavailable,
    })
    .expect("serialise outcome");

    assert_eq!(
        value,
        json!({"status": "skipped", "nodeId": 9, "reason": "source_unavailable"})
    );
}

#[rstest]
fn batch_request_deserialises_null_entries() {
    let request: OsmImportBatchRequest =
        serde_json::from_value(json!({"nodeIds": [1, null, 2]})).expect("decode request");
    assert_eq!(request.node_ids, vec![Some(1), None, Some(2)]);
    assert_eq!(
        OsmImportBatchRequest::from_node_ids([1, 2]).node_ids,
        vec![Some(1), Some(2)]
    );
}

#[rstest]
#[case(OsmNodeSourceError::not_found(5_i64), 5)]
#[case(OsmNodeSourceError::transport(6_i64, "timeout"), 6)]
#[case(OsmNodeSourceError::decode(7_i64, "missing lat"), 7)]
fn source_errors_expose_node_id(#[case] error: OsmNodeSourceError, #[case] expected: i64) {
    assert_eq!(error.node_id(), expected);
}

#[rstest]
#[tokio::test]
async fn fixture_source_serves_known_nodes_only() {
    let node = OsmNode::new(11, 49.4, 8.7, BTreeMap::new()).expect("valid node");
    let source = FixtureOsmNodeSource::new([node.clone()]);

    assert_eq!(source.fetch_node(11).await, Ok(node));
    assert_eq!(
        source.fetch_node(12).await,
        Err(OsmNodeSourceError::NotFound { node_id: 12 })
    );
}
