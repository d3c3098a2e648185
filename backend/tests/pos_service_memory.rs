//! `PosService` wired to the in-memory store.

use std::sync::Arc;

use campus_coffee_backend::domain::ports::{PosCommand, PosQuery};
use campus_coffee_backend::domain::{ErrorCode, PosDraft, PosService};
use campus_coffee_backend::outbound::memory::InMemoryPosRepository;
use campus_coffee_backend::test_support::{fixture_clock, sample_details};
use rstest::{fixture, rstest};

#[fixture]
fn service() -> PosService<InMemoryPosRepository> {
    PosService::new(Arc::new(InMemoryPosRepository::new(fixture_clock())))
}

fn draft(name: &str) -> PosDraft {
    PosDraft::new(sample_details(name)).expect("valid draft")
}

#[rstest]
#[tokio::test]
async fn create_then_update_keeps_one_record(service: PosService<InMemoryPosRepository>) {
    let created = service.upsert(draft("Cafe Botanik")).await.expect("create");

    let mut details = created.details().clone();
    details.description = "Cafe Botanik, now with cake".to_owned();
    let update = PosDraft::new(details).expect("valid draft").with_id(created.id());
    let updated = service.upsert(update).await.expect("update");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.created_at(), created.created_at());
    let all = service.get_all().await.expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].details().description, "Cafe Botanik, now with cake");
}

#[rstest]
#[tokio::test]
async fn duplicate_names_surface_as_conflicts(service: PosService<InMemoryPosRepository>) {
    service.upsert(draft("Mensa")).await.expect("create");

    let error = service
        .upsert(draft("Mensa"))
        .await
        .expect_err("duplicate name should be rejected");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn unknown_ids_are_not_found(service: PosService<InMemoryPosRepository>) {
    let lookup = service.get_by_id(41).await.expect_err("missing id");
    assert_eq!(lookup.code(), ErrorCode::NotFound);

    let update = service
        .upsert(draft("Ghost Cafe").with_id(41))
        .await
        .expect_err("missing id");
    assert_eq!(update.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn clear_empties_the_store(service: PosService<InMemoryPosRepository>) {
    service.upsert(draft("Cafe Botanik")).await.expect("create");
    service.upsert(draft("Mensa")).await.expect("create");

    service.clear().await.expect("clear");

    assert!(service.get_all().await.expect("list").is_empty());
}
