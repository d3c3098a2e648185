//! In-memory `PosRepository` adapter.
//!
//! Serves tests and dry-run imports. All state sits behind one mutex, so the
//! uniqueness checks and the write happen atomically, matching the
//! constraint-backed behaviour of the PostgreSQL adapter.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{PosRepository, PosRepositoryError};
use crate::domain::{Pos, PosDraft};

#[derive(Debug, Default)]
struct Store {
    records: BTreeMap<i64, Pos>,
    last_id: i64,
}

impl Store {
    fn check_unique(&self, draft: &PosDraft) -> Result<(), PosRepositoryError> {
        let details = draft.details();
        let others = self
            .records
            .values()
            .filter(|pos| Some(pos.id()) != draft.id());

        for other in others {
            if other.name() == details.name {
                return Err(PosRepositoryError::duplicate_name(details.name.as_str()));
            }
            if details.osm_node_id.is_some() && other.osm_node_id() == details.osm_node_id {
                return Err(PosRepositoryError::query(
                    "osm node is already linked to another pos",
                ));
            }
        }
        Ok(())
    }
}

/// Mutex-guarded POS store with sequential ids starting at 1.
pub struct InMemoryPosRepository {
    store: Mutex<Store>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPosRepository {
    /// Create an empty repository stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, PosRepositoryError> {
        self.store
            .lock()
            .map_err(|_| PosRepositoryError::connection("in-memory pos store lock poisoned"))
    }
}

fn into_pos(
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    draft: &PosDraft,
) -> Result<Pos, PosRepositoryError> {
    Pos::new(id, created_at, updated_at, draft.details().clone())
        .map_err(|err| PosRepositoryError::query(err.to_string()))
}

#[async_trait]
impl PosRepository for InMemoryPosRepository {
    async fn upsert(&self, draft: &PosDraft) -> Result<Pos, PosRepositoryError> {
        let now = self.clock.utc();
        let mut store = self.lock()?;

        let pos = match draft.id() {
            None => {
                store.check_unique(draft)?;
                let id = store.last_id + 1;
                let pos = into_pos(id, now, now, draft)?;
                store.last_id = id;
                pos
            }
            Some(id) => {
                let created_at = store
                    .records
                    .get(&id)
                    .map(Pos::created_at)
                    .ok_or_else(|| PosRepositoryError::not_found(id))?;
                store.check_unique(draft)?;
                into_pos(id, created_at, now.max(created_at), draft)?
            }
        };

        debug!(pos_id = pos.id(), "stored pos in memory");
        store.records.insert(pos.id(), pos.clone());
        Ok(pos)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Pos>, PosRepositoryError> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    async fn find_by_osm_node_id(
        &self,
        node_id: i64,
    ) -> Result<Option<Pos>, PosRepositoryError> {
        Ok(self
            .lock()?
            .records
            .values()
            .find(|pos| pos.osm_node_id() == Some(node_id))
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Pos>, PosRepositoryError> {
        Ok(self
            .lock()?
            .records
            .values()
            .find(|pos| pos.name() == name)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Pos>, PosRepositoryError> {
        Ok(self.lock()?.records.values().cloned().collect())
    }

    async fn clear(&self) -> Result<(), PosRepositoryError> {
        self.lock()?.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Contract coverage for the in-memory POS store.

    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{DateTime, Duration, Local, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_support::{fixture_clock, fixture_timestamp, sample_details};

    #[fixture]
    fn repo() -> InMemoryPosRepository {
        InMemoryPosRepository::new(fixture_clock())
    }

    fn draft(name: &str) -> PosDraft {
        PosDraft::new(sample_details(name)).expect("valid draft")
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_sequential_ids_and_timestamps(repo: InMemoryPosRepository) {
        let first = repo.upsert(&draft("A")).await.expect("create A");
        let second = repo.upsert(&draft("B")).await.expect("create B");

        assert_eq!((first.id(), second.id()), (1, 2));
        assert_eq!(first.created_at(), fixture_timestamp());
        assert_eq!(first.updated_at(), fixture_timestamp());
    }

    /// Clock advancing one hour per reading.
    struct SteppingClock {
        readings: AtomicI64,
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            fixture_timestamp() + Duration::hours(self.readings.fetch_add(1, Ordering::SeqCst))
        }
    }

    #[rstest]
    #[tokio::test]
    async fn update_keeps_created_at_and_refreshes_updated_at() {
        let repo = InMemoryPosRepository::new(Arc::new(SteppingClock {
            readings: AtomicI64::new(0),
        }));
        let created = repo.upsert(&draft("A")).await.expect("create");

        let mut renamed = created.details().clone();
        renamed.name = "A2".to_owned();
        let updated = repo
            .upsert(&PosDraft::new(renamed).expect("valid").with_id(created.id()))
            .await
            .expect("update");

        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.created_at(), fixture_timestamp());
        assert_eq!(updated.updated_at(), fixture_timestamp() + Duration::hours(1));
        assert_eq!(updated.name(), "A2");
        assert_eq!(repo.list_all().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_names_are_rejected_on_create_and_rename(repo: InMemoryPosRepository) {
        repo.upsert(&draft("A")).await.expect("create A");
        let b = repo.upsert(&draft("B")).await.expect("create B");

        assert_eq!(
            repo.upsert(&draft("A")).await,
            Err(PosRepositoryError::duplicate_name("A"))
        );
        let mut renamed = b.details().clone();
        renamed.name = "A".to_owned();
        assert_eq!(
            repo.upsert(&PosDraft::new(renamed).expect("valid").with_id(b.id()))
                .await,
            Err(PosRepositoryError::duplicate_name("A"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn missing_update_target_wins_over_name_clash(repo: InMemoryPosRepository) {
        repo.upsert(&draft("A")).await.expect("create A");

        assert_eq!(
            repo.upsert(&draft("A").with_id(42)).await,
            Err(PosRepositoryError::not_found(42_i64))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn updating_own_name_is_not_a_duplicate(repo: InMemoryPosRepository) {
        let created = repo.upsert(&draft("A")).await.expect("create");
        let updated = repo.upsert(&created.to_draft()).await.expect("update");
        assert_eq!(updated.id(), created.id());
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_record_is_not_found(repo: InMemoryPosRepository) {
        assert_eq!(
            repo.upsert(&draft("A").with_id(5)).await,
            Err(PosRepositoryError::not_found(5_i64))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_and_clear(repo: InMemoryPosRepository) {
        let mut linked = sample_details("Linked");
        linked.osm_node_id = Some(77);
        let created = repo
            .upsert(&PosDraft::new(linked).expect("valid"))
            .await
            .expect("create");

        assert_eq!(repo.find_by_osm_node_id(77).await, Ok(Some(created.clone())));
        assert_eq!(repo.find_by_name("Linked").await, Ok(Some(created.clone())));
        assert_eq!(repo.find_by_id(created.id()).await, Ok(Some(created)));
        assert_eq!(repo.find_by_name("linked").await, Ok(None));

        repo.clear().await.expect("clear");
        assert_eq!(repo.list_all().await, Ok(Vec::new()));
    }
}
