//! Embedded schema migrations for the POS store.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::PosRepositoryError;

/// Migrations from the `backend/migrations` directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration against `database_url`.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking thread pool.
///
/// # Errors
///
/// Returns `Connection` when the database cannot be reached and `Query`
/// when a migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, PosRepositoryError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<usize, PosRepositoryError> {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|err| PosRepositoryError::connection(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| PosRepositoryError::query(format!("migration failed: {err}")))?;
        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(applied.len())
    })
    .await
    .map_err(|err| PosRepositoryError::query(format!("migration task failed: {err}")))?
}
