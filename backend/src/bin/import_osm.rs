//! Import OpenStreetMap nodes as campus points of sale.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use campus_coffee_backend::domain::OsmImportService;
use campus_coffee_backend::domain::ports::{
    OsmImportBatchReport, OsmImportBatchRequest, OsmImportCommand, OsmImportOutcome,
    OsmImportSkipReason, OsmNodeSource, PosRepository, PosUpsertKind,
};
use campus_coffee_backend::outbound::memory::InMemoryPosRepository;
use campus_coffee_backend::outbound::osm_api::{OsmApiHttpIdentity, OsmApiHttpSource};
use campus_coffee_backend::outbound::persistence::{
    DbPool, DieselPosRepository, PoolConfig, run_pending_migrations,
};
use campus_coffee_backend::settings::{LogFormat, OsmImportSettings};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use reqwest::Url;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// `import-osm` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-osm",
    about = "Import OpenStreetMap nodes as campus points of sale",
    version
)]
struct CliArgs {
    /// Keep imported records in memory instead of PostgreSQL (dry run).
    #[arg(long = "in-memory")]
    in_memory: bool,
    /// Database connection URL. Falls back to `CAMPUS_COFFEE_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", conflicts_with = "in_memory")]
    database_url: Option<String>,
    /// Apply pending schema migrations before importing.
    #[arg(long = "migrate", conflicts_with = "in_memory")]
    migrate: bool,
    /// OpenStreetMap node identifiers, imported in the given order.
    #[arg(value_name = "NODE_ID", required = true, num_args = 1..)]
    node_ids: Vec<i64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let settings = OsmImportSettings::load_from_iter([OsString::from("import-osm")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    init_tracing(settings.log_format());

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    let report = runtime.block_on(run(args, &settings))?;

    for outcome in &report.outcomes {
        println!("{}", format_outcome(outcome));
    }
    println!("{}", format_summary(&report));
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if let Err(error) = result {
        tracing::warn!(%error, "tracing init failed");
    }
}

async fn run(args: CliArgs, settings: &OsmImportSettings) -> Result<OsmImportBatchReport> {
    let base_url = Url::parse(settings.osm_api_base_url())
        .wrap_err_with(|| format!("invalid OSM API URL '{}'", settings.osm_api_base_url()))?;
    let source = Arc::new(
        OsmApiHttpSource::with_identity(
            base_url,
            settings.request_timeout(),
            OsmApiHttpIdentity {
                user_agent: settings.user_agent().to_owned(),
            },
        )
        .wrap_err("failed to build OSM API client")?,
    );
    let request = OsmImportBatchRequest::from_node_ids(args.node_ids);

    if args.in_memory {
        info!("importing into an in-memory store; nothing will be persisted");
        let repo = Arc::new(InMemoryPosRepository::new(Arc::new(DefaultClock)));
        return Ok(import(source, repo, request).await);
    }

    let database_url = resolve_database_url(args.database_url, settings)?;
    if args.migrate {
        let applied = run_pending_migrations(&database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        info!(applied, "schema migrations complete");
    }
    let pool_config =
        PoolConfig::new(&database_url).with_checkout_timeout(settings.request_timeout());
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")?;
    let repo = Arc::new(DieselPosRepository::new(pool, Arc::new(DefaultClock)));
    Ok(import(source, repo, request).await)
}

async fn import<S, R>(
    source: Arc<S>,
    repo: Arc<R>,
    request: OsmImportBatchRequest,
) -> OsmImportBatchReport
where
    S: OsmNodeSource,
    R: PosRepository,
{
    OsmImportService::new(source, repo)
        .import_nodes(request)
        .await
}

fn resolve_database_url(explicit: Option<String>, settings: &OsmImportSettings) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }

    settings.database_url().map(str::to_owned).ok_or_else(|| {
        eyre!("database URL missing: set --database-url or CAMPUS_COFFEE_DATABASE_URL, or pass --in-memory")
    })
}

fn format_outcome(outcome: &OsmImportOutcome) -> String {
    match outcome {
        OsmImportOutcome::Imported {
            node_id,
            pos_id,
            name,
            change,
        } => {
            let change = match change {
                PosUpsertKind::Created => "created",
                PosUpsertKind::Updated => "updated",
            };
            format!("imported node={node_id} pos={pos_id} change={change} name={name:?}")
        }
        OsmImportOutcome::Skipped { node_id, reason } => {
            let reason = match reason {
                OsmImportSkipReason::NotFound => "not_found",
                OsmImportSkipReason::SourceUnavailable => "source_unavailable",
                OsmImportSkipReason::Incomplete => "incomplete",
            };
            format!("skipped node={node_id} reason={reason}")
        }
        OsmImportOutcome::Failed { node_id, message } => {
            format!("failed node={node_id} message={message:?}")
        }
    }
}

fn format_summary(report: &OsmImportBatchReport) -> String {
    let failed = report
        .outcomes
        .iter()
        .filter(|outcome| matches!(outcome, OsmImportOutcome::Failed { .. }))
        .count();
    let imported = report.imported_node_ids.len();
    let skipped = report.outcomes.len() - imported - failed;
    format!(
        "summary attempted={} imported={imported} skipped={skipped} failed={failed}",
        report.outcomes.len()
    )
}
