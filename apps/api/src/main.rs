mod config;
mod cv;
mod db;
mod errors;
mod jobs;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, RecordBackend, StorageBackend};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::{PgCvStore, PgJobStore};
use crate::store::s3::S3Bucket;
use crate::store::supabase::SupabaseClient;
use crate::store::{CvStore, FileBucket, JobStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Aggregator API v{}", env!("CARGO_PKG_VERSION"));

    let supabase = match &config.supabase {
        Some(supabase_config) => Some(
            SupabaseClient::new(supabase_config, &config.cv_bucket)
                .context("Failed to build Supabase HTTP client")?,
        ),
        None => None,
    };

    // Record store
    let (jobs, cvs): (Arc<dyn JobStore>, Arc<dyn CvStore>) = match config.record_backend {
        RecordBackend::Postgres => {
            let settings = config
                .database
                .as_ref()
                .context("Postgres record backend selected without connection settings")?;
            let db = create_pool(settings).await?;
            let jobs: Arc<dyn JobStore> = Arc::new(PgJobStore::new(db.clone()));
            let cvs: Arc<dyn CvStore> = Arc::new(PgCvStore::new(db));
            (jobs, cvs)
        }
        RecordBackend::Supabase => {
            let client = supabase
                .clone()
                .context("Supabase record backend selected without SUPABASE_URL/SUPABASE_KEY")?;
            let jobs: Arc<dyn JobStore> = Arc::new(client.clone());
            let cvs: Arc<dyn CvStore> = Arc::new(client);
            (jobs, cvs)
        }
    };
    info!("Record store: {:?}", config.record_backend);

    // CV bucket
    let bucket: Arc<dyn FileBucket> = match config.storage_backend {
        StorageBackend::S3 => {
            let s3_config = config
                .s3
                .as_ref()
                .context("S3 storage backend selected without S3 settings")?;
            Arc::new(S3Bucket::connect(s3_config, &config.cv_bucket).await)
        }
        StorageBackend::Supabase => Arc::new(
            supabase.context("Supabase storage backend selected without SUPABASE_URL/SUPABASE_KEY")?,
        ),
    };
    info!(
        "CV bucket: {:?} ({})",
        config.storage_backend, config.cv_bucket
    );

    // Build app state
    let state = AppState {
        jobs,
        cvs,
        bucket,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
