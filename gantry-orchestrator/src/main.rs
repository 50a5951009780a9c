use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod scm;
pub mod service;
pub mod sync;
#[cfg(test)]
pub mod testing;
pub mod vault;

use gantry_core::ports::{PipelineStore, ScmProvider};

use crate::api::AppState;
use crate::repository::postgres::{PgPipelineStore, PgUserStore};
use crate::scm::HttpScmProvider;
use crate::service::Services;
use crate::sync::JobSync;
use crate::vault::HttpVault;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gantry Orchestrator...");

    let config = config::Config::from_env();
    config.validate().expect("Invalid configuration");

    tracing::info!("Connecting to database...");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Database connection pool created");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Wire the concrete adapters into the workflow's ports
    let pipelines: Arc<dyn PipelineStore> = Arc::new(PgPipelineStore::new(pool.clone()));
    let scm: Arc<dyn ScmProvider> = Arc::new(HttpScmProvider::new(&config.scm_api_url));
    let services = Services {
        users: Arc::new(PgUserStore::new(pool)),
        vault: Arc::new(HttpVault::new(&config.vault_api_url)),
        syncer: Arc::new(JobSync::new(scm.clone(), pipelines.clone())),
        scm,
        pipelines,
    };

    let app = api::create_router(AppState {
        services,
        public_scheme: config.public_scheme.clone(),
    });

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
