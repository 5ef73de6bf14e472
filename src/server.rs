//! Backend wiring and HTTP server lifecycle.

use crate::application::flush_job::spawn_flush_job;
use crate::config::Config;
use crate::infrastructure::cache::{self, CacheService, MemoryCache, RedisCache};
use crate::infrastructure::clicks::{ClickCounter, MemoryClickCounter, RedisClickCounter};
use crate::infrastructure::id_source::HttpIdSource;
use crate::infrastructure::persistence::PgMappingRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Cache and pending click counters, backed by the same store.
pub struct FastStore {
    pub cache: Arc<dyn CacheService>,
    pub click_counter: Arc<dyn ClickCounter>,
    /// `true` when backed by Redis and therefore visible to other processes.
    pub shared: bool,
}

/// Opens the connection pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_connect_timeout())
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Connects to Redis, falling back to in-process structures when Redis is not
/// configured or unreachable.
pub async fn connect_fast_store(config: &Config) -> FastStore {
    let in_process = || FastStore {
        cache: Arc::new(MemoryCache::new(config.cache_ttl())),
        click_counter: Arc::new(MemoryClickCounter::new()),
        shared: false,
    };

    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Redis not configured, using in-process cache and click counters");
        return in_process();
    };

    match cache::connect(redis_url).await {
        Ok(conn) => {
            tracing::info!("Cache and click counters enabled (Redis)");
            FastStore {
                cache: Arc::new(RedisCache::new(conn.clone(), config.cache_ttl())),
                click_counter: Arc::new(RedisClickCounter::new(conn)),
                shared: true,
            }
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using in-process cache and click counters.",
                e
            );
            in_process()
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Startup order: database and migrations, fast store, identifier client,
/// flush job, listener. On Ctrl-C or SIGTERM the server stops accepting
/// requests, in-flight requests complete, then the flush job drains the
/// remaining pending clicks.
///
/// # Errors
///
/// Returns an error if a backend cannot be initialized, the bind fails, or
/// the server stops with an I/O error.
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    let fast_store = connect_fast_store(&config).await;

    let snowflake_base_url = config
        .snowflake_base_url
        .as_deref()
        .context("SNOWFLAKE_BASE_URL must be set")?;
    let id_source = HttpIdSource::new(snowflake_base_url, config.id_fetch_timeout())
        .context("Failed to build identifier service client")?;
    tracing::info!("Identifier service: {}", id_source.endpoint());

    let repository = Arc::new(PgMappingRepository::new(Arc::new(pool)));
    let state = AppState::new(
        repository,
        Arc::new(id_source),
        fast_store.cache,
        fast_store.click_counter,
        config.race_max_retries,
    );

    let flush_job = spawn_flush_job(state.click_aggregator.clone(), config.click_flush_interval());

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    flush_job.stop().await;
    tracing::info!("Server stopped");

    served.context("Server error")
}

/// Completes on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
