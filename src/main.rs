use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use kinoteka::{
    application::error::AppError,
    cache::{CacheConfig, CacheManager, CacheStore, MemoryStore, RedisStore},
    config::{self, CacheBackend},
    infra::{
        elastic::{ElasticClient, SearchEngine, ensure_indices},
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use tokio::sync::watch;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::EnsureIndices(_) => run_ensure_indices(settings).await,
    }
}

fn build_search_engine(settings: &config::Settings) -> Result<Arc<dyn SearchEngine>, AppError> {
    let client = ElasticClient::new(&settings.elastic.url, settings.elastic.request_timeout)
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    Ok(Arc::new(client))
}

async fn build_cache(settings: &config::Settings) -> Result<CacheManager, AppError> {
    let cache_config = CacheConfig::from(&settings.cache);
    let store: Arc<dyn CacheStore> = match settings.cache.backend {
        CacheBackend::Disabled => {
            info!(target: "kinoteka::serve", "Response cache disabled");
            return Ok(CacheManager::disabled());
        }
        CacheBackend::Memory => Arc::new(MemoryStore::new(&cache_config)),
        CacheBackend::Redis => Arc::new(
            RedisStore::connect(&settings.redis.url)
                .await
                .map_err(|err| AppError::from(InfraError::from(err)))?,
        ),
    };

    info!(
        target: "kinoteka::serve",
        backend = ?settings.cache.backend,
        ttl_seconds = cache_config.ttl.as_secs(),
        fail_open = cache_config.fail_open,
        "Response cache enabled"
    );
    Ok(CacheManager::new(store, cache_config))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let engine = build_search_engine(&settings)?;
    let cache = build_cache(&settings).await?;
    let state = AppState::new(engine, cache);
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target: "kinoteka::serve",
        project = %settings.project_name,
        addr = %settings.server.addr,
        "Listening"
    );

    let (signalled_tx, mut signalled_rx) = watch::channel(false);
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(true);
        })
        .into_future();

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::from(InfraError::from(err)))?;
        }
        _ = grace_expired(&mut signalled_rx, grace) => {
            warn!(
                target: "kinoteka::serve",
                grace_seconds = grace.as_secs(),
                "Graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target: "kinoteka::serve", "Server stopped");
    Ok(())
}

async fn run_ensure_indices(settings: config::Settings) -> Result<(), AppError> {
    let engine = build_search_engine(&settings)?;
    engine
        .ping()
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    let created = ensure_indices(engine.as_ref())
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target: "kinoteka::ensure_indices",
        created = ?created,
        "Indices ready"
    );
    Ok(())
}

/// Resolve once the shutdown signal has fired and the grace period has elapsed.
async fn grace_expired(signalled: &mut watch::Receiver<bool>, grace: Duration) {
    if signalled.wait_for(|fired| *fired).await.is_err() {
        // Sender dropped without signalling: the server finished on its own.
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target: "kinoteka::serve", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(target: "kinoteka::serve", error = %err, "failed to listen for SIGTERM");
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

    info!(target: "kinoteka::serve", "Shutdown signal received");
}
