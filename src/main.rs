mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StoreBackend};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::dataset::services::{DatasetFetcher, HttpSource};
use crate::features::dataset::{routes as dataset_routes, DatasetService};
use crate::features::institutions::{routes as institutions_routes, SearchService};
use crate::features::regions::{routes as regions_routes, RegionDirectory};
use crate::modules::store::{MemoryStore, RecordStore, SqliteStore};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded successfully");

    // Select the record store backend
    let store: Arc<dyn RecordStore> = match config.store.backend {
        StoreBackend::Sqlite => {
            if let Some(parent) = config.store.database_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let pool = database::create_pool(&config.store).await?;
            tracing::info!(
                "Sqlite store opened at {}",
                config.store.database_path.display()
            );

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed");

            Arc::new(SqliteStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // Load the region directory (generated file → bundled table → minimal)
    let directory = Arc::new(RegionDirectory::load(&config.regions.mapping_path));
    tracing::info!("Region directory loaded: {} cities", directory.cities().len());

    // Dataset fetch + import services
    let source = Arc::new(HttpSource::new(
        config.dataset.url.clone(),
        config.dataset.fetch_timeout_secs,
    )?);
    let fetcher = DatasetFetcher::new(
        source,
        config.dataset.csv_path.clone(),
        config.dataset.max_age_days,
    );
    let database_path = match config.store.backend {
        StoreBackend::Sqlite => Some(config.store.database_path.clone()),
        StoreBackend::Memory => None,
    };
    let dataset_service = Arc::new(DatasetService::new(fetcher, Arc::clone(&store), database_path));

    // Populate an empty store; an unreachable upstream is not fatal
    match dataset_service.ensure_loaded().await {
        Ok(count) => tracing::info!("Dataset ready: {} institution records", count),
        Err(e) => tracing::warn!("Dataset not initialized yet: {}", e),
    }

    // Search service
    let search_service = Arc::new(SearchService::new(Arc::clone(&directory), Arc::clone(&store)));
    tracing::info!("Search service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let api_routes = Router::new()
        .merge(regions_routes::routes(directory))
        .merge(institutions_routes::routes(search_service))
        .merge(dataset_routes::routes(dataset_service));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
