use crate::config::{MarkerConfig, StoreBackend};
use crate::handlers;
use crate::services::{InMemoryMarkerStore, MarkerStore, MongoDb, MongoMarkerStore};
use axum::{
    http::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    create_ip_rate_limiter, ip_rate_limit_middleware, panic_response, request_id_middleware,
    security_headers_middleware, IpRateLimiter, SecurityHeaders, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub const MARKERS_PATH: &str = "/api/v1/markers";

#[derive(Clone)]
pub struct AppState {
    pub config: MarkerConfig,
    pub store: Arc<dyn MarkerStore>,
    pub rate_limiter: IpRateLimiter,
}

impl AppState {
    pub fn new(config: MarkerConfig, store: Arc<dyn MarkerStore>) -> Self {
        let rate_limiter = create_ip_rate_limiter(config.http.rate_limit_per_second);
        Self {
            config,
            store,
            rate_limiter,
        }
    }
}

/// Builds the full router: marker routes, health, and the request middleware
/// stack. Layers are listed innermost first.
pub fn build_router(state: AppState) -> Router {
    let security = SecurityHeaders {
        hsts_max_age: state.config.http.hsts_max_age,
    };
    let request_timeout = state.config.http.request_timeout();
    let rate_limiter = state.rate_limiter.clone();

    let collection_routes = get(handlers::list_markers).post(handlers::create_marker);
    let item_routes = put(handlers::update_marker).delete(handlers::delete_marker);

    // The trailing-slash path doubles as the item route with an empty id
    Router::new()
        .route(MARKERS_PATH, collection_routes.clone())
        .route(
            &format!("{}/", MARKERS_PATH),
            collection_routes.merge(item_routes.clone()),
        )
        .route(&format!("{}/:id", MARKERS_PATH), item_routes)
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(from_fn_with_state(security, security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(from_fn_with_state(rate_limiter, ip_rate_limit_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(request_id_middleware))
}

/// Opens the configured marker store.
pub async fn connect_store(config: &MarkerConfig) -> Result<Arc<dyn MarkerStore>, AppError> {
    match config.store {
        StoreBackend::Mongo => {
            let db = MongoDb::connect(
                &config.mongodb.uri,
                &config.mongodb.database,
                config.http.request_timeout(),
            )
            .await?;
            Ok(Arc::new(MongoMarkerStore::new(
                db,
                &config.mongodb.collection,
            )))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory marker store; data is lost on restart");
            Ok(Arc::new(InMemoryMarkerStore::new()))
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: MarkerConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await.map_err(|e| {
            tracing::error!("Failed to open marker store: {}", e);
            e
        })?;

        Self::with_store(config, store).await
    }

    /// Builds the application around an already opened store.
    pub async fn with_store(
        config: MarkerConfig,
        store: Arc<dyn MarkerStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let router = build_router(AppState::new(config, store));

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
