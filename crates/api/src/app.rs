use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{health, records};

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.security.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(config: Config, records: Arc<dyn RecordStore>) -> Router {
    let cors = cors_layer(&config);
    let state = AppState { records };

    let record_routes = Router::new()
        .route(records::RECORDS_PATH, post(records::create_record))
        .route("/api/v1/records/:id", get(records::get_record))
        .route("/api/v1/records/download/pdf", get(records::download_pdf))
        .route(
            "/api/v1/records/download/excel",
            get(records::download_excel),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(record_routes)
        // Global middleware (bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
