//! API server — HTTP routes, middleware, and the metrics exporter.

use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;
use axum::routing::{get, post};
use axum::Router;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracker_core::config::AppConfig;
use tracker_core::Dataset;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Main API server serving the dashboard REST surface.
pub struct ApiServer {
    config: AppConfig,
    current: Arc<RwLock<Dataset>>,
}

impl ApiServer {
    pub fn new(config: AppConfig, current: Arc<RwLock<Dataset>>) -> Self {
        Self { config, current }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState {
            current: self.current.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
            max_upload_bytes: self.config.dataset.max_upload_bytes,
        };

        let app = Router::new()
            // Dataset endpoints
            .route(
                "/v1/dataset",
                post(rest::upload_dataset).get(rest::dataset_summary),
            )
            .route("/v1/dataset/export", post(rest::export_dataset))
            // Dashboard endpoints
            .route(
                "/v1/dashboard",
                post(rest::dashboard_view).get(rest::dashboard_default),
            )
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // API documentation
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::new(
            self.config.api.host.parse()?,
            self.config.api.http_port,
        );

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
