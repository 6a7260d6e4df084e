//! REST API handlers for dataset ingestion and dashboard views.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracker_core::{Dataset, DatasetSource, DerivedRecord, GroupBy, TrackerError};
use tracker_reporting::{
    aggregate, derive, filter, DateRange, FilterSelection, GroupTotals, KpiCard, KpiSummary,
    TrendPoint,
};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Shared application state for REST handlers. The current dataset is
/// the only mutable state; uploads swap the whole value.
#[derive(Clone)]
pub struct AppState {
    pub current: Arc<RwLock<Dataset>>,
    pub node_id: String,
    pub start_time: Instant,
    pub max_upload_bytes: usize,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

/// Summary of the currently loaded dataset; also what the UI uses to
/// populate its filter controls.
#[derive(Serialize, ToSchema)]
pub struct DatasetSummary {
    pub id: Uuid,
    pub source: DatasetSource,
    pub loaded_at: DateTime<Utc>,
    pub rows: usize,
    /// Distinct platforms in first-appearance order.
    pub platforms: Vec<String>,
    /// Distinct campaigns in first-appearance order.
    pub campaigns: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Filter selection as sent by the UI. Omitted fields default to the
/// full universe of the loaded dataset; an explicitly empty array is an
/// empty selection and matches nothing.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DashboardRequest {
    pub platforms: Option<Vec<String>>,
    pub campaigns: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct TrendChart {
    pub title: String,
    pub points: Vec<TrendPoint>,
}

#[derive(Serialize, ToSchema)]
pub struct RevenueChart {
    pub title: String,
    pub rows: Vec<GroupTotals>,
}

/// Everything the dashboard renders for one filter selection.
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub kpis: KpiSummary,
    pub kpi_cards: Vec<KpiCard>,
    pub trend: TrendChart,
    pub revenue_by_platform: RevenueChart,
    pub revenue_by_campaign: RevenueChart,
    pub records: Vec<DerivedRecord>,
    pub row_count: usize,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn error_response(err: &TrackerError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match err {
        TrackerError::Schema { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "missing_columns"),
        TrackerError::Format(_) | TrackerError::Csv(_) => {
            (StatusCode::BAD_REQUEST, "invalid_dataset")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

fn dataset_summary_of(dataset: &Dataset) -> DatasetSummary {
    let bounds = filter::date_bounds(&dataset.records);
    DatasetSummary {
        id: dataset.id,
        source: dataset.source,
        loaded_at: dataset.loaded_at,
        rows: dataset.records.len(),
        platforms: filter::distinct_platforms(&dataset.records),
        campaigns: filter::distinct_campaigns(&dataset.records),
        start_date: bounds.map(|(start, _)| start),
        end_date: bounds.map(|(_, end)| end),
    }
}

/// Resolve a request into a concrete selection against the loaded
/// table. Omitted members default to the full universe; explicit empty
/// arrays stay empty.
fn resolve_selection(records: &[DerivedRecord], request: &DashboardRequest) -> FilterSelection {
    let (min_date, max_date) =
        filter::date_bounds(records).unwrap_or((NaiveDate::MIN, NaiveDate::MAX));

    let platforms: HashSet<String> = match &request.platforms {
        Some(selected) => selected.iter().cloned().collect(),
        None => filter::distinct_platforms(records).into_iter().collect(),
    };
    let campaigns: HashSet<String> = match &request.campaigns {
        Some(selected) => selected.iter().cloned().collect(),
        None => filter::distinct_campaigns(records).into_iter().collect(),
    };

    FilterSelection {
        platforms,
        campaigns,
        dates: DateRange {
            start: request.start_date.unwrap_or(min_date),
            end: request.end_date.unwrap_or(max_date),
        },
    }
}

fn build_dashboard(records: &[DerivedRecord], request: &DashboardRequest) -> DashboardResponse {
    let selection = resolve_selection(records, request);
    let filtered = filter::apply(records, &selection);

    if filtered.is_empty() {
        warn!("Dashboard request matched zero rows");
        metrics::counter!("dashboard.empty_results").increment(1);
    }

    let kpis = aggregate::kpi_summary(&filtered);
    let kpi_cards = aggregate::kpi_cards(&kpis);
    let row_count = filtered.len();

    DashboardResponse {
        kpis,
        kpi_cards,
        trend: TrendChart {
            title: "Daily Performance Trend".to_string(),
            points: aggregate::daily_trend(&filtered),
        },
        revenue_by_platform: RevenueChart {
            title: "Revenue by Platform".to_string(),
            rows: aggregate::group_totals(&filtered, GroupBy::Platform),
        },
        revenue_by_campaign: RevenueChart {
            title: "Revenue by Campaign".to_string(),
            rows: aggregate::group_totals(&filtered, GroupBy::Campaign),
        },
        records: filtered,
        row_count,
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// POST /v1/dataset — upload a dataset (CSV, TSV, or XLSX), replacing
/// the currently served one. A failed upload leaves the current
/// dataset untouched.
#[utoipa::path(
    post,
    path = "/v1/dataset",
    tag = "Dataset",
    request_body(
        content = String,
        content_type = "text/csv",
        description = "Delimited text (CSV/TSV) or XLSX workbook bytes"
    ),
    responses(
        (status = 200, description = "Dataset loaded and derived", body = DatasetSummary),
        (status = 400, description = "Input is not parseable tabular data", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorResponse),
        (status = 422, description = "Required columns missing", body = ErrorResponse),
    )
)]
pub async fn upload_dataset(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DatasetSummary>, (StatusCode, Json<ErrorResponse>)> {
    if body.len() > state.max_upload_bytes {
        warn!(bytes = body.len(), limit = state.max_upload_bytes, "Upload rejected: too large");
        metrics::counter!("dataset.load_failures").increment(1);
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse {
                error: "upload_too_large".to_string(),
                message: format!("upload exceeds {} bytes", state.max_upload_bytes),
            }),
        ));
    }

    let records = tracker_dataset::load_bytes(&body).map_err(|e| {
        warn!(error = %e, "Dataset upload failed");
        metrics::counter!("dataset.load_failures").increment(1);
        error_response(&e)
    })?;

    let dataset = Dataset::new(DatasetSource::Upload, derive::derive_table(&records));
    let summary = dataset_summary_of(&dataset);
    info!(dataset_id = %dataset.id, rows = dataset.len(), "Dataset uploaded");
    metrics::counter!("dataset.loads").increment(1);

    *state.current.write() = dataset;
    Ok(Json(summary))
}

/// GET /v1/dataset — summary of the currently served dataset.
#[utoipa::path(
    get,
    path = "/v1/dataset",
    tag = "Dataset",
    responses(
        (status = 200, description = "Current dataset summary", body = DatasetSummary),
    )
)]
pub async fn dataset_summary(State(state): State<AppState>) -> Json<DatasetSummary> {
    Json(dataset_summary_of(&state.current.read()))
}

/// POST /v1/dashboard — dashboard view for a filter selection.
#[utoipa::path(
    post,
    path = "/v1/dashboard",
    tag = "Dashboard",
    request_body = DashboardRequest,
    responses(
        (status = 200, description = "Dashboard view", body = DashboardResponse),
    )
)]
pub async fn dashboard_view(
    State(state): State<AppState>,
    Json(request): Json<DashboardRequest>,
) -> Json<DashboardResponse> {
    metrics::counter!("dashboard.requests").increment(1);
    let records = state.current.read().records.clone();
    Json(build_dashboard(&records, &request))
}

/// GET /v1/dashboard — full-universe dashboard view.
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Unfiltered dashboard view", body = DashboardResponse),
    )
)]
pub async fn dashboard_default(State(state): State<AppState>) -> Json<DashboardResponse> {
    metrics::counter!("dashboard.requests").increment(1);
    let records = state.current.read().records.clone();
    Json(build_dashboard(&records, &DashboardRequest::default()))
}

/// POST /v1/dataset/export — filtered derived table as downloadable CSV.
#[utoipa::path(
    post,
    path = "/v1/dataset/export",
    tag = "Dataset",
    request_body = DashboardRequest,
    responses(
        (status = 200, description = "Filtered table as CSV", body = String, content_type = "text/csv"),
        (status = 500, description = "CSV rendering failed", body = ErrorResponse),
    )
)]
pub async fn export_dataset(
    State(state): State<AppState>,
    Json(request): Json<DashboardRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    metrics::counter!("dataset.exports").increment(1);
    let records = state.current.read().records.clone();
    let selection = resolve_selection(&records, &request);
    let filtered = filter::apply(&records, &selection);

    let csv = tracker_dataset::to_csv(&filtered).map_err(|e| error_response(&e))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"campaign_data.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}

/// GET /health — Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Readiness probe for Kubernetes.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses(
        (status = 200, description = "Ready to accept traffic"),
        (status = 503, description = "Not ready"),
    )
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe for Kubernetes.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
