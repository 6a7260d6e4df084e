//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campaign Tracker API",
        version = "0.1.0",
        description = "Social media campaign performance dashboard.\n\nIngests tabular campaign data, derives standard marketing metrics (CTR, CPC, CPA, ROAS, ROI, engagement rate), and serves filtered KPI, chart, and table views.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Dataset", description = "Dataset upload, summary, and CSV export"),
        (name = "Dashboard", description = "Filtered KPI, chart, and table views"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Dataset
        crate::rest::upload_dataset,
        crate::rest::dataset_summary,
        crate::rest::export_dataset,
        // Dashboard
        crate::rest::dashboard_view,
        crate::rest::dashboard_default,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // Core types
        tracker_core::types::CampaignRecord,
        tracker_core::types::DerivedRecord,
        tracker_core::types::DatasetSource,
        tracker_core::types::GroupBy,
        // Reporting types
        tracker_reporting::aggregate::GroupTotals,
        tracker_reporting::aggregate::TrendPoint,
        tracker_reporting::aggregate::KpiSummary,
        tracker_reporting::aggregate::KpiCard,
        // REST wire types
        crate::rest::DashboardRequest,
        crate::rest::DashboardResponse,
        crate::rest::TrendChart,
        crate::rest::RevenueChart,
        crate::rest::DatasetSummary,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
