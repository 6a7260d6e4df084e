//! Campaign reporting pipeline: metric derivation, filtering, and the
//! aggregations behind the dashboard charts and KPI cards.

pub mod aggregate;
pub mod derive;
pub mod filter;

pub use aggregate::{
    daily_trend, group_totals, kpi_cards, kpi_summary, GroupTotals, KpiCard, KpiSummary,
    TrendPoint,
};
pub use derive::{derive_record, derive_table};
pub use filter::{
    apply, date_bounds, distinct_campaigns, distinct_platforms, DateRange, FilterSelection,
};
