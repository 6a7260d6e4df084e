//! Aggregation for charts and the KPI summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracker_core::{DerivedRecord, GroupBy};
use tracing::debug;
use utoipa::ToSchema;

/// Per-group column sums. Every numeric column is summed, including the
/// derived rate columns: a summed rate is not itself a meaningful rate,
/// but chart consumers only read the columns they plot (Revenue), so the
/// extra sums are carried rather than special-cased away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroupTotals {
    pub group: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
    pub revenue: f64,
    pub engagements: u64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub roas: f64,
    pub roi: f64,
    pub engagement_rate: f64,
}

impl GroupTotals {
    fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            impressions: 0,
            clicks: 0,
            spend: 0.0,
            conversions: 0,
            revenue: 0.0,
            engagements: 0,
            ctr: 0.0,
            cpc: 0.0,
            cpa: 0.0,
            roas: 0.0,
            roi: 0.0,
            engagement_rate: 0.0,
        }
    }

    fn absorb(&mut self, record: &DerivedRecord) {
        self.impressions += record.impressions;
        self.clicks += record.clicks;
        self.spend += record.spend;
        self.conversions += record.conversions;
        self.revenue += record.revenue;
        self.engagements += record.engagements;
        self.ctr += record.ctr;
        self.cpc += record.cpc;
        self.cpa += record.cpa;
        self.roas += record.roas;
        self.roi += record.roi;
        self.engagement_rate += record.engagement_rate;
    }
}

/// One point of the time-indexed multi-series line chart: a projection
/// of a filtered row onto the four plotted measures, kept in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
}

/// The eight KPI scalars over a filtered table: sums of the count and
/// currency measures, arithmetic means of the per-row rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KpiSummary {
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_spend: f64,
    pub total_conversions: u64,
    pub avg_ctr: f64,
    pub avg_cpc: f64,
    pub avg_roas: f64,
    pub avg_roi: f64,
}

/// A KPI ready for display: label plus pre-formatted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
}

/// Group the table by a categorical column, summing every numeric
/// column per group. Groups come back in ascending order of group value.
pub fn group_totals(records: &[DerivedRecord], group_by: GroupBy) -> Vec<GroupTotals> {
    let mut groups: BTreeMap<String, GroupTotals> = BTreeMap::new();
    for record in records {
        let key = group_by.key(record);
        groups
            .entry(key.to_string())
            .or_insert_with(|| GroupTotals::new(key))
            .absorb(record);
    }
    groups.into_values().collect()
}

/// Project the filtered table onto the line-chart series, in row order.
pub fn daily_trend(records: &[DerivedRecord]) -> Vec<TrendPoint> {
    records
        .iter()
        .map(|r| TrendPoint {
            date: r.date,
            impressions: r.impressions,
            clicks: r.clicks,
            conversions: r.conversions,
            revenue: r.revenue,
        })
        .collect()
}

/// Compute the KPI summary over a filtered table. An empty table yields
/// an all-zero summary.
pub fn kpi_summary(records: &[DerivedRecord]) -> KpiSummary {
    if records.is_empty() {
        debug!("KPI summary over zero rows");
        return KpiSummary {
            total_impressions: 0,
            total_clicks: 0,
            total_spend: 0.0,
            total_conversions: 0,
            avg_ctr: 0.0,
            avg_cpc: 0.0,
            avg_roas: 0.0,
            avg_roi: 0.0,
        };
    }

    let n = records.len() as f64;
    KpiSummary {
        total_impressions: records.iter().map(|r| r.impressions).sum(),
        total_clicks: records.iter().map(|r| r.clicks).sum(),
        total_spend: records.iter().map(|r| r.spend).sum(),
        total_conversions: records.iter().map(|r| r.conversions).sum(),
        avg_ctr: records.iter().map(|r| r.ctr).sum::<f64>() / n,
        avg_cpc: records.iter().map(|r| r.cpc).sum::<f64>() / n,
        avg_roas: records.iter().map(|r| r.roas).sum::<f64>() / n,
        avg_roi: records.iter().map(|r| r.roi).sum::<f64>() / n,
    }
}

/// Render the eight KPI display cards: counts with thousands separators,
/// currency/percentage/ratio values fixed at two decimals.
pub fn kpi_cards(summary: &KpiSummary) -> Vec<KpiCard> {
    vec![
        KpiCard {
            label: "Total Impressions".to_string(),
            value: thousands(summary.total_impressions),
        },
        KpiCard {
            label: "Total Clicks".to_string(),
            value: thousands(summary.total_clicks),
        },
        KpiCard {
            label: "Total Spend ($)".to_string(),
            value: thousands_fixed2(summary.total_spend),
        },
        KpiCard {
            label: "Total Conversions".to_string(),
            value: thousands(summary.total_conversions),
        },
        KpiCard {
            label: "CTR (%)".to_string(),
            value: format!("{:.2}", summary.avg_ctr),
        },
        KpiCard {
            label: "CPC ($)".to_string(),
            value: format!("{:.2}", summary.avg_cpc),
        },
        KpiCard {
            label: "ROAS".to_string(),
            value: format!("{:.2}", summary.avg_roas),
        },
        KpiCard {
            label: "ROI (%)".to_string(),
            value: format!("{:.2}", summary.avg_roi),
        },
    ]
}

/// Format an integer with comma thousands separators.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a non-negative amount with thousands separators and two
/// decimal places.
fn thousands_fixed2(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, frac) = match fixed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (fixed.as_str(), "00"),
    };
    let grouped = whole
        .parse::<u64>()
        .map(thousands)
        .unwrap_or_else(|_| whole.to_string());
    format!("{grouped}.{frac}")
}
