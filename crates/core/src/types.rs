use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Campaign Records ────────────────────────────────────────────────────────

/// One row of raw campaign performance data as it arrives from an
/// ad-platform export. Counts are whole numbers, monetary amounts are
/// non-negative and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    pub platform: String,
    pub campaign: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
    pub revenue: f64,
    pub engagements: u64,
}

/// A campaign record enriched with the six derived performance metrics.
/// Rates whose denominator is zero are reported as 0.0 rather than
/// NaN or infinity so that downstream aggregation stays total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DerivedRecord {
    pub date: NaiveDate,
    pub platform: String,
    pub campaign: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
    pub revenue: f64,
    pub engagements: u64,
    /// Click-through rate, percent: clicks / impressions * 100.
    pub ctr: f64,
    /// Cost per click: spend / clicks.
    pub cpc: f64,
    /// Cost per acquisition: spend / conversions.
    pub cpa: f64,
    /// Return on ad spend: revenue / spend.
    pub roas: f64,
    /// Return on investment, percent: (revenue - spend) / spend * 100.
    pub roi: f64,
    /// Engagement rate, percent: engagements / impressions * 100.
    pub engagement_rate: f64,
}

/// Categorical column a chart table can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Platform,
    Campaign,
}

impl GroupBy {
    /// The group key of a record under this grouping.
    pub fn key<'a>(&self, record: &'a DerivedRecord) -> &'a str {
        match self {
            GroupBy::Platform => &record.platform,
            GroupBy::Campaign => &record.campaign,
        }
    }
}

// ─── Datasets ────────────────────────────────────────────────────────────────

/// Where a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSource {
    /// Built-in sample rows shipped with the service.
    Sample,
    /// File loaded from disk at startup.
    File,
    /// Uploaded over the HTTP API.
    Upload,
}

impl DatasetSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetSource::Sample => "sample",
            DatasetSource::File => "file",
            DatasetSource::Upload => "upload",
        }
    }
}

/// A fully derived, immutable dataset. All reporting reads from one of
/// these; replacing the active dataset swaps the whole value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Dataset {
    pub id: Uuid,
    pub source: DatasetSource,
    pub loaded_at: DateTime<Utc>,
    pub records: Vec<DerivedRecord>,
}

impl Dataset {
    pub fn new(source: DatasetSource, records: Vec<DerivedRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            loaded_at: Utc::now(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
