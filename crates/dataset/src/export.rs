//! CSV rendering of a derived table for download.

use tracker_core::{DerivedRecord, TrackerError, TrackerResult};

/// Render the derived table as CSV. The base columns use the exact
/// required header names, so an export feeds back through the loader.
pub fn to_csv(records: &[DerivedRecord]) -> TrackerResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "Date",
        "Platform",
        "Campaign",
        "Impressions",
        "Clicks",
        "Spend",
        "Conversions",
        "Revenue",
        "Engagements",
        "CTR",
        "CPC",
        "CPA",
        "ROAS",
        "ROI",
        "Engagement Rate",
    ])?;

    for record in records {
        writer.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.platform.clone(),
            record.campaign.clone(),
            record.impressions.to_string(),
            record.clicks.to_string(),
            record.spend.to_string(),
            record.conversions.to_string(),
            record.revenue.to_string(),
            record.engagements.to_string(),
            format!("{:.4}", record.ctr),
            format!("{:.4}", record.cpc),
            format!("{:.4}", record.cpa),
            format!("{:.4}", record.roas),
            format!("{:.4}", record.roi),
            format!("{:.4}", record.engagement_rate),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TrackerError::Format(format!("CSV rendering failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|_| TrackerError::Format("CSV rendering produced invalid UTF-8".to_string()))
}
