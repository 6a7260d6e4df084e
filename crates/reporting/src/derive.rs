//! Per-row derivation of the six standard marketing metrics.

use tracker_core::{CampaignRecord, DerivedRecord};

/// Compute the six derived metrics for one record. Each metric depends
/// only on this record's base fields. A zero denominator yields 0.0 for
/// the affected metric; the remaining metrics compute normally.
pub fn derive_record(record: &CampaignRecord) -> DerivedRecord {
    let impressions = record.impressions as f64;
    let clicks = record.clicks as f64;
    let conversions = record.conversions as f64;

    DerivedRecord {
        date: record.date,
        platform: record.platform.clone(),
        campaign: record.campaign.clone(),
        impressions: record.impressions,
        clicks: record.clicks,
        spend: record.spend,
        conversions: record.conversions,
        revenue: record.revenue,
        engagements: record.engagements,
        ctr: if impressions > 0.0 {
            clicks / impressions * 100.0
        } else {
            0.0
        },
        cpc: if clicks > 0.0 { record.spend / clicks } else { 0.0 },
        cpa: if conversions > 0.0 {
            record.spend / conversions
        } else {
            0.0
        },
        roas: if record.spend > 0.0 {
            record.revenue / record.spend
        } else {
            0.0
        },
        roi: if record.spend > 0.0 {
            (record.revenue - record.spend) / record.spend * 100.0
        } else {
            0.0
        },
        engagement_rate: if impressions > 0.0 {
            record.engagements as f64 / impressions * 100.0
        } else {
            0.0
        },
    }
}

/// Derive metrics for a whole table, preserving row order.
pub fn derive_table(records: &[CampaignRecord]) -> Vec<DerivedRecord> {
    records.iter().map(derive_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> CampaignRecord {
        CampaignRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            platform: "Facebook".to_string(),
            campaign: "Winter Sale".to_string(),
            impressions: 12000,
            clicks: 500,
            spend: 100.0,
            conversions: 20,
            revenue: 400.0,
            engagements: 800,
        }
    }

    #[test]
    fn test_formulas() {
        let derived = derive_record(&record());
        assert!((derived.ctr - 500.0 / 12000.0 * 100.0).abs() < 1e-9);
        assert!((derived.cpc - 0.2).abs() < 1e-9);
        assert!((derived.cpa - 5.0).abs() < 1e-9);
        assert!((derived.roas - 4.0).abs() < 1e-9);
        assert!((derived.roi - 300.0).abs() < 1e-9);
        assert!((derived.engagement_rate - 800.0 / 12000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let base = record();
        let first = derive_record(&base);
        let second = derive_record(&base);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_denominators_yield_sentinel() {
        let mut base = record();
        base.impressions = 0;
        base.clicks = 0;
        base.spend = 0.0;
        base.conversions = 0;

        let derived = derive_record(&base);
        assert_eq!(derived.ctr, 0.0);
        assert_eq!(derived.engagement_rate, 0.0);
        assert_eq!(derived.cpc, 0.0);
        assert_eq!(derived.cpa, 0.0);
        assert_eq!(derived.roas, 0.0);
        assert_eq!(derived.roi, 0.0);
        for value in [
            derived.ctr,
            derived.cpc,
            derived.cpa,
            derived.roas,
            derived.roi,
            derived.engagement_rate,
        ] {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_one_degenerate_row_does_not_affect_others() {
        let mut zero_row = record();
        zero_row.impressions = 0;
        let table = derive_table(&[zero_row, record()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].ctr, 0.0);
        assert!(table[1].ctr > 0.0);
    }

    #[test]
    fn test_table_preserves_order() {
        let mut second = record();
        second.campaign = "Summer Sale".to_string();
        let table = derive_table(&[record(), second]);
        assert_eq!(table[0].campaign, "Winter Sale");
        assert_eq!(table[1].campaign, "Summer Sale");
    }
}
