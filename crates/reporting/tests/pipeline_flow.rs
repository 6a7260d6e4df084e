//! Integration test for the full load → derive → filter → aggregate
//! pipeline over the built-in sample dataset.

use chrono::NaiveDate;
use tracker_core::GroupBy;
use tracker_reporting::{
    apply, daily_trend, derive_table, group_totals, kpi_cards, kpi_summary, DateRange,
    FilterSelection,
};

#[test]
fn test_full_universe_filter_is_identity() {
    let table = derive_table(&tracker_dataset::load_sample());
    let selection = FilterSelection::full_universe(&table);
    let filtered = apply(&table, &selection);

    assert_eq!(filtered.len(), 15);
    assert_eq!(filtered, table);
}

#[test]
fn test_facebook_dashboard_view() {
    let table = derive_table(&tracker_dataset::load_sample());
    let mut selection = FilterSelection::full_universe(&table);
    selection.platforms = ["Facebook".to_string()].into_iter().collect();

    let filtered = apply(&table, &selection);
    assert_eq!(filtered.len(), 8);

    let summary = kpi_summary(&filtered);
    assert!((summary.total_spend - 1185.0).abs() < 1e-9);

    let by_platform = group_totals(&filtered, GroupBy::Platform);
    assert_eq!(by_platform.len(), 1);
    assert_eq!(by_platform[0].group, "Facebook");
    assert!((by_platform[0].spend - 1185.0).abs() < 1e-9);

    let by_campaign = group_totals(&filtered, GroupBy::Campaign);
    let campaign_revenue: f64 = by_campaign.iter().map(|g| g.revenue).sum();
    let filtered_revenue: f64 = filtered.iter().map(|r| r.revenue).sum();
    assert!((campaign_revenue - filtered_revenue).abs() < 1e-9);

    let trend = daily_trend(&filtered);
    assert_eq!(trend.len(), 8);
    assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn test_unfiltered_kpis_match_sample_literals() {
    let table = derive_table(&tracker_dataset::load_sample());
    let summary = kpi_summary(&table);

    assert_eq!(summary.total_impressions, 283_000);
    assert_eq!(summary.total_clicks, 12_650);
    assert_eq!(summary.total_conversions, 479);
    assert!((summary.total_spend - 2360.0).abs() < 1e-9);

    let cards = kpi_cards(&summary);
    assert_eq!(cards[0].value, "283,000");
    assert_eq!(cards[1].value, "12,650");
    assert_eq!(cards[3].value, "479");
}

#[test]
fn test_empty_selection_produces_empty_views_without_faults() {
    let table = derive_table(&tracker_dataset::load_sample());
    let selection = FilterSelection {
        platforms: Default::default(),
        campaigns: Default::default(),
        dates: DateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        },
    };

    let filtered = apply(&table, &selection);
    assert!(filtered.is_empty());

    let summary = kpi_summary(&filtered);
    assert_eq!(summary.total_impressions, 0);
    assert_eq!(summary.avg_ctr, 0.0);
    assert!(group_totals(&filtered, GroupBy::Platform).is_empty());
    assert!(daily_trend(&filtered).is_empty());
    assert_eq!(kpi_cards(&summary).len(), 8);
}

#[test]
fn test_uploaded_csv_flows_through_pipeline() {
    let csv = "\
Date,Platform,Campaign,Impressions,Clicks,Spend,Conversions,Revenue,Engagements
2025-02-01,TikTok,Spring Launch,5000,0,50,0,0,120
2025-02-02,TikTok,Spring Launch,8000,320,80,12,260,400";

    let table = derive_table(&tracker_dataset::load_str(csv).unwrap());
    assert_eq!(table.len(), 2);

    // Zero clicks and conversions on the first row take the sentinel.
    assert_eq!(table[0].cpc, 0.0);
    assert_eq!(table[0].cpa, 0.0);
    assert!(table[1].cpc > 0.0);

    let selection = FilterSelection::full_universe(&table);
    let filtered = apply(&table, &selection);
    let summary = kpi_summary(&filtered);
    assert_eq!(summary.total_impressions, 13_000);
    assert!((summary.total_spend - 130.0).abs() < 1e-9);
}
