//! Built-in sample dataset served when no file has been uploaded.

use chrono::NaiveDate;
use tracker_core::CampaignRecord;

const IMPRESSIONS: [u64; 15] = [
    12000, 15000, 10000, 18000, 22000, 16000, 14000, 20000, 24000, 30000, 13000, 17000, 19000,
    25000, 28000,
];
const CLICKS: [u64; 15] = [
    500, 700, 400, 800, 1000, 650, 500, 900, 1100, 1400, 600, 750, 800, 1200, 1350,
];
const SPEND: [f64; 15] = [
    100.0, 120.0, 90.0, 150.0, 200.0, 130.0, 110.0, 170.0, 210.0, 260.0, 95.0, 125.0, 140.0,
    220.0, 240.0,
];
const CONVERSIONS: [u64; 15] = [20, 25, 15, 30, 40, 22, 18, 35, 50, 60, 16, 20, 28, 45, 55];
const REVENUE: [f64; 15] = [
    400.0, 500.0, 300.0, 600.0, 800.0, 450.0, 380.0, 700.0, 900.0, 1200.0, 350.0, 480.0, 560.0,
    950.0, 1100.0,
];
const ENGAGEMENTS: [u64; 15] = [
    800, 1000, 600, 1200, 1500, 900, 750, 1300, 1600, 2000, 700, 950, 1000, 1500, 1700,
];

/// Fifteen daily records starting 2025-01-01: platforms alternate
/// Facebook/Instagram (the 15th row lands back on Facebook), campaigns
/// run five days each of Winter Sale, Summer Sale, and Brand Awareness.
pub fn load_sample() -> Vec<CampaignRecord> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();

    (0..15)
        .map(|i| CampaignRecord {
            date: start + chrono::Days::new(i as u64),
            platform: if i % 2 == 0 { "Facebook" } else { "Instagram" }.to_string(),
            campaign: match i / 5 {
                0 => "Winter Sale",
                1 => "Summer Sale",
                _ => "Brand Awareness",
            }
            .to_string(),
            impressions: IMPRESSIONS[i],
            clicks: CLICKS[i],
            spend: SPEND[i],
            conversions: CONVERSIONS[i],
            revenue: REVENUE[i],
            engagements: ENGAGEMENTS[i],
        })
        .collect()
}
