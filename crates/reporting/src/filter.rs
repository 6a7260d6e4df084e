//! Row filtering by platform, campaign, and date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracker_core::DerivedRecord;

/// Inclusive calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// The user's current filter selection. An empty platform or campaign
/// set matches nothing; callers that want "everything" pass the full
/// universe (see [`FilterSelection::full_universe`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub platforms: HashSet<String>,
    pub campaigns: HashSet<String>,
    pub dates: DateRange,
}

impl FilterSelection {
    /// The selection that matches every row of the given table: all
    /// distinct platforms, all distinct campaigns, the observed date
    /// bounds.
    pub fn full_universe(records: &[DerivedRecord]) -> Self {
        let (start, end) = date_bounds(records)
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self {
            platforms: records.iter().map(|r| r.platform.clone()).collect(),
            campaigns: records.iter().map(|r| r.campaign.clone()).collect(),
            dates: DateRange { start, end },
        }
    }
}

/// Apply the three predicates conjunctively. Stable: surviving rows keep
/// their input order.
pub fn apply(records: &[DerivedRecord], selection: &FilterSelection) -> Vec<DerivedRecord> {
    records
        .iter()
        .filter(|r| {
            selection.platforms.contains(&r.platform)
                && selection.campaigns.contains(&r.campaign)
                && selection.dates.contains(r.date)
        })
        .cloned()
        .collect()
}

/// Distinct platforms in first-appearance order.
pub fn distinct_platforms(records: &[DerivedRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.platform.as_str()))
}

/// Distinct campaigns in first-appearance order.
pub fn distinct_campaigns(records: &[DerivedRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.campaign.as_str()))
}

/// Earliest and latest dates in the table, if it has any rows.
pub fn date_bounds(records: &[DerivedRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|r| r.date).min()?;
    let max = records.iter().map(|r| r.date).max()?;
    Some((min, max))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_table;
    use tracker_dataset::load_sample;

    fn derived_sample() -> Vec<DerivedRecord> {
        derive_table(&load_sample())
    }

    #[test]
    fn test_full_universe_returns_everything_in_order() {
        let table = derived_sample();
        let selection = FilterSelection::full_universe(&table);
        let filtered = apply(&table, &selection);
        assert_eq!(filtered.len(), table.len());
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_empty_platform_set_matches_nothing() {
        let table = derived_sample();
        let mut selection = FilterSelection::full_universe(&table);
        selection.platforms.clear();
        assert!(apply(&table, &selection).is_empty());
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let table = derived_sample();
        let mut selection = FilterSelection::full_universe(&table);
        selection.platforms = ["Facebook".to_string()].into_iter().collect();
        selection.campaigns = ["Winter Sale".to_string()].into_iter().collect();

        let filtered = apply(&table, &selection);
        // Winter Sale runs days 1-5; Facebook lands on days 1, 3, 5.
        assert_eq!(filtered.len(), 3);
        assert!(filtered
            .iter()
            .all(|r| r.platform == "Facebook" && r.campaign == "Winter Sale"));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let table = derived_sample();
        let mut selection = FilterSelection::full_universe(&table);
        selection.dates = DateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        };
        let filtered = apply(&table, &selection);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].date, selection.dates.start);
        assert_eq!(filtered[2].date, selection.dates.end);
    }

    #[test]
    fn test_facebook_subset_of_sample() {
        let table = derived_sample();
        let mut selection = FilterSelection::full_universe(&table);
        selection.platforms = ["Facebook".to_string()].into_iter().collect();

        let filtered = apply(&table, &selection);
        assert_eq!(filtered.len(), 8);
        let spend: f64 = filtered.iter().map(|r| r.spend).sum();
        assert_eq!(spend, 1185.0);
    }

    #[test]
    fn test_distinct_values_first_appearance_order() {
        let table = derived_sample();
        assert_eq!(distinct_platforms(&table), vec!["Facebook", "Instagram"]);
        assert_eq!(
            distinct_campaigns(&table),
            vec!["Winter Sale", "Summer Sale", "Brand Awareness"]
        );
    }
}
