use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::ClickTracking;

pub const SUMMARY_WINDOW_DAYS: i64 = 30;
pub const SUMMARY_DAILY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClickReport {
    pub total_clicks: u64,
    pub period_days: i64,
    pub clicks_by_day: BTreeMap<String, u64>,
    pub clicks_by_group: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClickSummary {
    pub total_clicks_30d: u64,
    pub job_clicks_30d: u64,
    pub news_clicks_30d: u64,
    pub clicks_by_day_7d: BTreeMap<String, u64>,
}

/// Start of a look-back window, clamped to the earliest representable time.
pub fn window_start(now: NaiveDateTime, days: i64) -> NaiveDateTime {
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Counts clicks per ISO date of their last click.
pub fn clicks_by_day<'a>(clicks: impl IntoIterator<Item = &'a ClickTracking>) -> BTreeMap<String, u64> {
    let mut by_day = BTreeMap::new();
    for click in clicks {
        if let Some(clicked_at) = click.clicked_at {
            *by_day
                .entry(clicked_at.date().format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
        }
    }
    by_day
}

pub fn click_report(
    clicks: &[ClickTracking],
    period_days: i64,
    group_names: &HashMap<i32, String>,
) -> ClickReport {
    let mut clicks_by_group = BTreeMap::new();
    for group_id in clicks.iter().filter_map(|click| click.group_id) {
        let name = group_names
            .get(&group_id)
            .cloned()
            .unwrap_or_else(|| format!("Group {group_id}"));
        *clicks_by_group.entry(name).or_insert(0) += 1;
    }

    ClickReport {
        total_clicks: clicks.len() as u64,
        period_days,
        clicks_by_day: clicks_by_day(clicks),
        clicks_by_group,
    }
}

/// Summary over clicks from the last 30 days.
pub fn click_summary(recent_clicks: &[ClickTracking], now: NaiveDateTime) -> ClickSummary {
    let daily_start = window_start(now, SUMMARY_DAILY_WINDOW_DAYS);

    ClickSummary {
        total_clicks_30d: recent_clicks.len() as u64,
        job_clicks_30d: recent_clicks
            .iter()
            .filter(|click| click.job_post_id.is_some())
            .count() as u64,
        news_clicks_30d: recent_clicks
            .iter()
            .filter(|click| click.news_post_id.is_some())
            .count() as u64,
        clicks_by_day_7d: clicks_by_day(
            recent_clicks
                .iter()
                .filter(|click| click.clicked_at.is_some_and(|at| at >= daily_start)),
        ),
    }
}
