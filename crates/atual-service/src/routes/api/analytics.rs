use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

use crate::analytics::{
    ClickReport, ClickSummary, SUMMARY_WINDOW_DAYS, click_report, click_summary, window_start,
};
use crate::errors::ApiError;
use crate::routes::extract::Query;
use crate::routes::envelope::ApiResponse;
use crate::validation::{ContentKind, ValidationError};
use crate::{
    AppState,
    repositories::{GroupRepository, TrackingRepository},
};

const DEFAULT_REPORT_DAYS: u32 = 30;
const MAX_REPORT_DAYS: u32 = 3650;

#[derive(Debug, Deserialize)]
struct ClickReportQuery {
    days: Option<u32>,
    content_type: Option<String>,
}

#[instrument(skip_all, fields(days = ?query.days, content_type = ?query.content_type))]
async fn click_analytics<S: AppState>(
    State(state): State<S>,
    Query(query): Query<ClickReportQuery>,
) -> Result<ResponseJson<ApiResponse<ClickReport>>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_REPORT_DAYS);
    if days == 0 {
        return Err(ValidationError::NotPositive("days").into());
    }
    if days > MAX_REPORT_DAYS {
        return Err(ValidationError::TooLarge {
            field: "days",
            max: MAX_REPORT_DAYS,
        }
        .into());
    }
    let kind = query
        .content_type
        .filter(|kind| !kind.is_empty())
        .map(|kind| kind.parse::<ContentKind>())
        .transpose()?;

    let since = window_start(Utc::now().naive_utc(), i64::from(days));
    let clicks = state.tracking_repo().clicked_since(since, kind).await?;

    let group_ids: Vec<i32> = clicks
        .iter()
        .filter_map(|click| click.group_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let group_names: HashMap<i32, String> = state
        .group_repo()
        .find_many(&group_ids)
        .await?
        .into_iter()
        .map(|group| (group.id, group.name))
        .collect();

    let report = click_report(&clicks, i64::from(days), &group_names);
    debug!(total_clicks = report.total_clicks, "Built click report");

    Ok(ApiResponse::ok(report))
}

#[instrument(skip_all)]
pub async fn analytics_summary<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<ApiResponse<ClickSummary>>, ApiError> {
    let now = Utc::now().naive_utc();
    let clicks = state
        .tracking_repo()
        .clicked_since(window_start(now, SUMMARY_WINDOW_DAYS), None)
        .await?;

    let summary = click_summary(&clicks, now);
    debug!(total_clicks = summary.total_clicks_30d, "Built click summary");

    Ok(ApiResponse::ok(summary))
}

pub fn create_analytics_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/analytics/clicks", get(click_analytics::<S>))
        .route("/analytics/summary", get(analytics_summary::<S>))
}
