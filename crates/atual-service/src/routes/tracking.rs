use axum::{
    extract::{ConnectInfo, Path, State},
    http::{Extensions, HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde_json::Value;
use std::net::SocketAddr;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::AppState;
use crate::client_ip::{extract_client_ip, header_text};
use crate::config_store::{ADSENSE_PUBLISHER_ID, ADSENSE_SLOT_ID, configured_text};
use crate::errors::ApiError;
use crate::interstitial::{AdPlacement, is_web_destination, render_interstitial};
use crate::models::{ClickMetadata, ClickTracking};
use crate::repositories::{ConfigRepository, ContentRepository, TrackingRepository};
use crate::validation::is_valid_tracking_id;

const FALLBACK_TITLE: &str = "Conteúdo";

pub fn new_tracking_id() -> String {
    Uuid::new_v4().to_string()
}

/// Relative URL handed out in messages for a tracking token.
pub fn tracking_path(tracking_id: &str) -> String {
    format!("/track/{tracking_id}")
}

#[instrument(skip_all, fields(tracking_id = %tracking_id))]
pub async fn track_click<S: AppState>(
    State(state): State<S>,
    Path(tracking_id): Path<String>,
    headers: HeaderMap,
    extensions: Extensions,
) -> Response {
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    match follow_link(&state, &tracking_id, &headers, peer).await {
        Ok(Some(response)) => response,
        Ok(None) => {
            debug!("Tracking link not found");
            (StatusCode::NOT_FOUND, "Link not found").into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to process tracking link");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

async fn follow_link<S: AppState>(
    state: &S,
    tracking_id: &str,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
) -> Result<Option<Response>, ApiError> {
    if !is_valid_tracking_id(tracking_id) {
        return Ok(None);
    }

    let click = ClickMetadata {
        ip_address: extract_client_ip(headers, peer),
        user_agent: header_text(headers, header::USER_AGENT),
        referrer: header_text(headers, header::REFERER),
        clicked_at: Utc::now().naive_utc(),
    };

    let Some(link) = state
        .tracking_repo()
        .record_click(tracking_id, &click)
        .await?
    else {
        return Ok(None);
    };

    info!(
        click_count = link.click_count,
        ip_address = ?click.ip_address,
        "Recorded click"
    );

    if !is_web_destination(&link.original_url) {
        warn!(url = %link.original_url, "Skipping interstitial for non-web destination");
    } else if let Some(placement) = ad_placement(state).await? {
        let title = link_title(state, &link).await?;
        debug!(%title, "Serving ad interstitial");
        let page = render_interstitial(&link.original_url, &title, &placement);
        return Ok(Some(Html(page).into_response()));
    }

    Ok(Some(Redirect::temporary(&link.original_url).into_response()))
}

async fn ad_placement<S: AppState>(state: &S) -> Result<Option<AdPlacement>, ApiError> {
    let config = state.config_repo();
    let publisher_id = config.get_value(ADSENSE_PUBLISHER_ID, Value::Null).await?;
    let slot_id = config.get_value(ADSENSE_SLOT_ID, Value::Null).await?;

    Ok(
        match (configured_text(&publisher_id), configured_text(&slot_id)) {
            (Some(publisher_id), Some(slot_id)) => Some(AdPlacement {
                publisher_id,
                slot_id,
            }),
            _ => None,
        },
    )
}

async fn link_title<S: AppState>(state: &S, link: &ClickTracking) -> Result<String, ApiError> {
    let content = state.content_repo();

    if let Some(job_id) = link.job_post_id {
        if let Some(job) = content.find_job(job_id).await? {
            return Ok(format!("Vaga: {}", job.title));
        }
    }
    if let Some(news_id) = link.news_post_id {
        if let Some(news) = content.find_news(news_id).await? {
            return Ok(format!("Notícia: {}", news.title));
        }
    }

    Ok(FALLBACK_TITLE.to_string())
}
