use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, patch, post},
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

use crate::errors::ApiError;
use crate::routes::extract::{Json, Path, Query};
use crate::messages::{format_job_message, format_news_message};
use crate::models::{
    ContentRef, Publication, PublicationDraft, PublicationListing, PublicationOutcome,
};
use crate::routes::envelope::{ApiResponse, Pagination};
use crate::validation::{
    ContentKind, PublicationStatus, ValidationError, require_text, validate_page,
};
use crate::{
    AppState,
    repositories::{ContentRepository, GroupRepository, PublicationRepository},
};

#[derive(Debug, Deserialize)]
struct PublishRequest {
    content_type: Option<String>,
    content_id: Option<i32>,
    group_ids: Option<Vec<i32>>,
}

#[derive(Debug, Serialize)]
struct PublishResponse {
    publications_created: usize,
}

#[derive(Debug, Deserialize)]
struct ListPublicationsQuery {
    page: Option<u32>,
    per_page: Option<u32>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatePublicationRequest {
    status: Option<String>,
    error_message: Option<String>,
    platform_message_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct PublicationEntry {
    id: i32,
    group_id: i32,
    group_name: Option<String>,
    platform: Option<String>,
    content_type: &'static str,
    content_id: Option<i32>,
    content_title: Option<String>,
    message_content: String,
    status: String,
    error_message: Option<String>,
    platform_message_id: Option<String>,
    sent_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl From<PublicationListing> for PublicationEntry {
    fn from(listing: PublicationListing) -> Self {
        let PublicationListing {
            publication,
            group,
            content_title,
        } = listing;
        let (group_name, platform) = match group {
            Some(group) => (Some(group.name), Some(group.platform)),
            None => (None, None),
        };

        Self {
            id: publication.id,
            group_id: publication.group_id,
            group_name,
            platform,
            content_type: publication.content_kind().as_str(),
            content_id: publication.job_post_id.or(publication.news_post_id),
            content_title,
            message_content: publication.message_content,
            status: publication.status,
            error_message: publication.error_message,
            platform_message_id: publication.platform_message_id,
            sent_at: publication.sent_at,
            created_at: publication.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct PublicationList {
    publications: Vec<PublicationEntry>,
    pagination: Pagination,
}

#[instrument(skip_all, fields(content_type = ?payload.content_type, content_id = ?payload.content_id))]
async fn publish<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<PublishRequest>,
) -> Result<ResponseJson<ApiResponse<PublishResponse>>, ApiError> {
    let kind: ContentKind = require_text("content_type", payload.content_type)?.parse()?;
    let content_id = payload
        .content_id
        .ok_or(ValidationError::MissingField("content_id"))?;
    let group_ids = payload
        .group_ids
        .ok_or(ValidationError::MissingField("group_ids"))?;
    if group_ids.is_empty() {
        return Err(ValidationError::NoTargetGroups.into());
    }

    let content_repo = state.content_repo();
    let message = match kind {
        ContentKind::Job => content_repo
            .find_job(content_id)
            .await?
            .map(|job| format_job_message(&job))
            .ok_or(ApiError::NotFound("Job post"))?,
        ContentKind::News => content_repo
            .find_news(content_id)
            .await?
            .map(|news| format_news_message(&news))
            .ok_or(ApiError::NotFound("News post"))?,
    };

    let active_groups: HashMap<i32, bool> = state
        .group_repo()
        .find_many(&group_ids)
        .await?
        .into_iter()
        .map(|group| (group.id, group.is_active))
        .collect();

    // A group listed twice still gets a single publication
    let mut seen = HashSet::new();
    let drafts: Vec<PublicationDraft> = group_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .filter(|id| match active_groups.get(id) {
            Some(true) => true,
            Some(false) => {
                debug!(group_id = id, "Skipping inactive group");
                false
            }
            None => {
                warn!(group_id = id, "Skipping unknown group");
                false
            }
        })
        .map(|group_id| PublicationDraft {
            group_id,
            message: message.clone(),
        })
        .collect();

    let publications_created = state
        .publication_repo()
        .enqueue(
            ContentRef::new(kind, content_id),
            &drafts,
            Utc::now().naive_utc(),
        )
        .await?;

    info!(
        publications_created,
        requested_groups = group_ids.len(),
        "Content queued for publication"
    );

    Ok(ApiResponse::with_message(
        PublishResponse {
            publications_created,
        },
        format!("Content queued for {publications_created} groups"),
    ))
}

#[instrument(skip_all, fields(status = ?query.status, page = ?query.page))]
async fn list_publications<S: AppState>(
    State(state): State<S>,
    Query(query): Query<ListPublicationsQuery>,
) -> Result<ResponseJson<ApiResponse<PublicationList>>, ApiError> {
    let page = validate_page(query.page, query.per_page)?;
    let status = query
        .status
        .filter(|status| !status.is_empty())
        .map(|status| status.parse::<PublicationStatus>())
        .transpose()?;

    let result = state
        .publication_repo()
        .list(status.map(|status| status.as_str()), &page)
        .await?;

    info!(
        returned_count = result.items.len(),
        total = result.total,
        "Retrieved publications"
    );

    Ok(ApiResponse::ok(PublicationList {
        pagination: Pagination::new(&page, result.total),
        publications: result
            .items
            .into_iter()
            .map(PublicationEntry::from)
            .collect(),
    }))
}

#[instrument(skip_all, fields(id = %id, status = ?payload.status))]
async fn update_publication<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePublicationRequest>,
) -> Result<ResponseJson<ApiResponse<Publication>>, ApiError> {
    let status: PublicationStatus = require_text("status", payload.status)?.parse()?;

    let outcome = PublicationOutcome {
        status: status.as_str().to_string(),
        error_message: payload.error_message,
        platform_message_id: payload.platform_message_id,
        sent_at: (status == PublicationStatus::Sent).then(|| Utc::now().naive_utc()),
    };

    let publication = state
        .publication_repo()
        .record_outcome(id, &outcome)
        .await?
        .ok_or(ApiError::NotFound("Publication"))?;

    info!(status = %publication.status, "Publication outcome recorded");
    Ok(ApiResponse::with_message(publication, "Publication updated"))
}

pub fn create_publications_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/publish", post(publish::<S>))
        .route("/publications", get(list_publications::<S>))
        .route("/publications/{id}", patch(update_publication::<S>))
}
