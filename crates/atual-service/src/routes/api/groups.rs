use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::errors::ApiError;
use crate::routes::extract::{Json, Path};
use crate::models::{Group, GroupChanges, NewGroup};
use crate::routes::envelope::ApiResponse;
use crate::validation::require_text;
use crate::{AppState, repositories::GroupRepository};

#[derive(Debug, Deserialize)]
struct CreateGroupRequest {
    name: Option<String>,
    platform: Option<String>,
    group_id: Option<String>,
    link: Option<String>,
    member_count: Option<i32>,
    activity_score: Option<f64>,
    is_active: Option<bool>,
    auto_discovered: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct UpdateGroupRequest {
    name: Option<String>,
    is_active: Option<bool>,
    member_count: Option<i32>,
    activity_score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DeletedGroup {
    id: i32,
}

#[instrument(skip_all)]
async fn list_groups<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<ApiResponse<Vec<Group>>>, ApiError> {
    let groups = state.group_repo().list().await?;
    debug!(count = groups.len(), "Loaded groups");
    Ok(ApiResponse::ok(groups))
}

#[instrument(skip_all, fields(platform = ?payload.platform, group_id = ?payload.group_id))]
async fn create_group<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<ResponseJson<ApiResponse<Group>>, ApiError> {
    let new_group = NewGroup {
        name: require_text("name", payload.name)?,
        platform: require_text("platform", payload.platform)?,
        group_id: require_text("group_id", payload.group_id)?,
        link: payload.link,
        member_count: payload.member_count.unwrap_or(0),
        activity_score: payload.activity_score.unwrap_or(0.0),
        is_active: payload.is_active.unwrap_or(true),
        auto_discovered: payload.auto_discovered.unwrap_or(false),
    };

    let group_repo = state.group_repo();

    if let Some(existing) = group_repo
        .find_by_platform_id(&new_group.platform, &new_group.group_id)
        .await?
    {
        warn!(existing_id = existing.id, "Group already registered");
        return Err(ApiError::BadRequest(
            "Group already registered for this platform".to_string(),
        ));
    }

    let group = group_repo.create(&new_group).await?;

    info!(id = group.id, "Group created");
    Ok(ApiResponse::with_message(group, "Group created"))
}

#[instrument(skip_all, fields(id = %id))]
async fn update_group<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateGroupRequest>,
) -> Result<ResponseJson<ApiResponse<Group>>, ApiError> {
    let changes = GroupChanges {
        name: payload.name.filter(|name| !name.is_empty()),
        is_active: payload.is_active,
        member_count: payload.member_count,
        activity_score: payload.activity_score,
    };

    let group = state
        .group_repo()
        .update(id, &changes)
        .await?
        .ok_or(ApiError::NotFound("Group"))?;

    info!("Group updated");
    Ok(ApiResponse::with_message(group, "Group updated"))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_group<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<ApiResponse<DeletedGroup>>, ApiError> {
    if !state.group_repo().delete(id).await? {
        debug!("Group not found");
        return Err(ApiError::NotFound("Group"));
    }

    info!("Group deleted");
    Ok(ApiResponse::with_message(DeletedGroup { id }, "Group deleted"))
}

pub fn create_groups_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/groups", get(list_groups::<S>).post(create_group::<S>))
        .route(
            "/groups/{id}",
            put(update_group::<S>).delete(delete_group::<S>),
        )
}
