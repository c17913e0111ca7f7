use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::errors::ApiError;
use crate::routes::extract::{Json, Path};
use crate::routes::envelope::ApiResponse;
use crate::{AppState, repositories::ConfigRepository};

#[derive(Debug, Deserialize)]
struct SetConfigRequest {
    #[serde(default)]
    value: Value,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConfigValue {
    key: String,
    value: Value,
}

#[instrument(skip_all)]
async fn get_all_config<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<ApiResponse<Map<String, Value>>>, ApiError> {
    let entries = state.config_repo().all().await?;

    let config: Map<String, Value> = entries
        .into_iter()
        .map(|entry| {
            let value = entry.decoded_value();
            (entry.key, value)
        })
        .collect();

    debug!(keys = config.len(), "Loaded configuration");
    Ok(ApiResponse::ok(config))
}

#[instrument(skip_all, fields(key = %key))]
async fn get_config<S: AppState>(
    State(state): State<S>,
    Path(key): Path<String>,
) -> Result<ResponseJson<ApiResponse<ConfigValue>>, ApiError> {
    let value = state.config_repo().get_value(&key, Value::Null).await?;
    Ok(ApiResponse::ok(ConfigValue { key, value }))
}

#[instrument(skip_all, fields(key = %key, has_description = payload.description.is_some()))]
async fn set_config<S: AppState>(
    State(state): State<S>,
    Path(key): Path<String>,
    Json(payload): Json<SetConfigRequest>,
) -> Result<ResponseJson<ApiResponse<ConfigValue>>, ApiError> {
    let entry = state
        .config_repo()
        .set_value(&key, &payload.value, payload.description)
        .await?;

    info!("Configuration key updated");
    Ok(ApiResponse::with_message(
        ConfigValue {
            value: entry.decoded_value(),
            key: entry.key,
        },
        "Configuration updated",
    ))
}

#[instrument(skip_all, fields(keys = payload.len()))]
async fn set_many_config<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<ResponseJson<ApiResponse<Map<String, Value>>>, ApiError> {
    let updated: Map<String, Value> = state
        .config_repo()
        .set_values(&payload)
        .await?
        .into_iter()
        .map(|entry| {
            let value = entry.decoded_value();
            (entry.key, value)
        })
        .collect();

    info!(updated = updated.len(), "Configuration keys updated");
    Ok(ApiResponse::with_message(updated, "Configuration updated"))
}

pub fn create_config_router<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/config",
            get(get_all_config::<S>).post(set_many_config::<S>),
        )
        .route("/config/{key}", get(get_config::<S>).post(set_config::<S>))
}
