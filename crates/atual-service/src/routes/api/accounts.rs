use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::ApiError;
use crate::routes::extract::Json;
use crate::models::{AiProvider, AiProviderUpsert, SocialAccount, SocialAccountUpsert};
use crate::routes::envelope::ApiResponse;
use crate::validation::require_text;
use crate::{AppState, repositories::AccountRepository};

#[derive(Debug, Deserialize)]
struct SaveAiProviderRequest {
    name: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SaveSocialAccountRequest {
    platform: Option<String>,
    account_name: Option<String>,
    api_key: Option<String>,
}

/// Provider as exposed over HTTP; the key itself never leaves the server.
#[derive(Debug, Serialize)]
struct AiProviderSummary {
    id: i32,
    name: String,
    model: Option<String>,
    is_active: bool,
    status: String,
    has_api_key: bool,
    last_check: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl From<AiProvider> for AiProviderSummary {
    fn from(provider: AiProvider) -> Self {
        Self {
            id: provider.id,
            has_api_key: provider.api_key.is_some_and(|key| !key.is_empty()),
            name: provider.name,
            model: provider.model,
            is_active: provider.is_active,
            status: provider.status,
            last_check: provider.last_check,
            created_at: provider.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct SocialAccountSummary {
    id: i32,
    platform: String,
    account_name: Option<String>,
    is_active: bool,
    status: String,
    has_credentials: bool,
    last_check: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl From<SocialAccount> for SocialAccountSummary {
    fn from(account: SocialAccount) -> Self {
        let has_credentials = [&account.api_key, &account.session_data]
            .iter()
            .any(|value| value.as_deref().is_some_and(|text| !text.is_empty()));

        Self {
            id: account.id,
            platform: account.platform,
            account_name: account.account_name,
            is_active: account.is_active,
            status: account.status,
            has_credentials,
            last_check: account.last_check,
            created_at: account.created_at,
        }
    }
}

#[instrument(skip_all)]
async fn list_ai_providers<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<ApiResponse<Vec<AiProviderSummary>>>, ApiError> {
    let providers = state.account_repo().list_ai_providers().await?;
    Ok(ApiResponse::ok(
        providers.into_iter().map(AiProviderSummary::from).collect(),
    ))
}

#[instrument(skip_all, fields(name = ?payload.name, has_api_key = payload.api_key.is_some(), is_active = ?payload.is_active))]
async fn save_ai_provider<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<SaveAiProviderRequest>,
) -> Result<ResponseJson<ApiResponse<AiProviderSummary>>, ApiError> {
    let upsert = AiProviderUpsert {
        name: require_text("name", payload.name)?,
        api_key: payload.api_key,
        model: payload.model,
        activate: payload.is_active.unwrap_or(false),
    };

    let provider = state.account_repo().upsert_ai_provider(&upsert).await?;

    info!(id = provider.id, active = provider.is_active, "AI provider saved");
    Ok(ApiResponse::with_message(
        provider.into(),
        "AI provider saved",
    ))
}

#[instrument(skip_all)]
async fn list_social_accounts<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<ApiResponse<Vec<SocialAccountSummary>>>, ApiError> {
    let accounts = state.account_repo().list_social_accounts().await?;
    Ok(ApiResponse::ok(
        accounts
            .into_iter()
            .map(SocialAccountSummary::from)
            .collect(),
    ))
}

#[instrument(skip_all, fields(platform = ?payload.platform, has_api_key = payload.api_key.is_some()))]
async fn save_social_account<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<SaveSocialAccountRequest>,
) -> Result<ResponseJson<ApiResponse<SocialAccountSummary>>, ApiError> {
    let upsert = SocialAccountUpsert {
        platform: require_text("platform", payload.platform)?,
        account_name: payload.account_name,
        api_key: payload.api_key,
    };

    let account = state.account_repo().upsert_social_account(&upsert).await?;

    info!(id = account.id, "Social account saved");
    Ok(ApiResponse::with_message(
        account.into(),
        "Social account saved",
    ))
}

pub fn create_accounts_router<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/ai-providers",
            get(list_ai_providers::<S>).post(save_ai_provider::<S>),
        )
        .route(
            "/social-accounts",
            get(list_social_accounts::<S>).post(save_social_account::<S>),
        )
}
