use crate::AppState;
use axum::Router;

pub mod accounts;
pub mod analytics;
pub mod config;
pub mod content;
pub mod groups;
pub mod publications;

pub fn create_api_router<S: AppState>() -> Router<S> {
    Router::new()
        .merge(config::create_config_router())
        .merge(accounts::create_accounts_router())
        .merge(groups::create_groups_router())
        .merge(content::create_content_router())
        .merge(publications::create_publications_router())
        .merge(analytics::create_analytics_router())
}
