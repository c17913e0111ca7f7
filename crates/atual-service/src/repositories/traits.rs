use crate::config_store::encode_config_value;
use crate::errors::ApiError;
use crate::models::{
    AiProvider, AiProviderUpsert, ClickMetadata, ClickTracking, ConfigEntry, ContentRef, Group,
    GroupChanges, JobPost, NewGroup, NewJobPost, NewNewsPost, NewsPost, Publication,
    PublicationDraft, PublicationListing, PublicationOutcome, SocialAccount, SocialAccountUpsert,
};
use crate::validation::{ContentKind, PageRequest};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub job_type: Option<String>,
    pub work_mode: Option<String>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    pub category: Option<String>,
    pub source: Option<String>,
}

#[async_trait]
pub trait ConfigRepository: Clone + Send + Sync + 'static {
    async fn find(&self, key: &str) -> Result<Option<ConfigEntry>, ApiError>;
    async fn all(&self) -> Result<Vec<ConfigEntry>, ApiError>;
    async fn upsert(
        &self,
        key: &str,
        value: String,
        description: Option<String>,
    ) -> Result<ConfigEntry, ApiError>;
    /// Upserts every entry in one transaction, keeping stored descriptions.
    async fn upsert_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> Result<Vec<ConfigEntry>, ApiError>;

    /// Stored value decoded from JSON when possible, else `default`.
    async fn get_value(&self, key: &str, default: Value) -> Result<Value, ApiError> {
        Ok(self
            .find(key)
            .await?
            .map(|entry| entry.decoded_value())
            .unwrap_or(default))
    }

    async fn set_value(
        &self,
        key: &str,
        value: &Value,
        description: Option<String>,
    ) -> Result<ConfigEntry, ApiError> {
        self.upsert(key, encode_config_value(value), description)
            .await
    }

    async fn set_values(
        &self,
        values: &Map<String, Value>,
    ) -> Result<Vec<ConfigEntry>, ApiError> {
        let entries = values
            .iter()
            .map(|(key, value)| (key.clone(), encode_config_value(value)))
            .collect();
        self.upsert_many(entries).await
    }
}

#[async_trait]
pub trait AccountRepository: Clone + Send + Sync + 'static {
    async fn list_ai_providers(&self) -> Result<Vec<AiProvider>, ApiError>;
    async fn upsert_ai_provider(&self, upsert: &AiProviderUpsert) -> Result<AiProvider, ApiError>;
    async fn list_social_accounts(&self) -> Result<Vec<SocialAccount>, ApiError>;
    async fn upsert_social_account(
        &self,
        upsert: &SocialAccountUpsert,
    ) -> Result<SocialAccount, ApiError>;
}

#[async_trait]
pub trait GroupRepository: Clone + Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Group>, ApiError>;
    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Group>, ApiError>;
    async fn find_by_platform_id(
        &self,
        platform: &str,
        group_id: &str,
    ) -> Result<Option<Group>, ApiError>;
    async fn create(&self, group: &NewGroup) -> Result<Group, ApiError>;
    async fn update(&self, id: i32, changes: &GroupChanges) -> Result<Option<Group>, ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

#[async_trait]
pub trait ContentRepository: Clone + Send + Sync + 'static {
    /// Inserts the job and, when a token is given, its tracking record.
    async fn create_job(
        &self,
        job: &NewJobPost,
        tracking_id: Option<&str>,
    ) -> Result<JobPost, ApiError>;
    async fn create_news(&self, news: &NewNewsPost, tracking_id: &str)
    -> Result<NewsPost, ApiError>;
    async fn find_job(&self, id: i32) -> Result<Option<JobPost>, ApiError>;
    async fn find_news(&self, id: i32) -> Result<Option<NewsPost>, ApiError>;
    async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: &PageRequest,
    ) -> Result<Paged<JobPost>, ApiError>;
    async fn list_news(
        &self,
        filter: &NewsFilter,
        page: &PageRequest,
    ) -> Result<Paged<NewsPost>, ApiError>;
}

#[async_trait]
pub trait PublicationRepository: Clone + Send + Sync + 'static {
    /// Queues one pending publication per draft and marks the content
    /// published, all in one transaction. Returns the number of rows queued.
    async fn enqueue(
        &self,
        content: ContentRef,
        drafts: &[PublicationDraft],
        published_at: NaiveDateTime,
    ) -> Result<usize, ApiError>;
    async fn list(
        &self,
        status: Option<&str>,
        page: &PageRequest,
    ) -> Result<Paged<PublicationListing>, ApiError>;
    async fn record_outcome(
        &self,
        id: i32,
        outcome: &PublicationOutcome,
    ) -> Result<Option<Publication>, ApiError>;
}

#[async_trait]
pub trait TrackingRepository: Clone + Send + Sync + 'static {
    /// Overwrites the click metadata of an existing link and bumps its counter.
    async fn record_click(
        &self,
        tracking_id: &str,
        click: &ClickMetadata,
    ) -> Result<Option<ClickTracking>, ApiError>;
    async fn clicked_since(
        &self,
        since: NaiveDateTime,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ClickTracking>, ApiError>;
}
