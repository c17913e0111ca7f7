use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Serialize, Serializer};

use crate::validation::ContentKind;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::bot_config)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ConfigEntry {
    pub id: i32,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ConfigEntry {
    pub fn decoded_value(&self) -> serde_json::Value {
        crate::config_store::decode_config_value(self.value.as_deref())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::bot_config)]
pub struct NewConfigEntry<'a> {
    pub key: &'a str,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::ai_providers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AiProvider {
    pub id: i32,
    pub name: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub is_active: bool,
    pub status: String,
    pub last_check: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::ai_providers)]
pub struct NewAiProvider<'a> {
    pub name: &'a str,
    pub api_key: Option<&'a str>,
    pub model: Option<&'a str>,
    pub is_active: bool,
    pub status: &'a str,
}

/// Create-or-update request for an AI provider, keyed by name.
#[derive(Debug, Clone)]
pub struct AiProviderUpsert {
    pub name: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub activate: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::social_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SocialAccount {
    pub id: i32,
    pub platform: String,
    pub account_name: Option<String>,
    pub api_key: Option<String>,
    pub session_data: Option<String>,
    pub is_active: bool,
    pub status: String,
    pub last_check: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::social_accounts)]
pub struct NewSocialAccount<'a> {
    pub platform: &'a str,
    pub account_name: Option<&'a str>,
    pub api_key: Option<&'a str>,
    pub status: &'a str,
}

/// Create-or-update request for a social account, keyed by platform.
#[derive(Debug, Clone)]
pub struct SocialAccountUpsert {
    pub platform: String,
    pub account_name: Option<String>,
    pub api_key: Option<String>,
}

/// Status written whenever credentials change, until a checker verifies them.
pub const ACCOUNT_STATUS_OFFLINE: &str = "offline";

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub platform: String,
    pub group_id: String,
    pub link: Option<String>,
    pub member_count: i32,
    pub activity_score: f64,
    pub is_active: bool,
    pub auto_discovered: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::groups)]
pub struct NewGroup {
    pub name: String,
    pub platform: String,
    pub group_id: String,
    pub link: Option<String>,
    pub member_count: i32,
    pub activity_score: f64,
    pub is_active: bool,
    pub auto_discovered: bool,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::groups)]
pub struct GroupChanges {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub member_count: Option<i32>,
    pub activity_score: Option<f64>,
}

impl GroupChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.is_active.is_none()
            && self.member_count.is_none()
            && self.activity_score.is_none()
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::job_posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JobPost {
    pub id: i32,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub job_type: Option<String>,
    pub work_mode: Option<String>,
    pub experience_level: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub tracking_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Insertable)]
#[diesel(table_name = crate::schema::job_posts)]
pub struct NewJobPost {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub job_type: Option<String>,
    pub work_mode: Option<String>,
    pub experience_level: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub tracking_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::news_posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewsPost {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub source_url: String,
    pub source_name: Option<String>,
    pub tracking_url: Option<String>,
    pub category: Option<String>,
    #[serde(serialize_with = "serialize_tags")]
    pub tags: Option<String>,
    pub is_published: bool,
    pub published_at: Option<NaiveDateTime>,
    pub original_published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

// Tags are stored as a JSON text column but exposed as a list.
fn decode_tags(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}

fn serialize_tags<S: Serializer>(tags: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    decode_tags(tags.as_deref()).serialize(serializer)
}

#[derive(Debug, Default, Insertable)]
#[diesel(table_name = crate::schema::news_posts)]
pub struct NewNewsPost {
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub source_url: String,
    pub source_name: Option<String>,
    pub tracking_url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub original_published_at: Option<NaiveDateTime>,
}

/// Reference to a piece of publishable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRef {
    Job(i32),
    News(i32),
}

impl ContentRef {
    pub fn new(kind: ContentKind, id: i32) -> Self {
        match kind {
            ContentKind::Job => ContentRef::Job(id),
            ContentKind::News => ContentRef::News(id),
        }
    }

    fn job_post_id(&self) -> Option<i32> {
        match self {
            ContentRef::Job(id) => Some(*id),
            ContentRef::News(_) => None,
        }
    }

    fn news_post_id(&self) -> Option<i32> {
        match self {
            ContentRef::News(id) => Some(*id),
            ContentRef::Job(_) => None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::publications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Publication {
    pub id: i32,
    pub group_id: i32,
    pub job_post_id: Option<i32>,
    pub news_post_id: Option<i32>,
    pub message_content: String,
    pub platform_message_id: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Publication {
    pub fn content_kind(&self) -> ContentKind {
        if self.job_post_id.is_some() {
            ContentKind::Job
        } else {
            ContentKind::News
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::publications)]
pub struct NewPublication<'a> {
    pub group_id: i32,
    pub job_post_id: Option<i32>,
    pub news_post_id: Option<i32>,
    pub message_content: &'a str,
    pub status: &'a str,
}

/// A formatted message waiting to be queued for one group.
#[derive(Debug, Clone)]
pub struct PublicationDraft {
    pub group_id: i32,
    pub message: String,
}

impl PublicationDraft {
    pub fn as_insertable(&self, content: ContentRef) -> NewPublication<'_> {
        NewPublication {
            group_id: self.group_id,
            job_post_id: content.job_post_id(),
            news_post_id: content.news_post_id(),
            message_content: &self.message,
            status: crate::validation::PublicationStatus::Pending.as_str(),
        }
    }
}

/// Delivery outcome reported by the external dispatch worker.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::publications)]
pub struct PublicationOutcome {
    pub status: String,
    pub error_message: Option<String>,
    pub platform_message_id: Option<String>,
    pub sent_at: Option<NaiveDateTime>,
}

/// Publication joined with the names needed for listing.
#[derive(Debug, Clone)]
pub struct PublicationListing {
    pub publication: Publication,
    pub group: Option<Group>,
    pub content_title: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::click_tracking)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClickTracking {
    pub id: i32,
    pub tracking_id: String,
    pub original_url: String,
    pub job_post_id: Option<i32>,
    pub news_post_id: Option<i32>,
    pub group_id: Option<i32>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub clicked_at: Option<NaiveDateTime>,
    pub click_count: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::click_tracking)]
pub struct NewClickTracking<'a> {
    pub tracking_id: &'a str,
    pub original_url: &'a str,
    pub job_post_id: Option<i32>,
    pub news_post_id: Option<i32>,
}

/// Request metadata captured on each visit of a tracking link.
#[derive(Debug, Clone, Default)]
pub struct ClickMetadata {
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub referrer: String,
    pub clicked_at: NaiveDateTime,
}
