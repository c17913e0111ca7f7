use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::ApiError;
use crate::routes::extract::{Json, Path, Query};
use crate::models::{JobPost, NewJobPost, NewNewsPost, NewsPost};
use crate::routes::envelope::{ApiResponse, Pagination};
use crate::routes::tracking::{new_tracking_id, tracking_path};
use crate::validation::{parse_datetime, require_text, validate_page};
use crate::{
    AppState,
    repositories::{ContentRepository, JobFilter, NewsFilter},
};

#[derive(Debug, Deserialize)]
struct CreateJobRequest {
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    salary: Option<String>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    description: Option<String>,
    requirements: Option<String>,
    job_type: Option<String>,
    work_mode: Option<String>,
    experience_level: Option<String>,
    source_url: Option<String>,
    source_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateNewsRequest {
    title: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    source_url: Option<String>,
    source_name: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    original_published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListJobsQuery {
    page: Option<u32>,
    per_page: Option<u32>,
    location: Option<String>,
    salary_min: Option<f64>,
    job_type: Option<String>,
    work_mode: Option<String>,
    experience_level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListNewsQuery {
    page: Option<u32>,
    per_page: Option<u32>,
    category: Option<String>,
    source: Option<String>,
}

#[derive(Debug, Serialize)]
struct JobList {
    jobs: Vec<JobPost>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct NewsList {
    news: Vec<NewsPost>,
    pagination: Pagination,
}

// Query strings like `?location=` should behave as if the filter were absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[instrument(skip_all, fields(has_source_url = payload.source_url.is_some()))]
async fn create_job<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<ResponseJson<ApiResponse<JobPost>>, ApiError> {
    let title = require_text("title", payload.title)?;
    let source_url = non_empty(payload.source_url);

    // Only jobs with somewhere to send the reader get a tracking link
    let tracking_id = source_url.as_ref().map(|_| new_tracking_id());

    let new_job = NewJobPost {
        title,
        company: payload.company,
        location: payload.location,
        salary: payload.salary,
        salary_min: payload.salary_min,
        salary_max: payload.salary_max,
        description: payload.description,
        requirements: payload.requirements,
        job_type: payload.job_type,
        work_mode: payload.work_mode,
        experience_level: payload.experience_level,
        source_url,
        source_name: payload.source_name,
        tracking_url: tracking_id.as_deref().map(tracking_path),
    };

    let job = state
        .content_repo()
        .create_job(&new_job, tracking_id.as_deref())
        .await?;

    info!(id = job.id, tracked = tracking_id.is_some(), "Job post created");
    Ok(ApiResponse::with_message(job, "Job post created"))
}

#[instrument(skip_all, fields(page = ?query.page, per_page = ?query.per_page))]
async fn list_jobs<S: AppState>(
    State(state): State<S>,
    Query(query): Query<ListJobsQuery>,
) -> Result<ResponseJson<ApiResponse<JobList>>, ApiError> {
    let page = validate_page(query.page, query.per_page)?;
    let filter = JobFilter {
        location: non_empty(query.location),
        salary_min: query.salary_min.filter(|salary| *salary > 0.0),
        job_type: non_empty(query.job_type),
        work_mode: non_empty(query.work_mode),
        experience_level: non_empty(query.experience_level),
    };
    debug!(?filter, "Listing job posts");

    let result = state.content_repo().list_jobs(&filter, &page).await?;

    info!(
        returned_count = result.items.len(),
        total = result.total,
        "Retrieved job posts"
    );

    Ok(ApiResponse::ok(JobList {
        pagination: Pagination::new(&page, result.total),
        jobs: result.items,
    }))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_job<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<ApiResponse<JobPost>>, ApiError> {
    let job = state
        .content_repo()
        .find_job(id)
        .await?
        .ok_or(ApiError::NotFound("Job post"))?;
    Ok(ApiResponse::ok(job))
}

#[instrument(skip_all, fields(has_tags = payload.tags.is_some()))]
async fn create_news<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<CreateNewsRequest>,
) -> Result<ResponseJson<ApiResponse<NewsPost>>, ApiError> {
    let title = require_text("title", payload.title)?;
    let source_url = require_text("source_url", non_empty(payload.source_url))?;

    let original_published_at = non_empty(payload.original_published_at)
        .map(|value| parse_datetime("original_published_at", &value))
        .transpose()?;

    let tags = payload
        .tags
        .map(|tags| serde_json::to_string(&tags))
        .transpose()?;

    let tracking_id = new_tracking_id();

    let new_news = NewNewsPost {
        title,
        summary: payload.summary,
        content: payload.content,
        source_url,
        source_name: payload.source_name,
        tracking_url: Some(tracking_path(&tracking_id)),
        category: payload.category,
        tags,
        original_published_at,
    };

    let news = state
        .content_repo()
        .create_news(&new_news, &tracking_id)
        .await?;

    info!(id = news.id, "News post created");
    Ok(ApiResponse::with_message(news, "News post created"))
}

#[instrument(skip_all, fields(page = ?query.page, per_page = ?query.per_page))]
async fn list_news<S: AppState>(
    State(state): State<S>,
    Query(query): Query<ListNewsQuery>,
) -> Result<ResponseJson<ApiResponse<NewsList>>, ApiError> {
    let page = validate_page(query.page, query.per_page)?;
    let filter = NewsFilter {
        category: non_empty(query.category),
        source: non_empty(query.source),
    };
    debug!(?filter, "Listing news posts");

    let result = state.content_repo().list_news(&filter, &page).await?;

    info!(
        returned_count = result.items.len(),
        total = result.total,
        "Retrieved news posts"
    );

    Ok(ApiResponse::ok(NewsList {
        pagination: Pagination::new(&page, result.total),
        news: result.items,
    }))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_news<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<ApiResponse<NewsPost>>, ApiError> {
    let news = state
        .content_repo()
        .find_news(id)
        .await?
        .ok_or(ApiError::NotFound("News post"))?;
    Ok(ApiResponse::ok(news))
}

pub fn create_content_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/jobs", get(list_jobs::<S>).post(create_job::<S>))
        .route("/jobs/{id}", get(get_job::<S>))
        .route("/news", get(list_news::<S>).post(create_news::<S>))
        .route("/news/{id}", get(get_news::<S>))
}
