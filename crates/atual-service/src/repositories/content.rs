use super::{
    SharedConnection, lock,
    traits::{ContentRepository, JobFilter, NewsFilter, Paged},
};
use crate::errors::ApiError;
use crate::models::{JobPost, NewClickTracking, NewJobPost, NewNewsPost, NewsPost};
use crate::schema::{click_tracking, job_posts, news_posts};
use crate::validation::PageRequest;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

#[derive(Clone)]
pub struct SqliteContentRepository {
    db: SharedConnection,
}

impl SqliteContentRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

fn filtered_jobs(filter: &JobFilter) -> job_posts::BoxedQuery<'static, Sqlite> {
    let mut query = job_posts::table.into_boxed();

    if let Some(location) = &filter.location {
        query = query.filter(job_posts::location.like(format!("%{location}%")));
    }
    if let Some(salary_min) = filter.salary_min {
        query = query.filter(job_posts::salary_min.ge(salary_min));
    }
    if let Some(job_type) = &filter.job_type {
        query = query.filter(job_posts::job_type.eq(job_type.clone()));
    }
    if let Some(work_mode) = &filter.work_mode {
        query = query.filter(job_posts::work_mode.eq(work_mode.clone()));
    }
    if let Some(experience_level) = &filter.experience_level {
        query = query.filter(job_posts::experience_level.eq(experience_level.clone()));
    }

    query
}

fn filtered_news(filter: &NewsFilter) -> news_posts::BoxedQuery<'static, Sqlite> {
    let mut query = news_posts::table.into_boxed();

    if let Some(category) = &filter.category {
        query = query.filter(news_posts::category.eq(category.clone()));
    }
    if let Some(source) = &filter.source {
        query = query.filter(news_posts::source_name.like(format!("%{source}%")));
    }

    query
}

#[async_trait]
impl ContentRepository for SqliteContentRepository {
    async fn create_job(
        &self,
        job: &NewJobPost,
        tracking_id: Option<&str>,
    ) -> Result<JobPost, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, ApiError, _>(|conn| {
            let inserted = diesel::insert_into(job_posts::table)
                .values(job)
                .returning(JobPost::as_returning())
                .get_result(conn)?;

            if let (Some(tracking_id), Some(source_url)) =
                (tracking_id, inserted.source_url.as_deref())
            {
                diesel::insert_into(click_tracking::table)
                    .values(&NewClickTracking {
                        tracking_id,
                        original_url: source_url,
                        job_post_id: Some(inserted.id),
                        news_post_id: None,
                    })
                    .execute(conn)?;
            }

            Ok(inserted)
        })
    }

    async fn create_news(
        &self,
        news: &NewNewsPost,
        tracking_id: &str,
    ) -> Result<NewsPost, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, ApiError, _>(|conn| {
            let inserted = diesel::insert_into(news_posts::table)
                .values(news)
                .returning(NewsPost::as_returning())
                .get_result(conn)?;

            diesel::insert_into(click_tracking::table)
                .values(&NewClickTracking {
                    tracking_id,
                    original_url: &inserted.source_url,
                    job_post_id: None,
                    news_post_id: Some(inserted.id),
                })
                .execute(conn)?;

            Ok(inserted)
        })
    }

    async fn find_job(&self, id: i32) -> Result<Option<JobPost>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = job_posts::table
            .find(id)
            .select(JobPost::as_select())
            .first(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn find_news(&self, id: i32) -> Result<Option<NewsPost>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = news_posts::table
            .find(id)
            .select(NewsPost::as_select())
            .first(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn list_jobs(
        &self,
        filter: &JobFilter,
        page: &PageRequest,
    ) -> Result<Paged<JobPost>, ApiError> {
        let mut conn = lock(&self.db)?;

        let total = filtered_jobs(filter).count().get_result::<i64>(&mut *conn)?;
        let items = filtered_jobs(filter)
            .order((job_posts::created_at.desc(), job_posts::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .select(JobPost::as_select())
            .load(&mut *conn)?;

        Ok(Paged {
            items,
            total: total as u64,
        })
    }

    async fn list_news(
        &self,
        filter: &NewsFilter,
        page: &PageRequest,
    ) -> Result<Paged<NewsPost>, ApiError> {
        let mut conn = lock(&self.db)?;

        let total = filtered_news(filter).count().get_result::<i64>(&mut *conn)?;
        let items = filtered_news(filter)
            .order((news_posts::created_at.desc(), news_posts::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .select(NewsPost::as_select())
            .load(&mut *conn)?;

        Ok(Paged {
            items,
            total: total as u64,
        })
    }
}
