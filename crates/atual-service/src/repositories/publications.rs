use super::{
    SharedConnection, lock,
    traits::{Paged, PublicationRepository},
};
use crate::errors::ApiError;
use crate::models::{
    ContentRef, Group, Publication, PublicationDraft, PublicationListing, PublicationOutcome,
};
use crate::schema::{groups, job_posts, news_posts, publications};
use crate::validation::PageRequest;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::collections::HashMap;

#[derive(Clone)]
pub struct SqlitePublicationRepository {
    db: SharedConnection,
}

impl SqlitePublicationRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

fn filtered_publications(status: Option<&str>) -> publications::BoxedQuery<'static, Sqlite> {
    let mut query = publications::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(publications::status.eq(status.to_string()));
    }
    query
}

#[async_trait]
impl PublicationRepository for SqlitePublicationRepository {
    async fn enqueue(
        &self,
        content: ContentRef,
        drafts: &[PublicationDraft],
        published_at: NaiveDateTime,
    ) -> Result<usize, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, ApiError, _>(|conn| {
            let rows: Vec<_> = drafts
                .iter()
                .map(|draft| draft.as_insertable(content))
                .collect();

            let queued = if rows.is_empty() {
                0
            } else {
                diesel::insert_into(publications::table)
                    .values(&rows)
                    .execute(conn)?
            };

            match content {
                ContentRef::Job(id) => diesel::update(job_posts::table.find(id))
                    .set((
                        job_posts::is_published.eq(true),
                        job_posts::published_at.eq(Some(published_at)),
                    ))
                    .execute(conn)?,
                ContentRef::News(id) => diesel::update(news_posts::table.find(id))
                    .set((
                        news_posts::is_published.eq(true),
                        news_posts::published_at.eq(Some(published_at)),
                    ))
                    .execute(conn)?,
            };

            Ok(queued)
        })
    }

    async fn list(
        &self,
        status: Option<&str>,
        page: &PageRequest,
    ) -> Result<Paged<PublicationListing>, ApiError> {
        let mut conn = lock(&self.db)?;

        let total = filtered_publications(status)
            .count()
            .get_result::<i64>(&mut *conn)?;
        let rows = filtered_publications(status)
            .order((publications::created_at.desc(), publications::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .select(Publication::as_select())
            .load(&mut *conn)?;

        let group_ids: Vec<i32> = rows.iter().map(|row| row.group_id).collect();
        let job_ids: Vec<i32> = rows.iter().filter_map(|row| row.job_post_id).collect();
        let news_ids: Vec<i32> = rows.iter().filter_map(|row| row.news_post_id).collect();

        let groups_by_id: HashMap<i32, Group> = groups::table
            .filter(groups::id.eq_any(&group_ids))
            .select(Group::as_select())
            .load(&mut *conn)?
            .into_iter()
            .map(|group| (group.id, group))
            .collect();
        let job_titles: HashMap<i32, String> = job_posts::table
            .filter(job_posts::id.eq_any(&job_ids))
            .select((job_posts::id, job_posts::title))
            .load::<(i32, String)>(&mut *conn)?
            .into_iter()
            .collect();
        let news_titles: HashMap<i32, String> = news_posts::table
            .filter(news_posts::id.eq_any(&news_ids))
            .select((news_posts::id, news_posts::title))
            .load::<(i32, String)>(&mut *conn)?
            .into_iter()
            .collect();

        let items = rows
            .into_iter()
            .map(|publication| {
                let content_title = match (publication.job_post_id, publication.news_post_id) {
                    (Some(job_id), _) => job_titles.get(&job_id).cloned(),
                    (None, Some(news_id)) => news_titles.get(&news_id).cloned(),
                    (None, None) => None,
                };
                PublicationListing {
                    group: groups_by_id.get(&publication.group_id).cloned(),
                    content_title,
                    publication,
                }
            })
            .collect();

        Ok(Paged {
            items,
            total: total as u64,
        })
    }

    async fn record_outcome(
        &self,
        id: i32,
        outcome: &PublicationOutcome,
    ) -> Result<Option<Publication>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = diesel::update(publications::table.find(id))
            .set(outcome)
            .returning(Publication::as_returning())
            .get_result(&mut *conn)
            .optional()?;
        Ok(result)
    }
}
