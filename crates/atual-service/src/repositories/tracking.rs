use super::{SharedConnection, lock, traits::TrackingRepository};
use crate::errors::ApiError;
use crate::models::{ClickMetadata, ClickTracking};
use crate::schema::click_tracking;
use crate::validation::ContentKind;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Clone)]
pub struct SqliteTrackingRepository {
    db: SharedConnection,
}

impl SqliteTrackingRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TrackingRepository for SqliteTrackingRepository {
    async fn record_click(
        &self,
        tracking_id: &str,
        click: &ClickMetadata,
    ) -> Result<Option<ClickTracking>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = diesel::update(
            click_tracking::table.filter(click_tracking::tracking_id.eq(tracking_id)),
        )
        .set((
            click_tracking::ip_address.eq(click.ip_address.as_deref()),
            click_tracking::user_agent.eq(Some(click.user_agent.as_str())),
            click_tracking::referrer.eq(Some(click.referrer.as_str())),
            click_tracking::clicked_at.eq(Some(click.clicked_at)),
            click_tracking::click_count.eq(click_tracking::click_count + 1),
        ))
        .returning(ClickTracking::as_returning())
        .get_result(&mut *conn)
        .optional()?;
        Ok(result)
    }

    async fn clicked_since(
        &self,
        since: NaiveDateTime,
        kind: Option<ContentKind>,
    ) -> Result<Vec<ClickTracking>, ApiError> {
        let mut conn = lock(&self.db)?;
        let mut query = click_tracking::table
            .filter(click_tracking::clicked_at.ge(since))
            .into_boxed();

        query = match kind {
            Some(ContentKind::Job) => query.filter(click_tracking::job_post_id.is_not_null()),
            Some(ContentKind::News) => query.filter(click_tracking::news_post_id.is_not_null()),
            None => query,
        };

        let result = query
            .order(click_tracking::clicked_at.asc())
            .select(ClickTracking::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }
}
