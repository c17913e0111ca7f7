use super::{SharedConnection, lock, traits::GroupRepository};
use crate::errors::ApiError;
use crate::models::{Group, GroupChanges, NewGroup};
use crate::schema::groups;
use async_trait::async_trait;
use diesel::prelude::*;

#[derive(Clone)]
pub struct SqliteGroupRepository {
    db: SharedConnection,
}

impl SqliteGroupRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    async fn list(&self) -> Result<Vec<Group>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = groups::table
            .order(groups::id.asc())
            .select(Group::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn find_many(&self, ids: &[i32]) -> Result<Vec<Group>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = lock(&self.db)?;
        let result = groups::table
            .filter(groups::id.eq_any(ids))
            .select(Group::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn find_by_platform_id(
        &self,
        platform: &str,
        group_id: &str,
    ) -> Result<Option<Group>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = groups::table
            .filter(groups::platform.eq(platform))
            .filter(groups::group_id.eq(group_id))
            .select(Group::as_select())
            .first(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn create(&self, group: &NewGroup) -> Result<Group, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = diesel::insert_into(groups::table)
            .values(group)
            .returning(Group::as_returning())
            .get_result(&mut *conn)?;
        Ok(result)
    }

    async fn update(&self, id: i32, changes: &GroupChanges) -> Result<Option<Group>, ApiError> {
        let mut conn = lock(&self.db)?;

        // diesel rejects an empty changeset, so a no-op update is just a lookup
        if changes.is_empty() {
            let result = groups::table
                .find(id)
                .select(Group::as_select())
                .first(&mut *conn)
                .optional()?;
            return Ok(result);
        }

        let result = diesel::update(groups::table.find(id))
            .set(changes)
            .returning(Group::as_returning())
            .get_result(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut conn = lock(&self.db)?;
        let deleted = diesel::delete(groups::table.find(id)).execute(&mut *conn)?;
        Ok(deleted > 0)
    }
}
