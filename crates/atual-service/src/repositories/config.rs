use super::{SharedConnection, lock, traits::ConfigRepository};
use crate::errors::ApiError;
use crate::models::{ConfigEntry, NewConfigEntry};
use crate::schema::bot_config;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

#[derive(Clone)]
pub struct SqliteConfigRepository {
    db: SharedConnection,
}

impl SqliteConfigRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConfigRepository for SqliteConfigRepository {
    async fn find(&self, key: &str) -> Result<Option<ConfigEntry>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = bot_config::table
            .filter(bot_config::key.eq(key))
            .select(ConfigEntry::as_select())
            .first(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn all(&self) -> Result<Vec<ConfigEntry>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = bot_config::table
            .order(bot_config::key.asc())
            .select(ConfigEntry::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn upsert(
        &self,
        key: &str,
        value: String,
        description: Option<String>,
    ) -> Result<ConfigEntry, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, ApiError, _>(|conn| {
            Ok(upsert_entry(conn, key, value, description)?)
        })
    }

    async fn upsert_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> Result<Vec<ConfigEntry>, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, ApiError, _>(|conn| {
            entries
                .into_iter()
                .map(|(key, value)| Ok(upsert_entry(conn, &key, value, None)?))
                .collect()
        })
    }
}

fn upsert_entry(
    conn: &mut SqliteConnection,
    key: &str,
    value: String,
    description: Option<String>,
) -> QueryResult<ConfigEntry> {
    let existing = bot_config::table
        .filter(bot_config::key.eq(key))
        .select(ConfigEntry::as_select())
        .first(conn)
        .optional()?;

    let Some(existing) = existing else {
        return diesel::insert_into(bot_config::table)
            .values(&NewConfigEntry {
                key,
                value: Some(value),
                description,
            })
            .returning(ConfigEntry::as_returning())
            .get_result(conn);
    };

    let target = bot_config::table.find(existing.id);
    let now = Utc::now().naive_utc();
    // An absent description keeps the stored one
    match description {
        Some(description) => diesel::update(target)
            .set((
                bot_config::value.eq(Some(value)),
                bot_config::description.eq(Some(description)),
                bot_config::updated_at.eq(now),
            ))
            .returning(ConfigEntry::as_returning())
            .get_result(conn),
        None => diesel::update(target)
            .set((
                bot_config::value.eq(Some(value)),
                bot_config::updated_at.eq(now),
            ))
            .returning(ConfigEntry::as_returning())
            .get_result(conn),
    }
}
