use super::{SharedConnection, lock, traits::AccountRepository};
use crate::errors::ApiError;
use crate::models::{
    ACCOUNT_STATUS_OFFLINE, AiProvider, AiProviderUpsert, NewAiProvider, NewSocialAccount,
    SocialAccount, SocialAccountUpsert,
};
use crate::schema::{ai_providers, social_accounts};
use async_trait::async_trait;
use diesel::prelude::*;

#[derive(Clone)]
pub struct SqliteAccountRepository {
    db: SharedConnection,
}

impl SqliteAccountRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn list_ai_providers(&self) -> Result<Vec<AiProvider>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = ai_providers::table
            .order(ai_providers::id.asc())
            .select(AiProvider::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn upsert_ai_provider(&self, upsert: &AiProviderUpsert) -> Result<AiProvider, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, ApiError, _>(|conn| {
            let existing = ai_providers::table
                .filter(ai_providers::name.eq(&upsert.name))
                .select(AiProvider::as_select())
                .first(conn)
                .optional()?;

            let provider_id = match existing {
                Some(existing) => {
                    diesel::update(ai_providers::table.find(existing.id))
                        .set(ai_providers::status.eq(ACCOUNT_STATUS_OFFLINE))
                        .execute(conn)?;
                    if let Some(api_key) = &upsert.api_key {
                        diesel::update(ai_providers::table.find(existing.id))
                            .set(ai_providers::api_key.eq(api_key))
                            .execute(conn)?;
                    }
                    if let Some(model) = &upsert.model {
                        diesel::update(ai_providers::table.find(existing.id))
                            .set(ai_providers::model.eq(model))
                            .execute(conn)?;
                    }
                    existing.id
                }
                None => diesel::insert_into(ai_providers::table)
                    .values(&NewAiProvider {
                        name: &upsert.name,
                        api_key: upsert.api_key.as_deref(),
                        model: upsert.model.as_deref(),
                        is_active: false,
                        status: ACCOUNT_STATUS_OFFLINE,
                    })
                    .returning(ai_providers::id)
                    .get_result(conn)?,
            };

            // Only one provider may be active at a time
            if upsert.activate {
                diesel::update(ai_providers::table)
                    .set(ai_providers::is_active.eq(false))
                    .execute(conn)?;
                diesel::update(ai_providers::table.find(provider_id))
                    .set(ai_providers::is_active.eq(true))
                    .execute(conn)?;
            }

            let provider = ai_providers::table
                .find(provider_id)
                .select(AiProvider::as_select())
                .first(conn)?;
            Ok(provider)
        })
    }

    async fn list_social_accounts(&self) -> Result<Vec<SocialAccount>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = social_accounts::table
            .order(social_accounts::id.asc())
            .select(SocialAccount::as_select())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn upsert_social_account(
        &self,
        upsert: &SocialAccountUpsert,
    ) -> Result<SocialAccount, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, ApiError, _>(|conn| {
            let existing = social_accounts::table
                .filter(social_accounts::platform.eq(&upsert.platform))
                .select(SocialAccount::as_select())
                .first(conn)
                .optional()?;

            let account_id = match existing {
                Some(existing) => {
                    diesel::update(social_accounts::table.find(existing.id))
                        .set(social_accounts::status.eq(ACCOUNT_STATUS_OFFLINE))
                        .execute(conn)?;
                    if let Some(account_name) = &upsert.account_name {
                        diesel::update(social_accounts::table.find(existing.id))
                            .set(social_accounts::account_name.eq(account_name))
                            .execute(conn)?;
                    }
                    if let Some(api_key) = &upsert.api_key {
                        diesel::update(social_accounts::table.find(existing.id))
                            .set(social_accounts::api_key.eq(api_key))
                            .execute(conn)?;
                    }
                    existing.id
                }
                None => diesel::insert_into(social_accounts::table)
                    .values(&NewSocialAccount {
                        platform: &upsert.platform,
                        account_name: upsert.account_name.as_deref(),
                        api_key: upsert.api_key.as_deref(),
                        status: ACCOUNT_STATUS_OFFLINE,
                    })
                    .returning(social_accounts::id)
                    .get_result(conn)?,
            };

            let account = social_accounts::table
                .find(account_id)
                .select(SocialAccount::as_select())
                .first(conn)?;
            Ok(account)
        })
    }
}
