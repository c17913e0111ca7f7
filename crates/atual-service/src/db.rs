use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::{debug, info};

use crate::config_store::{default_settings, encode_config_value};
use crate::models::NewConfigEntry;
use crate::schema::bot_config;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Error, Debug)]
pub enum DbSetupError {
    #[error("Failed to connect to database: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Failed to run migrations: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Query(#[from] diesel::result::Error),
}

pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, DbSetupError> {
    let mut connection = SqliteConnection::establish(database_url)?;
    prepare_connection(&mut connection)?;
    Ok(connection)
}

/// Enables foreign keys, applies pending migrations and seeds default settings.
pub fn prepare_connection(conn: &mut SqliteConnection) -> Result<(), DbSetupError> {
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(conn)?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| DbSetupError::Migration(err.to_string()))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "Applied database migrations");
    }

    let seeded = seed_default_settings(conn)?;
    debug!(seeded, "Default settings checked");

    Ok(())
}

pub fn seed_default_settings(conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    let mut seeded = 0;

    for (key, value) in default_settings() {
        let exists = bot_config::table
            .filter(bot_config::key.eq(key))
            .count()
            .get_result::<i64>(conn)?
            > 0;

        if exists {
            continue;
        }

        diesel::insert_into(bot_config::table)
            .values(&NewConfigEntry {
                key,
                value: Some(encode_config_value(&value)),
                description: None,
            })
            .execute(conn)?;
        seeded += 1;
    }

    Ok(seeded)
}
