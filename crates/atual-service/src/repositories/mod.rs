use crate::errors::ApiError;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::error;

pub mod accounts;
pub mod config;
pub mod content;
pub mod groups;
pub mod publications;
pub mod tracking;
pub mod traits;

pub use accounts::SqliteAccountRepository;
pub use config::SqliteConfigRepository;
pub use content::SqliteContentRepository;
pub use groups::SqliteGroupRepository;
pub use publications::SqlitePublicationRepository;
pub use tracking::SqliteTrackingRepository;
pub use traits::{
    AccountRepository, ConfigRepository, ContentRepository, GroupRepository, JobFilter,
    NewsFilter, Paged, PublicationRepository, TrackingRepository,
};

pub type SharedConnection = Arc<Mutex<SqliteConnection>>;

fn lock(db: &SharedConnection) -> Result<MutexGuard<'_, SqliteConnection>, ApiError> {
    db.lock().map_err(|_| {
        error!("Database connection mutex poisoned");
        ApiError::InternalError
    })
}
