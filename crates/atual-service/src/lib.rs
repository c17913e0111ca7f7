use axum::Router;

pub mod analytics;
pub mod client_ip;
pub mod config_store;
pub mod db;
pub mod errors;
pub mod interstitial;
pub mod messages;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod shutdown;
pub mod validation;

use repositories::{
    AccountRepository, ConfigRepository, ContentRepository, GroupRepository,
    PublicationRepository, SharedConnection, SqliteAccountRepository, SqliteConfigRepository,
    SqliteContentRepository, SqliteGroupRepository, SqlitePublicationRepository,
    SqliteTrackingRepository, TrackingRepository,
};

/// Everything a handler needs, abstracted so tests can swap storage.
pub trait AppState: Clone + Send + Sync + 'static {
    type Config: ConfigRepository;
    type Accounts: AccountRepository;
    type Groups: GroupRepository;
    type Content: ContentRepository;
    type Publications: PublicationRepository;
    type Tracking: TrackingRepository;

    fn config_repo(&self) -> Self::Config;
    fn account_repo(&self) -> Self::Accounts;
    fn group_repo(&self) -> Self::Groups;
    fn content_repo(&self) -> Self::Content;
    fn publication_repo(&self) -> Self::Publications;
    fn tracking_repo(&self) -> Self::Tracking;
}

#[derive(Clone)]
pub struct DefaultAppState {
    db: SharedConnection,
}

impl DefaultAppState {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

impl AppState for DefaultAppState {
    type Config = SqliteConfigRepository;
    type Accounts = SqliteAccountRepository;
    type Groups = SqliteGroupRepository;
    type Content = SqliteContentRepository;
    type Publications = SqlitePublicationRepository;
    type Tracking = SqliteTrackingRepository;

    fn config_repo(&self) -> Self::Config {
        SqliteConfigRepository::new(self.db.clone())
    }

    fn account_repo(&self) -> Self::Accounts {
        SqliteAccountRepository::new(self.db.clone())
    }

    fn group_repo(&self) -> Self::Groups {
        SqliteGroupRepository::new(self.db.clone())
    }

    fn content_repo(&self) -> Self::Content {
        SqliteContentRepository::new(self.db.clone())
    }

    fn publication_repo(&self) -> Self::Publications {
        SqlitePublicationRepository::new(self.db.clone())
    }

    fn tracking_repo(&self) -> Self::Tracking {
        SqliteTrackingRepository::new(self.db.clone())
    }
}

pub fn create_app(state: DefaultAppState) -> Router {
    routes::create_router().with_state(state)
}
