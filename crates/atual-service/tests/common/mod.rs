#![allow(dead_code)]

use atual_service::db;
use diesel::sqlite::SqliteConnection;

pub fn establish_test_connection() -> SqliteConnection {
    db::establish_connection(":memory:").expect("Failed to prepare in-memory database")
}

pub mod server_utils {
    use super::*;
    use atual_service::{DefaultAppState, routes};
    use axum_test::TestServer;
    use std::sync::{Arc, Mutex};

    pub fn create_test_server() -> (TestServer, Arc<Mutex<SqliteConnection>>) {
        let connection = establish_test_connection();
        let db = Arc::new(Mutex::new(connection));

        let state = DefaultAppState::new(db.clone());
        let app = routes::create_router().with_state(state);

        let server = TestServer::new(app).unwrap();
        (server, db)
    }
}

pub mod test_utils {
    use atual_service::models::ClickTracking;
    use atual_service::schema::{bot_config, click_tracking, job_posts, news_posts, publications};
    use axum_test::TestServer;
    use chrono::NaiveDateTime;
    use diesel::prelude::*;
    use diesel::sqlite::SqliteConnection;
    use serde_json::{Value, json};

    pub fn set_job_created_at(conn: &mut SqliteConnection, id: i32, created_at: NaiveDateTime) {
        diesel::update(job_posts::table.find(id))
            .set(job_posts::created_at.eq(created_at))
            .execute(conn)
            .unwrap();
    }

    pub fn set_news_created_at(conn: &mut SqliteConnection, id: i32, created_at: NaiveDateTime) {
        diesel::update(news_posts::table.find(id))
            .set(news_posts::created_at.eq(created_at))
            .execute(conn)
            .unwrap();
    }

    pub fn set_config_raw(conn: &mut SqliteConnection, key: &str, value: &str) {
        diesel::update(bot_config::table.filter(bot_config::key.eq(key)))
            .set(bot_config::value.eq(value))
            .execute(conn)
            .unwrap();
    }

    /// Makes SQLite abort any insert into `bot_config` for `key`.
    pub fn reject_config_key(conn: &mut SqliteConnection, key: &str) {
        diesel::sql_query(format!(
            "CREATE TRIGGER reject_config_key BEFORE INSERT ON bot_config \
             WHEN NEW.key = '{key}' BEGIN SELECT RAISE(ABORT, 'rejected'); END"
        ))
        .execute(conn)
        .unwrap();
    }

    pub fn tracking_rows(conn: &mut SqliteConnection) -> Vec<ClickTracking> {
        click_tracking::table
            .order(click_tracking::id.asc())
            .select(ClickTracking::as_select())
            .load(conn)
            .unwrap()
    }

    pub fn publication_statuses(conn: &mut SqliteConnection) -> Vec<String> {
        publications::table
            .order(publications::id.asc())
            .select(publications::status)
            .load(conn)
            .unwrap()
    }

    pub fn set_click_group(conn: &mut SqliteConnection, tracking_id: &str, group_id: i32) {
        diesel::update(click_tracking::table.filter(click_tracking::tracking_id.eq(tracking_id)))
            .set(click_tracking::group_id.eq(Some(group_id)))
            .execute(conn)
            .unwrap();
    }

    /// Token part of a `/track/<token>` URL.
    pub fn tracking_token(tracking_url: &str) -> String {
        tracking_url
            .strip_prefix("/track/")
            .expect("tracking url should start with /track/")
            .to_string()
    }

    pub async fn create_group(server: &TestServer, name: &str, group_id: &str, active: bool) -> i32 {
        let response = server
            .post("/api/groups")
            .json(&json!({
                "name": name,
                "platform": "whatsapp",
                "group_id": group_id,
                "is_active": active,
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["data"]["id"].as_i64().unwrap() as i32
    }

    pub async fn create_job(server: &TestServer, payload: Value) -> Value {
        let response = server.post("/api/jobs").json(&payload).await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"].clone()
    }

    pub async fn create_news(server: &TestServer, payload: Value) -> Value {
        let response = server.post("/api/news").json(&payload).await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"].clone()
    }
}
