use crate::common::{server_utils::create_test_server, test_utils};
use anyhow::Result;
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Value, json};

#[tokio::test]
async fn test_click_report_counts_clicked_links_only() -> Result<()> {
    let (server, db) = create_test_server();

    let group = test_utils::create_group(&server, "Vagas SP", "sp", true).await;
    let job = test_utils::create_job(
        &server,
        json!({ "title": "Vaga", "source_url": "https://jobs.example.com/1" }),
    )
    .await;
    let clicked_news = test_utils::create_news(
        &server,
        json!({ "title": "Lida", "source_url": "https://news.example.com/1" }),
    )
    .await;
    // Never clicked, must not show up
    test_utils::create_news(
        &server,
        json!({ "title": "Ignorada", "source_url": "https://news.example.com/2" }),
    )
    .await;

    let job_url = job["tracking_url"].as_str().unwrap();
    test_utils::set_click_group(
        &mut db.lock().unwrap(),
        &test_utils::tracking_token(job_url),
        group,
    );

    server.get(job_url).await;
    server
        .get(clicked_news["tracking_url"].as_str().unwrap())
        .await;

    let response = server.get("/api/analytics/clicks").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let report = &body["data"];
    assert_eq!(report["total_clicks"], json!(2));
    assert_eq!(report["period_days"], json!(30));
    assert_eq!(report["clicks_by_group"], json!({ "Vagas SP": 1 }));

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(report["clicks_by_day"][today.as_str()], json!(2));

    let body: Value = server
        .get("/api/analytics/clicks?days=7&content_type=news")
        .await
        .json();
    assert_eq!(body["data"]["total_clicks"], json!(1));
    assert_eq!(body["data"]["period_days"], json!(7));

    Ok(())
}

#[tokio::test]
async fn test_click_report_validation() -> Result<()> {
    let (server, _db) = create_test_server();

    server
        .get("/api/analytics/clicks?days=0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/analytics/clicks?content_type=video")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/analytics/clicks?days=4000000000").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], json!("days must be at most 3650"));

    server
        .get("/api/analytics/clicks?days=3650")
        .await
        .assert_status_ok();

    Ok(())
}

#[tokio::test]
async fn test_summary_splits_by_content_type() -> Result<()> {
    let (server, _db) = create_test_server();

    let job = test_utils::create_job(
        &server,
        json!({ "title": "Vaga", "source_url": "https://jobs.example.com/1" }),
    )
    .await;
    let news = test_utils::create_news(
        &server,
        json!({ "title": "Noticia", "source_url": "https://news.example.com/1" }),
    )
    .await;

    let job_url = job["tracking_url"].as_str().unwrap();
    server.get(job_url).await;
    server.get(job_url).await;
    server.get(news["tracking_url"].as_str().unwrap()).await;

    for path in ["/analytics/summary", "/api/analytics/summary"] {
        let response = server.get(path).await;
        response.assert_status_ok();

        let body: Value = response.json();
        let summary = &body["data"];
        // Clicks are counted per link, not per visit
        assert_eq!(summary["total_clicks_30d"], json!(2));
        assert_eq!(summary["job_clicks_30d"], json!(1));
        assert_eq!(summary["news_clicks_30d"], json!(1));
        assert!(summary["clicks_by_day_7d"].is_object());
    }

    Ok(())
}
