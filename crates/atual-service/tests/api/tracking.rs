use crate::common::{server_utils::create_test_server, test_utils};
use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_unknown_token_is_not_found() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .get("/track/3f1c2a8e-9b7d-4c1e-8f2a-0d9e6b5a4c3b")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Link not found");

    let response = server.get("/track/not-a-uuid").await;
    response.assert_status(StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_click_redirects_and_records_metadata() -> Result<()> {
    let (server, db) = create_test_server();

    let job = test_utils::create_job(
        &server,
        json!({
            "title": "Desenvolvedor Rust",
            "source_url": "https://jobs.example.com/rust?ref=atual",
        }),
    )
    .await;
    let tracking_url = job["tracking_url"].as_str().unwrap().to_string();

    let response = server
        .get(&tracking_url)
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("198.51.100.7, 10.0.0.1"),
        )
        .add_header(
            HeaderName::from_static("user-agent"),
            HeaderValue::from_static("WhatsApp/2.24"),
        )
        .add_header(
            HeaderName::from_static("referer"),
            HeaderValue::from_static("https://chat.example.com/"),
        )
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://jobs.example.com/rust?ref=atual"
    );

    let rows = test_utils::tracking_rows(&mut db.lock().unwrap());
    assert_eq!(rows[0].ip_address.as_deref(), Some("198.51.100.7"));
    assert_eq!(rows[0].user_agent.as_deref(), Some("WhatsApp/2.24"));
    assert_eq!(rows[0].referrer.as_deref(), Some("https://chat.example.com/"));
    assert!(rows[0].clicked_at.is_some());
    assert_eq!(rows[0].click_count, 1);

    server
        .get(&tracking_url)
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
    let rows = test_utils::tracking_rows(&mut db.lock().unwrap());
    assert_eq!(rows[0].click_count, 2);

    Ok(())
}

#[tokio::test]
async fn test_interstitial_when_ads_configured() -> Result<()> {
    let (server, db) = create_test_server();

    server
        .post("/api/config")
        .json(&json!({
            "adsense_publisher_id": "ca-pub-1234567890",
            "adsense_slot_id": "9876543210",
        }))
        .await
        .assert_status_ok();

    let news = test_utils::create_news(
        &server,
        json!({
            "title": "Juros & inflação",
            "source_url": "https://news.example.com/juros?a=1&b=2",
        }),
    )
    .await;

    let response = server
        .get(news["tracking_url"].as_str().unwrap())
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("Notícia: Juros &amp; inflação"));
    assert!(html.contains(r#"data-ad-client="ca-pub-1234567890""#));
    assert!(html.contains(r#"data-ad-slot="9876543210""#));
    assert!(html.contains("https://news.example.com/juros?a=1&amp;b=2"));
    assert!(html.contains(r#"const destination = "https://news.example.com/juros?a=1\u0026b=2";"#));

    let rows = test_utils::tracking_rows(&mut db.lock().unwrap());
    assert_eq!(rows[0].click_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_non_web_destination_skips_interstitial() -> Result<()> {
    let (server, _db) = create_test_server();

    server
        .post("/api/config")
        .json(&json!({
            "adsense_publisher_id": "ca-pub-1234567890",
            "adsense_slot_id": "9876543210",
        }))
        .await
        .assert_status_ok();

    let job = test_utils::create_job(
        &server,
        json!({ "title": "Vaga", "source_url": "javascript:alert(document.cookie)" }),
    )
    .await;

    let response = server.get(job["tracking_url"].as_str().unwrap()).await;
    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert!(!response.text().contains("continueToContent"));

    Ok(())
}

#[tokio::test]
async fn test_half_configured_ads_still_redirect() -> Result<()> {
    let (server, db) = create_test_server();

    test_utils::set_config_raw(&mut db.lock().unwrap(), "adsense_publisher_id", "ca-pub-1");

    let news = test_utils::create_news(
        &server,
        json!({ "title": "Noticia", "source_url": "https://news.example.com/n" }),
    )
    .await;

    let response = server
        .get(news["tracking_url"].as_str().unwrap())
        .await;
    response.assert_status(StatusCode::TEMPORARY_REDIRECT);

    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");

    Ok(())
}
