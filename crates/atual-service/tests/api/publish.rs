use crate::common::{server_utils::create_test_server, test_utils};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_publish_creates_one_pending_row_per_active_group() -> Result<()> {
    let (server, db) = create_test_server();

    let active_a = test_utils::create_group(&server, "Vagas SP", "sp", true).await;
    let inactive = test_utils::create_group(&server, "Vagas RJ", "rj", false).await;
    let active_b = test_utils::create_group(&server, "Vagas MG", "mg", true).await;

    let job = test_utils::create_job(
        &server,
        json!({
            "title": "Desenvolvedor Rust",
            "source_url": "https://jobs.example.com/rust",
        }),
    )
    .await;

    let response = server
        .post("/api/publish")
        .json(&json!({
            "content_type": "job",
            "content_id": job["id"],
            "group_ids": [active_a, inactive, active_b, 9999],
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["publications_created"], json!(2));

    let statuses = test_utils::publication_statuses(&mut db.lock().unwrap());
    assert_eq!(statuses, vec!["pending", "pending"]);

    let body: Value = server
        .get(&format!("/api/jobs/{}", job["id"]))
        .await
        .json();
    assert_eq!(body["data"]["is_published"], json!(true));
    assert!(body["data"]["published_at"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_publication_message_uses_tracking_url() -> Result<()> {
    let (server, _db) = create_test_server();

    let group = test_utils::create_group(&server, "Noticias", "news", true).await;
    let news = test_utils::create_news(
        &server,
        json!({
            "title": "Economia cresce",
            "summary": "Resumo da noticia",
            "source_url": "https://news.example.com/economia",
            "source_name": "G1",
        }),
    )
    .await;

    server
        .post("/api/publish")
        .json(&json!({
            "content_type": "news",
            "content_id": news["id"],
            "group_ids": [group],
        }))
        .await
        .assert_status_ok();

    let body: Value = server.get("/api/publications").await.json();
    let entries = body["data"]["publications"].as_array().unwrap();
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry["content_type"], json!("news"));
    assert_eq!(entry["content_title"], json!("Economia cresce"));
    assert_eq!(entry["group_name"], json!("Noticias"));
    assert_eq!(entry["platform"], json!("whatsapp"));

    let message = entry["message_content"].as_str().unwrap();
    assert!(message.starts_with("📰 *NOTÍCIA MUNDIAL*"));
    assert!(message.contains("🏢 Fonte: G1"));
    assert!(message.ends_with(news["tracking_url"].as_str().unwrap()));

    Ok(())
}

#[tokio::test]
async fn test_publish_validation() -> Result<()> {
    let (server, _db) = create_test_server();

    let group = test_utils::create_group(&server, "Grupo", "g", true).await;
    let job = test_utils::create_job(&server, json!({ "title": "Vaga" })).await;

    let cases = [
        (
            json!({ "content_id": job["id"], "group_ids": [group] }),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({ "content_type": "job", "content_id": job["id"], "group_ids": [] }),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({ "content_type": "video", "content_id": job["id"], "group_ids": [group] }),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({ "content_type": "job", "group_ids": [group] }),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({ "content_type": "news", "content_id": 404, "group_ids": [group] }),
            StatusCode::NOT_FOUND,
        ),
    ];

    for (payload, expected) in cases {
        let response = server.post("/api/publish").json(&payload).await;
        response.assert_status(expected);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    Ok(())
}

#[tokio::test]
async fn test_duplicate_group_ids_publish_once() -> Result<()> {
    let (server, _db) = create_test_server();

    let group = test_utils::create_group(&server, "Grupo", "g", true).await;
    let job = test_utils::create_job(&server, json!({ "title": "Vaga" })).await;

    let body: Value = server
        .post("/api/publish")
        .json(&json!({
            "content_type": "job",
            "content_id": job["id"],
            "group_ids": [group, group],
        }))
        .await
        .json();
    assert_eq!(body["data"]["publications_created"], json!(1));

    Ok(())
}

#[tokio::test]
async fn test_worker_reports_outcome() -> Result<()> {
    let (server, _db) = create_test_server();

    let group = test_utils::create_group(&server, "Grupo", "g", true).await;
    let job = test_utils::create_job(&server, json!({ "title": "Vaga" })).await;
    server
        .post("/api/publish")
        .json(&json!({
            "content_type": "job",
            "content_id": job["id"],
            "group_ids": [group],
        }))
        .await
        .assert_status_ok();

    let body: Value = server.get("/api/publications?status=pending").await.json();
    let id = body["data"]["publications"][0]["id"].as_i64().unwrap();

    let response = server
        .patch(&format!("/api/publications/{id}"))
        .json(&json!({ "status": "sent", "platform_message_id": "wamid.1" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], json!("sent"));
    assert_eq!(body["data"]["platform_message_id"], json!("wamid.1"));
    assert!(body["data"]["sent_at"].is_string());

    let body: Value = server.get("/api/publications?status=pending").await.json();
    assert_eq!(body["data"]["pagination"]["total"], json!(0));
    let body: Value = server.get("/api/publications?status=sent").await.json();
    assert_eq!(body["data"]["pagination"]["total"], json!(1));

    server
        .patch(&format!("/api/publications/{id}"))
        .json(&json!({ "status": "delivered" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .patch("/api/publications/9999")
        .json(&json!({ "status": "failed" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/publications?status=unknown")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}
