use crate::common::{server_utils::create_test_server, test_utils};
use anyhow::Result;
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::{Value, json};

#[tokio::test]
async fn test_job_with_source_url_gets_one_tracking_record() -> Result<()> {
    let (server, db) = create_test_server();

    let job = test_utils::create_job(
        &server,
        json!({
            "title": "Desenvolvedor Backend",
            "company": "Eco Hub",
            "source_url": "https://jobs.example.com/42",
        }),
    )
    .await;

    let tracking_url = job["tracking_url"].as_str().unwrap();
    assert!(tracking_url.starts_with("/track/"));

    let rows = test_utils::tracking_rows(&mut db.lock().unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tracking_id, test_utils::tracking_token(tracking_url));
    assert_eq!(rows[0].job_post_id, job["id"].as_i64().map(|id| id as i32));
    assert_eq!(rows[0].original_url, "https://jobs.example.com/42");
    assert_eq!(rows[0].click_count, 0);
    assert!(rows[0].clicked_at.is_none());

    Ok(())
}

#[tokio::test]
async fn test_job_without_source_url_is_untracked() -> Result<()> {
    let (server, db) = create_test_server();

    let job = test_utils::create_job(&server, json!({ "title": "Estágio" })).await;

    assert!(job["tracking_url"].is_null());
    assert!(test_utils::tracking_rows(&mut db.lock().unwrap()).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_job_requires_title() -> Result<()> {
    let (server, _db) = create_test_server();

    for payload in [json!({}), json!({ "title": "" })] {
        let response = server.post("/api/jobs").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("title is required"));
    }

    Ok(())
}

#[tokio::test]
async fn test_news_always_tracked_and_tags_returned_as_list() -> Result<()> {
    let (server, db) = create_test_server();

    let news = test_utils::create_news(
        &server,
        json!({
            "title": "Mercado de trabalho aquecido",
            "source_url": "https://news.example.com/mercado",
            "tags": ["economia", "emprego"],
            "original_published_at": "2024-05-01T08:00:00Z",
        }),
    )
    .await;

    assert_eq!(news["tags"], json!(["economia", "emprego"]));
    assert_eq!(news["original_published_at"], json!("2024-05-01T08:00:00"));

    let rows = test_utils::tracking_rows(&mut db.lock().unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].news_post_id, news["id"].as_i64().map(|id| id as i32));
    assert_eq!(
        news["tracking_url"].as_str().map(test_utils::tracking_token),
        Some(rows[0].tracking_id.clone())
    );

    Ok(())
}

#[tokio::test]
async fn test_news_validation() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/news")
        .json(&json!({ "title": "Sem fonte" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], json!("source_url is required"));

    let response = server
        .post("/api/news")
        .json(&json!({
            "title": "Data ruim",
            "source_url": "https://news.example.com/x",
            "original_published_at": "ontem",
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_job_filters_and_newest_first() -> Result<()> {
    let (server, db) = create_test_server();

    let jobs = [
        ("Dev Rust", "São Paulo - SP", 9000.0, "CLT", 1),
        ("Dev Go", "Campinas - SP", 7000.0, "PJ", 2),
        ("Dev Java", "são paulo - SP", 5000.0, "CLT", 3),
        ("Designer", "Recife - PE", 9500.0, "CLT", 4),
    ];

    for (title, location, salary_min, job_type, day) in jobs {
        let job = test_utils::create_job(
            &server,
            json!({
                "title": title,
                "location": location,
                "salary_min": salary_min,
                "job_type": job_type,
            }),
        )
        .await;

        let created_at = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        test_utils::set_job_created_at(
            &mut db.lock().unwrap(),
            job["id"].as_i64().unwrap() as i32,
            created_at,
        );
    }

    let body: Value = server
        .get("/api/jobs?location=paulo&job_type=CLT")
        .await
        .json();
    let titles: Vec<&str> = body["data"]["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dev Java", "Dev Rust"]);
    assert_eq!(body["data"]["pagination"]["total"], json!(2));

    let body: Value = server.get("/api/jobs?salary_min=8000").await.json();
    let titles: Vec<&str> = body["data"]["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Designer", "Dev Rust"]);

    // A zero floor is treated as no filter
    let body: Value = server.get("/api/jobs?salary_min=0").await.json();
    assert_eq!(body["data"]["pagination"]["total"], json!(4));

    Ok(())
}

#[tokio::test]
async fn test_job_pagination() -> Result<()> {
    let (server, _db) = create_test_server();

    for i in 0..5 {
        test_utils::create_job(&server, json!({ "title": format!("Vaga {i}") })).await;
    }

    let body: Value = server.get("/api/jobs?page=2&per_page=2").await.json();
    let pagination = &body["data"]["pagination"];
    assert_eq!(body["data"]["jobs"].as_array().unwrap().len(), 2);
    assert_eq!(pagination["page"], json!(2));
    assert_eq!(pagination["per_page"], json!(2));
    assert_eq!(pagination["total"], json!(5));
    assert_eq!(pagination["pages"], json!(3));
    assert_eq!(pagination["has_next"], json!(true));
    assert_eq!(pagination["has_prev"], json!(true));

    let body: Value = server.get("/api/jobs?per_page=1000").await.json();
    assert_eq!(body["data"]["pagination"]["per_page"], json!(100));

    server
        .get("/api/jobs?page=0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/news?per_page=0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_news_filters() -> Result<()> {
    let (server, _db) = create_test_server();

    let items = [
        ("Bolsa sobe", "economia", "Folha de S.Paulo"),
        ("Chuvas no sul", "clima", "G1"),
        ("Juros caem", "economia", "G1"),
    ];
    for (title, category, source_name) in items {
        test_utils::create_news(
            &server,
            json!({
                "title": title,
                "source_url": format!("https://news.example.com/{category}"),
                "category": category,
                "source_name": source_name,
            }),
        )
        .await;
    }

    let body: Value = server.get("/api/news?category=economia").await.json();
    assert_eq!(body["data"]["news"].as_array().unwrap().len(), 2);

    let body: Value = server.get("/api/news?source=folha").await.json();
    let news = body["data"]["news"].as_array().unwrap();
    assert_eq!(news.len(), 1);
    assert_eq!(news[0]["title"], json!("Bolsa sobe"));

    let body: Value = server
        .get("/api/news?category=economia&source=g1")
        .await
        .json();
    assert_eq!(body["data"]["news"].as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_get_by_id() -> Result<()> {
    let (server, _db) = create_test_server();

    let job = test_utils::create_job(&server, json!({ "title": "Analista" })).await;
    let response = server.get(&format!("/api/jobs/{}", job["id"])).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], json!("Analista"));

    let response = server.get("/api/jobs/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], json!("Job post not found"));

    server
        .get("/api/news/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    Ok(())
}
