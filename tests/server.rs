//! End-to-end tests over a real listener.

use axum::http::StatusCode;
use pathwise::{site, App, AppConfig, Context};

mod common;

fn config(cache_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.app.name = "Test Site".into();
    config.app.url = "http://localhost:8080/".into();
    config.cache.dir = cache_dir.display().to_string();
    config
}

#[tokio::test]
async fn test_reference_site() {
    let cache_dir = tempfile::tempdir().unwrap();
    let server = common::start_server(site::build(config(cache_dir.path())).unwrap()).await;
    let client = common::client();

    let res = client.get(server.url("/user/alice/?tab=posts")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body = res.text().await.unwrap();
    assert!(body.contains("<h1>alice</h1>"));
    assert!(body.contains("Showing posts"));
    assert!(body.contains("href=\"http://localhost:8080/\""));
    assert!(body.contains("<title>alice | Test Site</title>"));

    let res = client
        .get(server.url("/user/alice/?tab=%3Cscript%3E"))
        .send()
        .await
        .unwrap();
    let body = res.text().await.unwrap();
    assert!(body.contains("Showing &lt;script&gt;"));
    assert!(!body.contains("<script>"));

    let res = client.get(server.url("/ABOUT")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/nowhere")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.text().await.unwrap().contains("<h1>Not Found</h1>"));

    server.stop().await;
}

#[tokio::test]
async fn test_home_page_is_cached() {
    let cache_dir = tempfile::tempdir().unwrap();
    let server = common::start_server(site::build(config(cache_dir.path())).unwrap()).await;
    let client = common::client();

    let first = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = first.text().await.unwrap();
    assert!(cache_dir.path().join("home.cache").exists());

    let second = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
    assert_eq!(first, second);

    server.stop().await;
}

#[tokio::test]
async fn test_custom_app_with_form_post() {
    let cache_dir = tempfile::tempdir().unwrap();
    let mut app = App::new(config(cache_dir.path()));
    app.map("/login/?", |ctx: &Context<'_>| {
        if !ctx.is_post() {
            return (StatusCode::METHOD_NOT_ALLOWED, String::new());
        }
        let user = ctx.request_var("user").unwrap_or("anonymous");
        (StatusCode::OK, format!("welcome {}", user))
    });

    let server = common::start_server(app).await;
    let client = common::client();

    let res = client
        .post(server.url("/login"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("user=dana&remember=1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "welcome dana");

    // Query variables shadow the body entirely.
    let res = client
        .post(server.url("/login?source=link"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("user=dana")
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "welcome anonymous");

    let res = client.get(server.url("/login/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = client.get(server.url("/elsewhere")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), pathwise::app::NOT_FOUND_BODY);

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let cache_dir = tempfile::tempdir().unwrap();
    let mut config = config(cache_dir.path());
    config.limits.max_body_size = 16;

    let mut app = App::new(config);
    app.map("/upload", |_ctx: &Context<'_>| "ok");
    let server = common::start_server(app).await;

    let res = common::client()
        .post(server.url("/upload"))
        .body("x".repeat(1024))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    server.stop().await;
}
