use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use comment_guard::suggest::{CountrySource, LookupError, RestCountriesSource};

/// Serves `app` on an ephemeral port and returns the URL of `/all`.
async fn spawn_countries(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/all", addr)
}

fn source(url: &str) -> RestCountriesSource {
    RestCountriesSource::new(url, Duration::from_millis(100)).expect("Failed to build client")
}

#[tokio::test]
async fn test_names_in_upstream_order() {
    let app = Router::new().route(
        "/all",
        get(|| async {
            (
                [("content-type", "application/json")],
                r#"[
                    {"name": {"common": "Italy", "official": "Italian Republic"}},
                    {"name": {"official": "Nameless"}},
                    {"cca2": "XX"},
                    {"name": {"common": "Iceland"}}
                ]"#,
            )
        }),
    );
    let url = spawn_countries(app).await;

    let names = source(&url).country_names().await.unwrap();
    assert_eq!(names, vec!["Italy", "Iceland"]);
}

#[tokio::test]
async fn test_error_status_is_lookup_failure() {
    let app = Router::new().route("/all", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
    let url = spawn_countries(app).await;

    match source(&url).country_names().await {
        Err(LookupError::Status(status)) => assert_eq!(status, 500),
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_lookup_failure() {
    let app = Router::new().route("/all", get(|| async { "<html>maintenance</html>" }));
    let url = spawn_countries(app).await;

    match source(&url).country_names().await {
        Err(LookupError::Request(e)) => assert!(e.is_decode()),
        other => panic!("Expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let app = Router::new().route(
        "/all",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            "[]"
        }),
    );
    let url = spawn_countries(app).await;

    match source(&url).country_names().await {
        Err(LookupError::Request(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_upstream_is_lookup_failure() {
    // Bind and drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = source(&format!("http://{}/all", addr)).country_names().await;
    assert!(matches!(result, Err(LookupError::Request(_))));
}
