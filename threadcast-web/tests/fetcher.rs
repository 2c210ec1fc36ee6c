use threadcast_web::{ArticleFetcher, ArticleSource, FetchError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<!doctype html>
<html><head><title>Ferris ships a release</title></head>
<body><main>
  <p>Version 2.0 of the crab-themed toolkit was released on Tuesday.</p>
  <p>It adds first-class support for structured logging pipelines.</p>
</main></body></html>"#;

#[tokio::test]
async fn fetches_and_extracts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/ferris"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(ARTICLE),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/news/ferris", server.uri());
    let article = ArticleFetcher::new().unwrap().fetch(&url).await.unwrap();

    assert_eq!(article.url, url);
    assert_eq!(article.title, "Ferris ships a release");
    assert!(article.body.starts_with("Version 2.0"));
    assert!(article.body.contains("structured logging"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = ArticleFetcher::new()
        .unwrap()
        .fetch(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn pages_without_text_are_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let err = ArticleFetcher::new()
        .unwrap()
        .fetch(&server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NoContent(_)));
}

#[tokio::test]
async fn unreachable_hosts_are_network_errors() {
    // Port 9 (discard) on localhost is closed in test environments.
    let err = ArticleFetcher::new()
        .unwrap()
        .fetch("http://127.0.0.1:9/article")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}
