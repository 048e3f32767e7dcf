use std::time::Duration;

use metafetch_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use pretty_assertions::assert_eq;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `response` for every GET; the returned server must outlive the fetch.
async fn serve(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

async fn fetch_kind(settings: FetchSettings, response: ResponseTemplate) -> FailureKind {
    let server = serve(response).await;
    let url = format!("{}/books/v1/volumes?q=dune", server.uri());
    ReqwestFetcher::new(settings)
        .fetch(&url)
        .await
        .unwrap_err()
        .kind
}

#[tokio::test]
async fn javascript_body_is_returned_with_its_content_type() {
    let server = serve(
        ResponseTemplate::new(200).set_body_raw("cb({\"total\":0});", "text/javascript; charset=utf-8"),
    )
    .await;
    let url = format!("{}/v2/book/search?q=dune&callback=cb", server.uri());

    let output = ReqwestFetcher::new(FetchSettings::default())
        .fetch(&url)
        .await
        .unwrap();
    assert_eq!(output.bytes, b"cb({\"total\":0});".to_vec());
    assert_eq!(output.content_type.as_deref(), Some("text/javascript; charset=utf-8"));
}

#[tokio::test]
async fn error_status_is_reported() {
    let kind = fetch_kind(FetchSettings::default(), ResponseTemplate::new(403)).await;
    assert_eq!(kind, FailureKind::HttpStatus(403));
}

#[tokio::test]
async fn slow_catalog_times_out() {
    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let response = ResponseTemplate::new(200)
        .set_delay(Duration::from_millis(300))
        .set_body_raw("{}", "application/json");
    assert_eq!(fetch_kind(settings, response).await, FailureKind::Timeout);
}

#[tokio::test]
async fn declared_length_over_limit_is_rejected() {
    let settings = FetchSettings {
        max_bytes: 8,
        ..FetchSettings::default()
    };
    let response = ResponseTemplate::new(200).set_body_raw("{\"items\":[]}", "application/json");
    assert_eq!(
        fetch_kind(settings, response).await,
        FailureKind::TooLarge {
            max_bytes: 8,
            actual: Some(12)
        }
    );
}

#[tokio::test]
async fn html_block_page_is_not_an_api_response() {
    let response = ResponseTemplate::new(200).set_body_raw("<html>captcha</html>", "text/html");
    assert_eq!(
        fetch_kind(FetchSettings::default(), response).await,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
}

#[tokio::test]
async fn unparsable_url_fails_before_any_request() {
    let err = ReqwestFetcher::new(FetchSettings::default())
        .fetch("::not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
