use metafetch_core::normalize::normalize;
use metafetch_core::SourceId;
use metafetch_engine::{
    search, DoubanClient, FailureKind, FetchSettings, GoogleBooksClient, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn google_client(server: &MockServer) -> GoogleBooksClient {
    GoogleBooksClient {
        base_url: server.uri(),
        jsonp_callback: None,
    }
}

fn douban_client(server: &MockServer, api_key: Option<&str>) -> DoubanClient {
    DoubanClient {
        base_url: server.uri(),
        api_key: api_key.map(str::to_string),
        ..DoubanClient::default()
    }
}

#[tokio::test]
async fn google_search_returns_volumes_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "dune messiah"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"kind":"books#volumes","items":[
                {"id":"a","volumeInfo":{"title":"Dune Messiah","averageRating":4}},
                {"id":"b","volumeInfo":{"title":"Dune"}}]}"#,
            "application/json; charset=UTF-8",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let records = search(&google_client(&server), &fetcher, " dune   messiah")
        .await
        .expect("search ok");

    let books: Vec<_> = records.iter().map(normalize).collect();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, "Dune Messiah");
    assert_eq!(books[0].source, SourceId::Google);
    assert_eq!(books[0].rating, 4.0);
    assert_eq!(books[1].url, "https://books.google.com/books?id=b");
}

#[tokio::test]
async fn google_jsonp_with_comment_prefix_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("callback", "cb"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "// API callback\ncb({\"items\":[{\"id\":\"a\",\"volumeInfo\":{\"title\":\"Dune\"}}]});",
            "text/javascript; charset=UTF-8",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = GoogleBooksClient {
        jsonp_callback: Some("cb".to_string()),
        ..google_client(&server)
    };
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let records = search(&client, &fetcher, "dune").await.expect("search ok");

    assert_eq!(records.len(), 1);
    assert_eq!(normalize(&records[0]).title, "Dune");
}

#[tokio::test]
async fn google_without_items_is_zero_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"kind":"books#volumes","totalItems":0}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let records = search(&google_client(&server), &fetcher, "zzzz").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn douban_search_sends_key_and_accepts_jsonp() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/book/search"))
        .and(query_param("apikey", "k3y"))
        .and(query_param("q", "沙丘"))
        .and(query_param("fields", "all"))
        .and(query_param("count", "10"))
        .and(query_param("callback", "cb"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"cb({"count":1,"books":[{"id":"1","title":"沙丘","rating":{"average":"8.6"},
                "pubdate":"2017-2","tags":[{"title":"科幻"}]}]});"#,
            "text/javascript; charset=utf-8",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = DoubanClient {
        jsonp_callback: Some("cb".to_string()),
        ..douban_client(&server, Some("k3y"))
    };
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let records = search(&client, &fetcher, "沙丘").await.expect("search ok");

    assert_eq!(records.len(), 1);
    let book = normalize(&records[0]);
    assert_eq!(book.title, "沙丘");
    assert_eq!(book.rating, 4.3);
    assert_eq!(book.published_date, "2017-02-01");
    assert_eq!(book.url, "https://book.douban.com/subject/1");
}

#[tokio::test]
async fn douban_without_key_omits_apikey() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/book/search"))
        .and(query_param_is_missing("apikey"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"books":[]}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let records = search(&douban_client(&server, None), &fetcher, "dune")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn douban_gbk_body_is_decoded() {
    let server = MockServer::start().await;
    let (body, _, _) = encoding_rs::GBK.encode(r#"{"books":[{"id":"9","title":"三体"}]}"#);
    Mock::given(method("GET"))
        .and(path("/v2/book/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.into_owned(), "application/json; charset=gbk"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let records = search(&douban_client(&server, None), &fetcher, "三体")
        .await
        .unwrap();
    assert_eq!(normalize(&records[0]).title, "三体");
}

#[tokio::test]
async fn douban_server_error_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/book/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = search(&douban_client(&server, Some("k")), &fetcher, "dune")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn garbage_body_is_invalid_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "text/plain"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = search(&google_client(&server), &fetcher, "dune")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidPayload);
}
