//! Integration tests for `SnoothClient` against wiremock HTTP mocks.
//!
//! The client is blocking, so each call runs inside `spawn_blocking` while the
//! mock server lives on the tokio runtime.

use std::time::Duration;

use snooth_client::{
    Credentials, RateMethod, RateWineParams, Session, SnoothClient, SnoothError,
    StoreSearchParams, WineSearchParams,
};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> Session {
    Session::new("test-key").with_credentials("alice", "pw")
}

/// Build a client for `base_url` and run `f` with it on a blocking thread.
async fn with_client<T, F>(session: Session, base_url: String, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&SnoothClient) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = SnoothClient::with_base_url(session, &base_url)
            .expect("client construction should not fail");
        f(&client)
    })
    .await
    .expect("blocking task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn wine_search_returns_typed_wines() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "meta": {"errmsg": "", "results": 2, "returned": 2},
        "wines": [
            {
                "code": "ridge-monte-bello-2012",
                "name": "Ridge Monte Bello",
                "winery": "Ridge Vineyards",
                "winery_id": "ridge-vineyards",
                "vintage": "2012",
                "price": "159.99",
                "available": 1
            },
            {"code": "plain-red", "available": 0}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/wines/"))
        .and(query_param("akey", "test-key"))
        .and(query_param("q", "monte bello"))
        .and(query_param("f", "11"))
        .and(query_param("n", "10"))
        .and(query_param("a", "0"))
        .and(query_param("u", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let wines = with_client(session(), server.uri(), |client| {
        client.search_wines(&WineSearchParams {
            query: "monte bello".into(),
            ..Default::default()
        })
    })
    .await
    .expect("should parse wines");

    assert_eq!(wines.len(), 2);
    assert_eq!(wines[0].name, "Ridge Monte Bello");
    assert!(wines[0].available);
    assert_eq!(wines[0].credentials.username.as_deref(), Some("alice"));
    assert!(!wines[1].available);
    assert_eq!(wines[1].winery, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn http_500_is_bad_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wines/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = with_client(session(), server.uri(), |client| {
        client.wine_search(&WineSearchParams::default())
    })
    .await
    .unwrap_err();

    assert!(matches!(err, SnoothError::BadQueryParams), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn other_http_failures_are_generic() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = with_client(session(), server.uri(), |client| client.winery_detail("x", None))
        .await
        .unwrap_err();

    assert!(matches!(err, SnoothError::Http { status: 403, .. }), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_key_maps_to_authentication_error() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "meta": {"errmsg": "authentication key is wrong", "results": 0}
    });
    Mock::given(method("GET"))
        .and(path("/stores/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let err = with_client(Session::new("bogus"), server.uri(), |client| {
        client.store_search(&StoreSearchParams {
            country: Some("US".into()),
            zipcode: Some("94110".into()),
            ..Default::default()
        })
    })
    .await
    .unwrap_err();

    assert!(matches!(err, SnoothError::Authentication { .. }), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn no_matches_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stores/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"meta": {"errmsg": "", "results": 0}})),
        )
        .mount(&server)
        .await;

    let stores = with_client(session(), server.uri(), |client| {
        client.search_stores(&StoreSearchParams {
            lat: Some(37.75),
            lng: Some(-122.42),
            ..Default::default()
        })
    })
    .await
    .expect("zero results should not fail");

    assert!(stores.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn lone_coordinate_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = with_client(session(), server.uri(), |client| {
        client.store_search(&StoreSearchParams {
            lat: Some(37.75),
            ..Default::default()
        })
    })
    .await
    .unwrap_err();

    assert!(matches!(err, SnoothError::Validation { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/winery/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"meta": {"errmsg": ""}, "winery": {}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let session = session().with_timeout(Duration::from_millis(200));
    let err = with_client(session, server.uri(), |client| client.winery_detail("slow", None))
        .await
        .unwrap_err();

    assert!(matches!(err, SnoothError::Timeout), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn rating_update_is_sent_as_put() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/rate/"))
        .and(query_param("id", "ridge-monte-bello-2012"))
        .and(query_param("u", "bob"))
        .and(query_param("p", "b-pw"))
        .and(query_param("r", "5"))
        .and(query_param("v", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"meta": {"errmsg": "", "status": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let envelope = with_client(session(), server.uri(), |client| {
        client.rate_wine(
            "ridge-monte-bello-2012",
            &RateWineParams {
                method: RateMethod::Update,
                credentials: Some(Credentials::new("bob", "b-pw")),
                rating: Some(5),
                ..Default::default()
            },
        )
    })
    .await
    .expect("rating should succeed");

    assert_eq!(envelope.meta.status, Some(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn wishlist_posts_account_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wishlist/"))
        .and(query_param("id", "plain-red"))
        .and(query_param("username", "alice"))
        .and(query_param("password", "pw"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"meta": {"errmsg": "", "status": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    with_client(session(), server.uri(), |client| client.wishlist("plain-red", None, None))
        .await
        .expect("wishlist should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn detail_without_payload_is_schema_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/"))
        .and(query_param("reviews", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"meta": {"errmsg": "", "results": 1}})),
        )
        .mount(&server)
        .await;

    let err = with_client(session(), server.uri(), |client| {
        client.store_detail("17", &Default::default())
    })
    .await
    .unwrap_err();

    assert!(matches!(err, SnoothError::Schema { .. }), "got {err:?}");
}
