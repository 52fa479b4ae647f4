use std::time::{Duration, Instant};

use kopasti_core::api::{GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
use kopasti_core::{ApiClient, Config, FetchError, QueryParams, Transport};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    let config = Config {
        api_base_url: format!("{}/exec", server.uri()),
        ..Config::default()
    };
    ApiClient::new(&config).expect("client should build")
}

fn member_json(i: usize) -> serde_json::Value {
    json!({
        "id": format!("m{i}"),
        "nama": format!("Anggota {i}"),
        "nomor_induk": 240000 + i,
        "jabatan": "Anggota",
        "satuan_terminal": "Terminal Banjarnegara",
        "angkatan": 2024,
        "average_score": 70.5
    })
}

#[tokio::test]
async fn test_fetch_collection_sends_only_defined_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("angkatan", "2024"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "20"))
        .and(query_param_is_missing("q"))
        .and(query_param_is_missing("satuan_terminal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [member_json(1), member_json(2)],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = QueryParams {
        q: Some(String::new()),
        ..QueryParams::first_page().with_cohort("2024")
    };
    let page = client(&server)
        .fetch_collection(&params, &CancellationToken::new())
        .await
        .expect("collection should load");

    assert_eq!(page.total, 2);
    assert_eq!(page.data[0].id, "m1");
    assert_eq!(page.data[1].member_number, "240002");
    assert_eq!(page.data[1].cohort, "2024");
}

#[tokio::test]
async fn test_non_success_status_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_collection(&QueryParams::first_page(), &CancellationToken::new())
        .await
        .expect_err("503 must fail");

    assert_eq!(
        err,
        FetchError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            status: Some(503),
        }
    );
}

#[tokio::test]
async fn test_error_envelope_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "Sheet sedang diperbarui",
            "statusCode": 423
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_collection(&QueryParams::first_page(), &CancellationToken::new())
        .await
        .expect_err("envelope must fail");

    assert_eq!(
        err,
        FetchError::Application {
            message: "Sheet sedang diperbarui".to_string(),
            status_code: Some(423),
        }
    );
}

#[tokio::test]
async fn test_bare_error_envelope_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": true })))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_collection(&QueryParams::first_page(), &CancellationToken::new())
        .await
        .expect_err("envelope must fail");

    assert_eq!(
        err,
        FetchError::Application {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            status_code: Some(500),
        }
    );
}

#[tokio::test]
async fn test_malformed_body_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_collection(&QueryParams::first_page(), &CancellationToken::new())
        .await
        .expect_err("html must fail");

    assert!(matches!(err, FetchError::Network { status: None, .. }));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let config = Config {
        api_base_url: "http://127.0.0.1:1/exec".to_string(),
        ..Config::default()
    };
    let api = ApiClient::new(&config).expect("client should build");

    let err = api
        .fetch_collection(&QueryParams::first_page(), &CancellationToken::new())
        .await
        .expect_err("refused connection must fail");

    assert_eq!(err, FetchError::unreachable());
}

#[tokio::test]
async fn test_fetch_by_id() {
    let server = MockServer::start().await;
    let mut body = member_json(7);
    body["criteria_list"] = json!([
        { "key": "kepemimpinan", "label": "", "value": 88, "cellRef": "D8" },
        { "key": "kreativitas", "label": "Kreativitas", "value": null, "cellRef": "J8" }
    ]);
    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("id", "m7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let detail = client(&server)
        .fetch_by_id("m7", &CancellationToken::new())
        .await
        .expect("member should load");

    assert_eq!(detail.summary.name, "Anggota 7");
    assert_eq!(detail.criteria.len(), 2);
    assert_eq!(detail.criteria[0].label, "Kepemimpinan");
    assert_eq!(detail.criteria[0].value, Some(88.0));
    assert_eq!(detail.criteria[1].value, None);
}

#[tokio::test]
async fn test_fetch_by_id_not_found_envelopes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("id", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("id", "gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "Anggota dihapus",
            "statusCode": 404
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("id", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "not found"
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let cancel = CancellationToken::new();

    assert_eq!(
        api.fetch_by_id("missing", &cancel).await,
        Err(FetchError::NotFound {
            message: NOT_FOUND_MESSAGE.to_string()
        })
    );
    assert_eq!(
        api.fetch_by_id("gone", &cancel).await,
        Err(FetchError::NotFound {
            message: "Anggota dihapus".to_string()
        })
    );
    assert_eq!(
        api.fetch_by_id("abc", &cancel).await.map_err(|e| e.message()),
        Err("not found".to_string())
    );
}

#[tokio::test]
async fn test_fetch_by_empty_id_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_by_id("", &CancellationToken::new())
        .await
        .expect_err("empty id must fail");
    assert_eq!(err, FetchError::not_found());
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [], "total": 0 }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let api = client(&server);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = api
        .fetch_collection(&QueryParams::first_page(), &cancel)
        .await
        .expect_err("cancelled request must fail");

    assert_eq!(err, FetchError::Aborted);
    assert!(started.elapsed() < Duration::from_secs(2));
}
