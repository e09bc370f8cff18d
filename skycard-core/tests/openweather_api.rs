//! Integration tests for the OpenWeatherMap client using wiremock.
//!
//! These verify the wire contract: request shape (path, query parameters),
//! decoding of the current-weather payload, and the failure taxonomy for
//! non-2xx statuses and malformed bodies.

use skycard_core::{FetchError, OpenWeatherProvider, WeatherProvider};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// The payload shape the widget depends on, with the values from the
/// Vienna example scenario.
fn vienna_response() -> serde_json::Value {
    serde_json::json!({
        "name": "Vienna",
        "dt": 1_700_000_000,
        "sys": { "country": "AT" },
        "weather": [ { "main": "Clear", "description": "clear sky" } ],
        "main": { "temp": 20.7, "feels_like": 19.9, "humidity": 40 },
        "visibility": 10_000,
        "wind": { "speed": 3.1 }
    })
}

fn client_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url("TEST_KEY".to_string(), server.uri())
}

#[tokio::test]
async fn one_request_per_lookup_with_query_embedded_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Vienna"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vienna_response()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server)
        .fetch_current("Vienna")
        .await
        .expect("lookup should succeed");

    assert_eq!(snapshot.title(), "Vienna, AT");
    assert_eq!(snapshot.condition, "Clear");
    assert_eq!(snapshot.description, "clear sky");
    assert_eq!(snapshot.temperature_deg(), 20);
    assert_eq!(snapshot.feels_like_deg(), 19);
    assert_eq!(snapshot.humidity_pct, 40);
    assert_eq!(snapshot.wind_speed_mps, 3.1);
    assert_eq!(snapshot.visibility_km(), 10.0);
}

#[tokio::test]
async fn free_text_locations_are_not_normalized() {
    let server = MockServer::start().await;

    // Whatever the user typed goes out verbatim, spaces and commas included.
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "  rio de janeiro,BR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vienna_response()))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .fetch_current("  rio de janeiro,BR")
        .await
        .expect("lookup should succeed");
}

#[tokio::test]
async fn non_success_status_is_a_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_current("Nowhereville")
        .await
        .expect_err("404 must fail");

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_current("Vienna")
        .await
        .expect_err("garbage body must fail");

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn empty_condition_list_is_malformed() {
    let server = MockServer::start().await;

    let mut body = vienna_response();
    body["weather"] = serde_json::json!([]);

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_current("Vienna")
        .await
        .expect_err("empty weather array must fail");

    assert!(matches!(err, FetchError::Malformed(_)));
}
