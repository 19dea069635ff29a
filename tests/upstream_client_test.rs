//! Tests for the REST Countries and OpenWeatherMap clients
//!
//! Each test starts a small axum server on a random local port that mimics
//! the upstream API, then points the real reqwest client at it.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use geoweather::countries::{CountryDirectory, RestCountriesClient};
use geoweather::error::{FetchError, WeatherError};
use geoweather::weather::{OpenWeatherClient, WeatherProvider};

const TIMEOUT: Duration = Duration::from_secs(10);

/// Serves `app` on an ephemeral port and returns its base URL
async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn region(Path(region): Path<String>) -> impl IntoResponse {
    match region.as_str() {
        "europe" => (
            StatusCode::OK,
            Json(json!([
                {
                    "name": { "common": "Portugal" },
                    "capital": ["Lisbon"],
                    "population": 10305564,
                    "capitalInfo": { "latlng": [38.72, -9.13] },
                    "latlng": [39.5, -8.0]
                },
                { "name": { "common": "Svalbard" } }
            ])),
        ),
        "antarctic" => (StatusCode::OK, Json(json!([]))),
        "broken" => (StatusCode::OK, Json(json!({ "status": 404 }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))),
    }
}

async fn weather(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("appid").map(String::as_str) != Some("test-key")
        || params.get("units").map(String::as_str) != Some("metric")
    {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "cod": 401 })));
    }

    match params.get("q").map(String::as_str) {
        Some("Lisbon") => (
            StatusCode::OK,
            Json(json!({
                "main": { "temp": 18.3 },
                "weather": [{ "main": "Clouds", "description": "scattered clouds" }]
            })),
        ),
        Some("Accepted") => (StatusCode::ACCEPTED, Json(json!({ "main": { "temp": 1.0 } }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "cod": "404", "message": "city not found" }))),
    }
}

async fn countries_client() -> RestCountriesClient {
    let base = spawn_stub(Router::new().route("/region/{region}", get(region))).await;
    RestCountriesClient::new(base, TIMEOUT).unwrap()
}

async fn weather_client(key: &str) -> OpenWeatherClient {
    let base = spawn_stub(Router::new().route("/weather", get(weather))).await;
    OpenWeatherClient::new(format!("{}/weather", base), key, TIMEOUT).unwrap()
}

#[tokio::test]
async fn test_fetch_countries_decodes_records() {
    let client = countries_client().await;

    let countries = client.fetch_countries("europe").await.unwrap();
    assert_eq!(countries.len(), 2);

    let portugal = &countries[0];
    assert_eq!(
        portugal.name.as_ref().and_then(|n| n.common.as_deref()),
        Some("Portugal")
    );
    assert_eq!(portugal.capital.as_deref(), Some(&["Lisbon".to_string()][..]));
    assert_eq!(portugal.population, Some(10305564));

    let svalbard = &countries[1];
    assert!(svalbard.capital.is_none());
    assert!(svalbard.latlng.is_none());
}

#[tokio::test]
async fn test_fetch_countries_empty_list_is_ok() {
    let client = countries_client().await;
    assert!(client.fetch_countries("antarctic").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_countries_non_success_status() {
    let client = countries_client().await;
    let err = client.fetch_countries("atlantis").await.unwrap_err();
    assert!(matches!(err, FetchError::Status(404)));
}

#[tokio::test]
async fn test_fetch_countries_unexpected_body() {
    let client = countries_client().await;
    let err = client.fetch_countries("broken").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_countries_connection_refused() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RestCountriesClient::new(format!("http://{}", addr), TIMEOUT).unwrap();
    let err = client.fetch_countries("europe").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_fetch_countries_timeout() {
    let slow = Router::new().route(
        "/region/{region}",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!([]))
        }),
    );
    let base = spawn_stub(slow).await;

    let client = RestCountriesClient::new(base, Duration::from_millis(200)).unwrap();
    let err = client.fetch_countries("europe").await.unwrap_err();
    match err {
        FetchError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_current_weather_sends_metric_query() {
    let client = weather_client("test-key").await;

    let snapshot = client.current_weather("Lisbon").await.unwrap();
    assert_eq!(snapshot.temp, Some(18.3));
    assert_eq!(snapshot.description.as_deref(), Some("scattered clouds"));
}

#[tokio::test]
async fn test_current_weather_unknown_city() {
    let client = weather_client("test-key").await;
    let err = client.current_weather("Nowhere").await.unwrap_err();
    assert!(matches!(err, WeatherError::Status(404)));
}

#[tokio::test]
async fn test_current_weather_requires_exactly_200() {
    let client = weather_client("test-key").await;
    let err = client.current_weather("Accepted").await.unwrap_err();
    assert!(matches!(err, WeatherError::Status(202)));
}

#[tokio::test]
async fn test_current_weather_bad_key() {
    let client = weather_client("wrong-key").await;
    let err = client.current_weather("Lisbon").await.unwrap_err();
    assert!(matches!(err, WeatherError::Status(401)));
}

#[tokio::test]
async fn test_current_weather_connection_refused() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = OpenWeatherClient::new(format!("http://{}/weather", addr), "test-key", TIMEOUT)
        .unwrap();
    let err = client.current_weather("Lisbon").await.unwrap_err();
    assert!(matches!(err, WeatherError::Transport(_)));
}

#[tokio::test]
async fn test_current_weather_timeout() {
    let slow = Router::new().route(
        "/weather",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "main": { "temp": 1.0 } }))
        }),
    );
    let base = spawn_stub(slow).await;

    let client = OpenWeatherClient::new(
        format!("{}/weather", base),
        "test-key",
        Duration::from_millis(200),
    )
    .unwrap();
    let err = client.current_weather("Lisbon").await.unwrap_err();
    match err {
        WeatherError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected a timeout, got {:?}", other),
    }
}
