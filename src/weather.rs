//! Current-weather client (OpenWeatherMap)
//!
//! API documentation: https://openweathermap.org/current
//! Only `main.temp` and `weather[0].description` are read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::WeatherError;
use crate::model::WeatherSnapshot;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current weather for a city, looked up by name.
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    main: Option<MainBlock>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    #[serde(default)]
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    #[serde(default)]
    description: Option<String>,
}

impl From<CurrentWeatherResponse> for WeatherSnapshot {
    fn from(body: CurrentWeatherResponse) -> Self {
        WeatherSnapshot {
            temp: body.main.and_then(|m| m.temp),
            description: body.weather.into_iter().next().and_then(|w| w.description),
        }
    }
}

/// HTTP client for the OpenWeatherMap current-weather endpoint
pub struct OpenWeatherClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(WeatherError::Transport)?;

        // Anything but a plain 200 counts as no weather, including other 2xx codes.
        if response.status() != StatusCode::OK {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: CurrentWeatherResponse =
            response.json().await.map_err(WeatherError::Decode)?;
        Ok(body.into())
    }
}
