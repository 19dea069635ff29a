//! Country directory client (REST Countries)
//!
//! API documentation: https://restcountries.com
//! Endpoint used: `GET {base}/region/{region}`

use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::CountryRecord;

#[async_trait]
pub trait CountryDirectory: Send + Sync {
    /// Lists every country in a region, `region` being a lowercase token such as "europe".
    async fn fetch_countries(&self, region: &str) -> Result<Vec<CountryRecord>, FetchError>;
}

/// HTTP client for the REST Countries API
pub struct RestCountriesClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn region_url(&self, region: &str) -> String {
        format!("{}/region/{}", self.base_url, region)
    }
}

#[async_trait]
impl CountryDirectory for RestCountriesClient {
    async fn fetch_countries(&self, region: &str) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.region_url(region);
        tracing::debug!(%url, "fetching countries");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Only a body that is not a JSON array fails the lookup; elements decode one by one

        let elements = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(FetchError::Decode)?;

        Ok(elements.into_iter().map(decode_country).collect())
    }
}

/// Decodes one array element; anything that is not an object becomes an
/// empty record, which projects to the "Unknown" placeholders.
fn decode_country(element: serde_json::Value) -> CountryRecord {
    serde_json::from_value(element).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "unreadable country record, using placeholders");
        CountryRecord::default()
    })
}
