//! Data models for the continent search service
//!
//! This module defines the upstream payloads consumed from the country and
//! weather APIs, the projected result items, the persisted history record,
//! and the JSON views returned to the client.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Placeholder for a missing capital or population
pub const NOT_APPLICABLE: &str = "N/A";

/// Placeholder for a country without a common name
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// The closed set of continents a user can search
///
/// These are the regions understood by the REST Countries `/region` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continent {
    Africa,
    Americas,
    Antarctic,
    Asia,
    Europe,
    Oceania,
}

impl Continent {
    pub const ALL: [Continent; 6] = [
        Continent::Africa,
        Continent::Americas,
        Continent::Antarctic,
        Continent::Asia,
        Continent::Europe,
        Continent::Oceania,
    ];

    /// Display name, stored in history records
    pub fn name(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Americas => "Americas",
            Continent::Antarctic => "Antarctic",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Oceania => "Oceania",
        }
    }

    /// Lowercase token expected by the country directory
    pub fn region_token(self) -> String {
        self.name().to_lowercase()
    }

    /// Validates a submitted selection against the allowed set.
    ///
    /// Matching ignores case and surrounding whitespace.
    pub fn parse(input: Option<&str>) -> Result<Self, ValidationError> {
        let raw = input.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(ValidationError::Missing);
        }

        Continent::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(raw))
            .ok_or_else(|| ValidationError::InvalidChoice(raw.to_string()))
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Upstream payloads
// ============================================================================

/// One country as returned by `GET /region/{region}`
///
/// Every field is optional and decoded on its own: a field of the wrong type
/// becomes `None` instead of failing the record, so the projection in
/// `search` can fall back to its placeholder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<CountryName>,

    #[serde(default, deserialize_with = "lenient")]
    pub capital: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub population: Option<u64>,

    #[serde(default, rename = "capitalInfo", deserialize_with = "lenient")]
    pub capital_info: Option<CapitalInfo>,

    #[serde(default, deserialize_with = "lenient")]
    pub latlng: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryName {
    #[serde(default, deserialize_with = "lenient")]
    pub common: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapitalInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub latlng: Option<Vec<f64>>,
}

/// Decodes a field, turning a value of the wrong shape into `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Current weather for a capital
///
/// Present whenever the weather API answered 200, even if one of the two
/// fields was missing from its body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in degrees Celsius
    pub temp: Option<f64>,
    pub description: Option<String>,
}

// ============================================================================
// Projected results and history
// ============================================================================

/// Population as reported upstream, or unknown
///
/// Serialized as a plain number, or as `"N/A"` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    Count(u64),
    Unknown,
}

impl From<Option<u64>> for Population {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Population::Unknown, Population::Count)
    }
}

impl Serialize for Population {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Population::Count(n) => serializer.serialize_u64(*n),
            Population::Unknown => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Population {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u64),
            Marker(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(Population::Count(n)),
            Repr::Marker(marker) if marker == NOT_APPLICABLE => Ok(Population::Unknown),
            Repr::Marker(other) => Err(de::Error::custom(format!(
                "expected a population count or \"{}\", got \"{}\"",
                NOT_APPLICABLE, other
            ))),
        }
    }
}

/// One sampled country, ready for display and storage
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub country: String,

    /// Capital name, or `"N/A"`
    pub capital: String,

    pub population: Population,

    /// `[lat, lng]` of the capital, falling back to the country centroid
    pub latlng: Option<[f64; 2]>,

    pub weather: Option<WeatherSnapshot>,
}

/// A persisted snapshot of one completed search
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchHistoryRecord {
    /// Continent display name, e.g. "Europe"
    pub continent: String,

    pub searched_at: DateTime<Utc>,

    /// Results in sampling order
    pub results: Vec<ResultItem>,
}

// ============================================================================
// Requests and views
// ============================================================================

/// Submitted search form (`application/x-www-form-urlencoded`)
///
/// The field is optional so a missing selection reaches validation instead
/// of being rejected by the extractor.
#[derive(Deserialize, Debug, Default)]
pub struct SearchForm {
    pub continent: Option<String>,
}

/// The form page, optionally carrying an upstream error or field errors
///
/// # Example
/// ```json
/// {
///   "continents": ["Africa", "Americas", "Antarctic", "Asia", "Europe", "Oceania"],
///   "error": "Failed to fetch countries data.",
///   "errors": {}
/// }
/// ```
#[derive(Serialize, Debug)]
pub struct FormView {
    pub continents: Vec<&'static str>,
    pub error: Option<String>,
    pub errors: BTreeMap<&'static str, Vec<String>>,
}

impl FormView {
    pub fn empty() -> Self {
        Self {
            continents: Continent::ALL.iter().map(|c| c.name()).collect(),
            error: None,
            errors: BTreeMap::new(),
        }
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::empty()
        }
    }

    pub fn with_field_error(field: &'static str, message: impl Into<String>) -> Self {
        let mut view = Self::empty();
        view.errors.insert(field, vec![message.into()]);
        view
    }
}

/// The results page after a successful search
#[derive(Serialize, Debug)]
pub struct ResultsView {
    pub continent: String,
    pub results: Vec<ResultItem>,
}

/// The history page
#[derive(Serialize, Debug)]
pub struct HistoryView {
    pub searches: Vec<SearchHistoryRecord>,
}
