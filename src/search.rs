//! The continent search pipeline
//!
//! validate → fetch countries → sample → enrich with weather → persist.
//! Only the country lookup can fail the request. Weather and history errors
//! are logged and dropped here so the caller always gets something to render.

use chrono::Utc;

use crate::database::{AppState, HistoryStore};
use crate::error::SearchError;
use crate::model::{
    Continent, CountryRecord, ResultItem, SearchHistoryRecord, NOT_APPLICABLE, UNKNOWN_COUNTRY,
};
use crate::sampling::{self, SAMPLE_SIZE};
use crate::weather::WeatherProvider;

/// Runs a search for one continent and returns the enriched sample.
///
/// This function:
/// 1. Fetches every country of the continent from the country directory
/// 2. Samples up to `SAMPLE_SIZE` of them
/// 3. Projects each one and looks up its capital's weather, one at a time
/// 4. Saves the search to the history store (best-effort)
///
/// # Arguments
///
/// * `state` - Shared state holding the upstream clients, store and sampler
/// * `continent` - The validated selection
///
/// # Returns
///
/// * `Ok(results)` - `min(5, N)` items in sampling order
/// * `Err(SearchError)` - lookup failed or returned no countries; nothing was saved
pub async fn search_continent(
    state: &AppState,
    continent: Continent,
) -> Result<Vec<ResultItem>, SearchError> {
    let region = continent.region_token();

    // Fetch the full list for the region
    let countries = state.countries.fetch_countries(&region).await?;
    if countries.is_empty() {
        return Err(SearchError::NoCountries);
    }
    tracing::debug!(%region, total = countries.len(), "countries fetched");

    // Pick the countries to show, in sample order
    let sample = sampling::sample(state.sampler.as_ref(), &countries, SAMPLE_SIZE);

    // Enrich sequentially; each item's weather lookup stands alone
    let mut results = Vec::with_capacity(sample.len());
    for country in &sample {
        results.push(enrich(project_country(country), state.weather.as_deref()).await);
    }

    save_history(state.history.as_ref(), continent, &results);
    Ok(results)
}

/// Derives the display fields of a country, without weather.
///
/// Missing fields become placeholders: `"Unknown"` for the name, `"N/A"` for
/// capital and population. Coordinates prefer the capital's pair, then the
/// country's, then none.
pub fn project_country(country: &CountryRecord) -> ResultItem {
    let name = country
        .name
        .as_ref()
        .and_then(|n| n.common.clone())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

    let capital = country
        .capital
        .as_ref()
        .and_then(|list| list.first().cloned())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());

    let capital_latlng = country
        .capital_info
        .as_ref()
        .and_then(|info| info.latlng.as_deref())
        .and_then(as_pair);

    ResultItem {
        country: name,
        capital,
        population: country.population.into(),
        latlng: capital_latlng.or_else(|| country.latlng.as_deref().and_then(as_pair)),
        weather: None,
    }
}

fn as_pair(coords: &[f64]) -> Option<[f64; 2]> {
    match coords {
        [lat, lng, ..] => Some([*lat, *lng]),
        _ => None,
    }
}

/// Attaches current weather for the item's capital, if one can be looked up.
///
/// A failed lookup leaves `weather` empty and only affects this item.
pub async fn enrich(mut item: ResultItem, weather: Option<&dyn WeatherProvider>) -> ResultItem {
    let Some(provider) = weather else {
        return item;
    };
    if item.capital == NOT_APPLICABLE {
        return item;
    }

    match provider.current_weather(&item.capital).await {
        Ok(snapshot) => item.weather = Some(snapshot),
        Err(err) => {
            tracing::warn!(capital = %item.capital, error = %err, "weather lookup failed");
        }
    }
    item
}

/// Saves a completed search, best-effort.
///
/// # Arguments
///
/// * `store` - History store to write to
/// * `continent` - The searched continent, stored by display name
/// * `results` - The items shown to the user, in the same order
///
/// # Database Operations
///
/// One insert stamped with the current UTC time. Errors are logged, never returned.
pub fn save_history(store: &dyn HistoryStore, continent: Continent, results: &[ResultItem]) {
    let record = SearchHistoryRecord {
        continent: continent.name().to_string(),
        searched_at: Utc::now(),
        results: results.to_vec(),
    };

    // The results are already computed; a lost history entry must not cost the user them.
    if let Err(err) = store.insert(&record) {
        tracing::warn!(error = %err, continent = %continent, "failed to save search history");
    }
}

/// Newest-first history, or an empty list if the store cannot be read.
///
/// # Returns
///
/// At most `limit` records; the history page always gets a list.
pub fn list_recent_history(store: &dyn HistoryStore, limit: usize) -> Vec<SearchHistoryRecord> {
    match store.recent(limit) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read search history");
            Vec::new()
        }
    }
}
