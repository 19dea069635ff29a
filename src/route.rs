//! Route definitions for the continent search service

use axum::routing::get;
use axum::Router;

use crate::database::AppState;
use crate::handler::{history, show_form, submit_search};

/// Creates the Axum application router
///
/// # Route Definitions
///
/// - `GET /` - Search form
/// - `POST /` - Submit a continent search
/// - `GET /history` - Most recent searches
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use std::time::Duration;
/// # use geoweather::countries::RestCountriesClient;
/// # use geoweather::database::{AppState, RedbHistoryStore};
/// # use geoweather::route::create_app;
/// # use geoweather::sampling::ThreadRngSampler;
/// let state = AppState {
///     countries: Arc::new(
///         RestCountriesClient::new("https://restcountries.com/v3.1", Duration::from_secs(10)).unwrap(),
///     ),
///     weather: None,
///     history: Arc::new(RedbHistoryStore::open("history.db").unwrap()),
///     sampler: Arc::new(ThreadRngSampler),
/// };
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_search))
        .route("/history", get(history))
        .with_state(state)
}
