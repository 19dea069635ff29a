//! HTTP request handlers for the continent search service
//!
//! This module implements the three views:
//! - The search form (GET /)
//! - Form submission: search, enrich, save, show results (POST /)
//! - The search history (GET /history)
//!
//! Every handler answers with a renderable JSON view; upstream and storage
//! failures never turn into a 5xx.

use axum::{
    extract::{Form, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::database::{AppState, HISTORY_LIMIT};
use crate::model::{Continent, FormView, HistoryView, ResultsView, SearchForm};
use crate::search::{list_recent_history, search_continent};

/// Shows the empty search form
///
/// # Response
///
/// ```json
/// {
///   "continents": ["Africa", "Americas", "Antarctic", "Asia", "Europe", "Oceania"],
///   "error": null,
///   "errors": {}
/// }
/// ```
pub async fn show_form() -> impl IntoResponse {
    Json(FormView::empty())
}

/// Handles a submitted search form
///
/// This handler:
/// 1. Validates the selected continent against the allowed set
/// 2. Fetches the countries of that continent from the country directory
/// 3. Samples up to five of them and looks up weather for each capital
/// 4. Saves the search to the history store (best-effort)
/// 5. Returns the results view
///
/// # Request Body
///
/// `continent=Europe` (`application/x-www-form-urlencoded`)
///
/// # Response
///
/// Always **200 OK**, with one of:
/// - `{continent, results}` - search succeeded
/// - the form view with `error` - country lookup failed or was empty
/// - the form view with `errors.continent` - missing or unknown continent
///
/// # Database Operations
///
/// One insert into `TABLE_HISTORY`, only when the search succeeded. A failed
/// insert is logged and does not change the response.
pub async fn submit_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Response {
    // Reject the form before any network call; the page is re-rendered with the field error
    let continent = match Continent::parse(form.continent.as_deref()) {
        Ok(continent) => continent,
        Err(err) => {
            tracing::debug!(error = %err, "rejected search form");
            return Json(FormView::with_field_error("continent", err.to_string())).into_response();
        }
    };

    // Run the lookup, enrichment and history write
    match search_continent(&state, continent).await {
        Ok(results) => {
            tracing::info!(%continent, count = results.len(), "search completed");
            Json(ResultsView {
                continent: continent.name().to_string(),
                results,
            })
            .into_response()
        }
        Err(err) => {
            // Upstream details stay in the log; the user gets the fixed message
            tracing::warn!(%continent, error = %err, "search failed");
            Json(FormView::with_error(err.user_message())).into_response()
        }
    }
}

/// Lists the most recent searches, newest first
///
/// # Response
///
/// ```json
/// {
///   "searches": [
///     { "continent": "Europe", "searched_at": "2026-01-17T13:40:00Z", "results": [...] }
///   ]
/// }
/// ```
///
/// Always **200 OK**; an unreadable store yields an empty list.
///
/// # Database Operations
///
/// One read transaction over `TABLE_HISTORY`, newest key first, capped at
/// `HISTORY_LIMIT` decodable records.
pub async fn history(State(state): State<AppState>) -> impl IntoResponse {
    Json(HistoryView {
        searches: list_recent_history(state.history.as_ref(), HISTORY_LIMIT),
    })
}
