//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Opens the history store and builds the upstream clients
//! - Starts the HTTP server with graceful shutdown support

use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use geoweather::config::Config;
use geoweather::countries::RestCountriesClient;
use geoweather::database::{AppState, HistoryStore, RedbHistoryStore, UnavailableHistoryStore};
use geoweather::route::create_app;
use geoweather::sampling::ThreadRngSampler;
use geoweather::weather::{OpenWeatherClient, WeatherProvider};

/// Application entry point
///
/// 1. Loads environment variables from .env file
/// 2. Reads configuration (see `config` for the variables)
/// 3. Opens the history database, falling back to an unavailable store
/// 4. Builds the country and weather clients
/// 5. Starts the HTTP server with graceful shutdown handling
#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("geoweather=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    // Searches keep working without a database; they just aren't remembered.
    let history: Arc<dyn HistoryStore> = match RedbHistoryStore::open(&config.history_db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!(
                path = %config.history_db_path,
                error = %err,
                "failed to open history database, history is disabled"
            );
            Arc::new(UnavailableHistoryStore::new(err.to_string()))
        }
    };

    let countries = RestCountriesClient::new(&config.countries_api_base, config.upstream_timeout)
        .expect("Failed to build country directory client");

    let weather: Option<Arc<dyn WeatherProvider>> = match &config.weather_api_key {
        Some(key) => Some(Arc::new(
            OpenWeatherClient::new(&config.weather_api_url, key, config.upstream_timeout)
                .expect("Failed to build weather client"),
        )),
        None => {
            tracing::info!("OPENWEATHERMAP_API_KEY not set, weather lookups disabled");
            None
        }
    };

    let state = AppState {
        countries: Arc::new(countries),
        weather,
        history,
        sampler: Arc::new(ThreadRngSampler),
    };

    let app = create_app(state.clone()).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(port = config.port, "server running at http://localhost:{}", config.port);
    tracing::info!(path = %config.history_db_path, "using history database");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The router has been dropped by now; releasing the last handle closes the database.
    drop(state);
    tracing::info!("history store closed");
}

/// Handles graceful shutdown signals
///
/// Returns when SIGINT (Ctrl+C) or, on Unix, SIGTERM is received. In-flight
/// requests are allowed to finish so no history write is cut off midway.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, stopping server");
}
