//! Benchmark tests for history storage
//!
//! Run with: cargo test --release -- --nocapture bench

use std::time::Instant;
use tempfile::NamedTempFile;

use geoweather::database::{RedbHistoryStore, HISTORY_LIMIT};
use geoweather::model::{Continent, Population, ResultItem};
use geoweather::search::{list_recent_history, save_history};

/// Benchmark helper to measure execution time
fn benchmark<F>(name: &str, iterations: usize, mut f: F)
where
    F: FnMut(),
{
    let start = Instant::now();

    for _ in 0..iterations {
        f();
    }

    let duration = start.elapsed();
    let avg_ms = duration.as_millis() as f64 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

fn sample_results() -> Vec<ResultItem> {
    (0..5)
        .map(|i| ResultItem {
            country: format!("Country {}", i),
            capital: format!("Capital {}", i),
            population: Population::Count(1_000_000 + i),
            latlng: Some([10.0, 20.0]),
            weather: None,
        })
        .collect()
}

#[test]
#[ignore] // Run explicitly with: cargo test bench --release -- --ignored --nocapture
fn bench_save_history() {
    println!("\n=== Benchmark: Save history ===\n");

    let temp_db = NamedTempFile::new().unwrap();
    let store = RedbHistoryStore::open(temp_db.path().to_str().unwrap()).unwrap();
    let results = sample_results();

    benchmark("Save five-item search", 1000, || {
        save_history(&store, Continent::Europe, &results);
    });
}

#[test]
#[ignore]
fn bench_list_recent_history() {
    println!("\n=== Benchmark: List recent history ===\n");

    let temp_db = NamedTempFile::new().unwrap();
    let store = RedbHistoryStore::open(temp_db.path().to_str().unwrap()).unwrap();
    let results = sample_results();

    for _ in 0..5000 {
        save_history(&store, Continent::Asia, &results);
    }

    benchmark("List newest 20 of 5000", 1000, || {
        let history = list_recent_history(&store, HISTORY_LIMIT);
        assert_eq!(history.len(), HISTORY_LIMIT);
    });
}
