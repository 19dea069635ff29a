//! Search history storage
//!
//! History records live in an embedded redb database as JSON documents.
//! The handlers only see the [`HistoryStore`] trait, so the store can be
//! replaced by [`UnavailableHistoryStore`] when the database cannot be opened,
//! or by a test double.

use std::sync::Arc;

use rand::{distr::Alphanumeric, Rng};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::countries::CountryDirectory;
use crate::error::StoreError;
use crate::model::SearchHistoryRecord;
use crate::sampling::Sampler;
use crate::weather::WeatherProvider;

/// Table holding one document per completed search
///
/// Key: `"{searched_at_micros:020}:{suffix}"`, zero-padded so that key order
/// is time order; the random suffix keeps two searches in the same
/// microsecond apart.
/// Value: JSON-serialized `SearchHistoryRecord`
///
/// Example:
/// - Key: "00001760870400000000:aB3xQ9"
/// - Value: '{"continent":"Europe","searched_at":"2025-10-19T10:40:00Z","results":[...]}'
pub const TABLE_HISTORY: TableDefinition<&str, &str> = TableDefinition::new("search_history_v1");

/// Number of records shown on the history page
pub const HISTORY_LIMIT: usize = 20;

/// Append-only store of completed searches
pub trait HistoryStore: Send + Sync {
    fn insert(&self, record: &SearchHistoryRecord) -> Result<(), StoreError>;

    /// Up to `limit` records, newest `searched_at` first.
    fn recent(&self, limit: usize) -> Result<Vec<SearchHistoryRecord>, StoreError>;
}

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub countries: Arc<dyn CountryDirectory>,
    /// `None` when no weather API key is configured
    pub weather: Option<Arc<dyn WeatherProvider>>,
    pub history: Arc<dyn HistoryStore>,
    pub sampler: Arc<dyn Sampler>,
}

/// Initializes the embedded database and creates the history table
///
/// This function:
/// 1. Creates or opens the database file at the specified path
/// 2. Opens the history table so it exists before the first read
/// 3. Commits the transaction to persist the table structure
///
/// # Arguments
///
/// * `db_path` - File path where the database should be stored (e.g., "history.db")
///
/// # Returns
///
/// * `Ok(Database)` - Successfully initialized database instance
/// * `Err(redb::Error)` - Database initialization error
///
/// # Example
///
/// ```no_run
/// # use geoweather::database::init_db;
/// let db = init_db("history.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    // Create or open the database file
    let db = Database::create(db_path)?;

    // Begin a write transaction to create the table
    let write_txn = db.begin_write()?;
    {
        // Open (or create if not exists) the history table
        write_txn.open_table(TABLE_HISTORY)?;
    }

    // Commit the transaction to persist the table structure
    write_txn.commit()?;

    Ok(db)
}

/// redb-backed history store
pub struct RedbHistoryStore {
    db: Database,
}

impl RedbHistoryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens (or creates) the database file and its table.
    pub fn open(db_path: &str) -> Result<Self, redb::Error> {
        init_db(db_path).map(Self::new)
    }

    /// Builds the time-ordered key for a record
    ///
    /// # Returns
    ///
    /// `"{searched_at_micros:020}:{suffix}"` with a random 6-character suffix
    fn record_key(record: &SearchHistoryRecord) -> String {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        // Clamp pre-epoch timestamps so padding keeps lexical order.
        let micros = record.searched_at.timestamp_micros().max(0);
        format!("{:020}:{}", micros, suffix)
    }

    /// Writes one JSON document under `key`
    ///
    /// # Database Operations
    ///
    /// One write transaction with a single insert into `TABLE_HISTORY`.
    fn put(&self, key: &str, value: &str) -> Result<(), redb::Error> {
        // Begin a write transaction
        let write_txn = self.db.begin_write()?;
        {
            // Open the history table and insert the document
            let mut table = write_txn.open_table(TABLE_HISTORY)?;
            table.insert(key, value)?;
        }

        // Commit the transaction to persist the record
        write_txn.commit()?;
        Ok(())
    }

    /// Reads up to `limit` decodable records, newest first
    ///
    /// Documents that no longer decode are skipped and do not count toward
    /// `limit`, so older valid records fill the page instead.
    ///
    /// # Database Operations
    ///
    /// One read transaction iterating `TABLE_HISTORY` backwards from the
    /// newest key.
    fn newest_records(&self, limit: usize) -> Result<Vec<SearchHistoryRecord>, redb::Error> {
        // Begin a read-only transaction
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_HISTORY)?;

        let mut records = Vec::with_capacity(limit.min(HISTORY_LIMIT));
        if limit == 0 {
            return Ok(records);
        }

        // Keys sort by timestamp, so reverse iteration is newest first
        for entry in table.iter()?.rev() {
            let (key, value) = entry?;
            match serde_json::from_str::<SearchHistoryRecord>(value.value()) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(key = key.value(), error = %err, "skipping unreadable history record");
                    continue;
                }
            }
            if records.len() == limit {
                break;
            }
        }
        Ok(records)
    }
}

impl HistoryStore for RedbHistoryStore {
    fn insert(&self, record: &SearchHistoryRecord) -> Result<(), StoreError> {
        // Serialize the record to JSON for storage
        let record_json = serde_json::to_string(record)?;
        let key = Self::record_key(record);
        self.put(&key, &record_json)?;
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<SearchHistoryRecord>, StoreError> {
        Ok(self.newest_records(limit)?)
    }
}

/// Stand-in used when the database could not be opened at startup
///
/// Every write fails and every read fails, which the search pipeline turns
/// into "not saved" and "empty history".
#[derive(Debug, Clone)]
pub struct UnavailableHistoryStore {
    reason: String,
}

impl UnavailableHistoryStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl HistoryStore for UnavailableHistoryStore {
    fn insert(&self, _record: &SearchHistoryRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<SearchHistoryRecord>, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}
