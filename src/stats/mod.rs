//! Publisher Statistics Store
//!
//! Read-only table of per-publisher history, keyed by exact publisher name,
//! plus the process-wide fallback figure (mean days-to-store across every row).
//!
//! The table is built once at startup from a CSV export and never mutated.
//! Lookups are case-sensitive; a miss means "no history", and callers take
//! the industry-average path instead of fabricating a record.

mod csv;

use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::PublisherRecord;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("IO error reading statistics table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Statistics table is empty")]
    Empty,

    #[error("Statistics table is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Line {line}: invalid {column} value '{value}'")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("No publisher has a defined average days-to-store; global mean is undefined")]
    NoDefinedDays,
}

// ============================================================================
// Store
// ============================================================================

/// Immutable publisher statistics with a precomputed global mean.
#[derive(Debug, Clone)]
pub struct PublisherStatsStore {
    records: HashMap<String, PublisherRecord>,
    global_mean_days: f64,
    row_count: usize,
}

impl PublisherStatsStore {
    /// Build a store from parsed rows.
    ///
    /// When a publisher appears more than once the first row wins, but every
    /// row with a defined day value contributes to the global mean.
    pub fn from_records(rows: Vec<PublisherRecord>) -> Result<Self, StatsError> {
        if rows.is_empty() {
            return Err(StatsError::Empty);
        }

        let defined_days: Vec<f64> = rows
            .iter()
            .filter_map(|r| r.avg_days_to_store)
            .filter(|d| d.is_finite())
            .collect();
        if defined_days.is_empty() {
            return Err(StatsError::NoDefinedDays);
        }
        let global_mean_days = defined_days.iter().mean();

        let row_count = rows.len();
        let mut records = HashMap::with_capacity(row_count);
        for row in rows {
            if records.contains_key(&row.publisher_name) {
                warn!(publisher = %row.publisher_name, "Duplicate publisher row ignored");
                continue;
            }
            records.insert(row.publisher_name.clone(), row);
        }

        Ok(Self {
            records,
            global_mean_days,
            row_count,
        })
    }

    /// Load the statistics table from a CSV file.
    pub fn load_csv(path: &Path) -> Result<Self, StatsError> {
        let contents = std::fs::read_to_string(path)?;
        let store = Self::from_csv_str(&contents)?;
        info!(
            path = %path.display(),
            publishers = store.len(),
            rows = store.row_count,
            global_mean_days = store.global_mean_days,
            "Loaded publisher statistics"
        );
        Ok(store)
    }

    /// Parse a CSV document (header row first).
    pub fn from_csv_str(contents: &str) -> Result<Self, StatsError> {
        Self::from_records(csv::parse_records(contents)?)
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, publisher_name: &str) -> Option<&PublisherRecord> {
        self.records.get(publisher_name)
    }

    /// Mean of `avg_days_to_store` across all table rows with a defined value.
    pub fn global_mean_days(&self) -> f64 {
        self.global_mean_days
    }

    /// Number of distinct publishers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct publisher names, in no particular order.
    pub fn publishers(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}
