//! Row-oriented, header-driven tabular store the ledger writes to.
//!
//! Row numbers are 1-based and the header is row 1, so the first data row is
//! row 2. Implementations offer no transactions: a header extension and the
//! append that follows are separate calls.

pub mod memory;
pub mod sqlite;

use thiserror::Error;

use crate::models::{CellUpdate, SheetRows};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited by store: {0}")]
    RateLimited(String),

    #[error("temporary store failure: {0}")]
    Transient(String),

    #[error("partition {partition} has no column(s) {}", .columns.join(", "))]
    SchemaDrift {
        partition: String,
        columns: Vec<String>,
    },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::RateLimited(_) | StoreError::Transient(_))
    }

    /// Message suitable for showing to the person at the keyboard.
    pub fn user_message(&self) -> String {
        if self.is_retryable() {
            format!("{self}. Please try again in a moment.")
        } else {
            self.to_string()
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Partition names containing `name_pattern`; an empty pattern lists all.
    async fn list_partitions(&self, name_pattern: &str) -> StoreResult<Vec<String>>;

    /// Header and data rows. `NotFound` when the partition does not exist.
    async fn read_all_rows(&self, partition: &str) -> StoreResult<SheetRows>;

    /// Creates the partition on demand and extends its header to the right
    /// with any of `required` that are missing. Existing columns are never
    /// reordered or removed. Returns the resulting header.
    async fn ensure_header(&self, partition: &str, required: &[&str]) -> StoreResult<Vec<String>>;

    /// Appends one row laid out in header order.
    async fn append_row(&self, partition: &str, values: Vec<String>) -> StoreResult<()>;

    async fn update_cells(&self, partition: &str, updates: &[CellUpdate]) -> StoreResult<()>;

    /// `Ok(false)` when there is no such row.
    async fn delete_row(&self, partition: &str, row_number: usize) -> StoreResult<bool>;
}
