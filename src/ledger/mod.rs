//! Append-only pitch ledger with a session-local mirror and compensating
//! deletes for undo.

pub mod event_ledger;
pub mod history;

use serde::Serialize;
use std::fmt;

use crate::models::RowId;

pub use event_ledger::EventLedger;
pub use history::RecentHistory;

/// Where an appended pitch lives: created on append, consumed by undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub partition: String,
    pub row_id: RowId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoFailure {
    pub row_id: RowId,
    pub reason: String,
}

/// Outcome of an undo. The local mirror is updated for every attempted
/// entry whether or not its remote delete went through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<UndoFailure>,
}

impl UndoReport {
    pub fn is_partial(&self) -> bool {
        self.succeeded < self.attempted
    }
}

impl fmt::Display for UndoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.attempted)
    }
}
