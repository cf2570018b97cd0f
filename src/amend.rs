//! Post-game supplement: browse recorded games and fill in what was skipped
//! during live scoring, one plate appearance at a time.

use std::fmt;

use serde::Serialize;

use crate::{
    carryover,
    models::{CellUpdate, Half, RowPosition, SheetRows, COLUMNS},
    settings::LedgerSettings,
    store::{RemoteStore, StoreError, StoreResult},
};

const ENABLE_LOGS: bool = true;

/// Where a plate appearance sits in the game, without the game itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearancePosition {
    pub inning: u32,
    pub half: Half,
    pub slot: u8,
}

impl AppearancePosition {
    pub fn new(inning: u32, half: Half, slot: u8) -> Self {
        Self { inning, half, slot }
    }

    fn matches(&self, row: &RowPosition) -> bool {
        row.inning == self.inning && row.half == self.half && row.slot == self.slot
    }
}

impl From<&RowPosition> for AppearancePosition {
    fn from(row: &RowPosition) -> Self {
        Self::new(row.inning, row.half, row.slot)
    }
}

impl fmt::Display for AppearancePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inning {} {} #{}", self.inning, self.half.as_str(), self.slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSummary {
    pub position: AppearancePosition,
    pub pitches: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendReport {
    pub rows_matched: usize,
    pub cells_written: usize,
    pub chunks: usize,
}

pub async fn list_games<S: RemoteStore>(store: &S, pattern: &str) -> StoreResult<Vec<String>> {
    store.list_partitions(pattern).await
}

/// Distinct plate appearances in first-seen order, with how many pitches each
/// one has on record.
pub fn plate_appearances(rows: &SheetRows) -> Vec<AppearanceSummary> {
    let mut summaries: Vec<AppearanceSummary> = Vec::new();
    for row in rows.positions() {
        let position = AppearancePosition::from(&row);
        match summaries.iter_mut().find(|s| s.position == position) {
            Some(summary) => summary.pitches += 1,
            None => summaries.push(AppearanceSummary {
                position,
                pitches: 1,
            }),
        }
    }
    summaries
}

/// Most recent non-blank `column` value recorded for `position`.
pub fn latest_value(rows: &SheetRows, position: &AppearancePosition, column: &str) -> Option<String> {
    carryover::latest_value(rows, column, |row| position.matches(row))
}

/// Writes `updates` onto every row of `position` in `partition`.
///
/// Unknown columns are appended to the header first. Cells go out in chunks
/// of `update_chunk_size` with `chunk_pause_ms` between calls; the first
/// failing chunk aborts the rest and its error is returned.
pub async fn amend_plate_appearance<S: RemoteStore>(
    store: &S,
    partition: &str,
    position: &AppearancePosition,
    updates: &[(&str, &str)],
    settings: &LedgerSettings,
) -> StoreResult<AmendReport> {
    let rows = store.read_all_rows(partition).await?;
    let matched: Vec<usize> = rows
        .positions()
        .iter()
        .filter(|row| position.matches(row))
        .map(|row| SheetRows::row_number(row.index))
        .collect();

    if matched.is_empty() {
        return Err(StoreError::NotFound(format!("{position} in {partition}")));
    }

    let mut report = AmendReport {
        rows_matched: matched.len(),
        ..AmendReport::default()
    };
    if updates.is_empty() {
        return Ok(report);
    }

    let missing: Vec<&str> = updates
        .iter()
        .map(|(column, _)| *column)
        .filter(|column| rows.column_index(column).is_none())
        .collect();
    if !missing.is_empty() {
        let mut required: Vec<&str> = COLUMNS.to_vec();
        required.extend(missing);
        store.ensure_header(partition, &required).await?;
    }

    let cells: Vec<CellUpdate> = matched
        .iter()
        .flat_map(|row_number| {
            updates.iter().map(move |(column, value)| CellUpdate {
                row_number: *row_number,
                column: column.to_string(),
                value: value.to_string(),
            })
        })
        .collect();

    for (i, chunk) in cells.chunks(settings.chunk_size()).enumerate() {
        if i > 0 && !settings.chunk_pause().is_zero() {
            tokio::time::sleep(settings.chunk_pause()).await;
        }

        if let Err(err) = store.update_cells(partition, chunk).await {
            crate::log_warn!(
                "Amending {} in {} stopped after {} of {} cell(s): {}",
                position,
                partition,
                report.cells_written,
                cells.len(),
                err
            );
            return Err(err);
        }
        report.cells_written += chunk.len();
        report.chunks += 1;
    }

    crate::log_info!(
        "Amended {} row(s) of {} in {} ({} cell(s))",
        report.rows_matched,
        position,
        partition,
        report.cells_written
    );
    Ok(report)
}
