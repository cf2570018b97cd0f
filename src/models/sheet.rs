//! Header-driven row snapshot as returned by the store.

use serde::{Deserialize, Serialize};

use super::{
    pitch::{HALF_COLUMN, INNING_COLUMN, ROW_ID_COLUMN, SLOT_COLUMN},
    plate_appearance::Half,
};

/// Row number of the first data row; the header occupies row 1.
pub const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SheetRows {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One cell write addressed by 1-based row number and column name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    pub row_number: usize,
    pub column: String,
    pub value: String,
}

/// Plate-appearance position parsed out of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPosition {
    pub index: usize,
    pub inning: u32,
    pub half: Half,
    pub slot: u8,
}

impl SheetRows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|name| name == column)
    }

    /// Cell text, or `None` when the column is unknown or the row is short.
    pub fn cell(&self, index: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows
            .get(index)
            .and_then(|row| row.get(col))
            .map(String::as_str)
    }

    pub fn row_number(index: usize) -> usize {
        index + FIRST_DATA_ROW
    }

    /// Row number of the data row whose `row_id` cell equals `row_id`.
    pub fn find_row_number(&self, row_id: &str) -> Option<usize> {
        let col = self.column_index(ROW_ID_COLUMN)?;
        self.rows
            .iter()
            .position(|row| row.get(col).map(String::as_str) == Some(row_id))
            .map(Self::row_number)
    }

    /// Positions of every row whose inning/half/slot cells parse, in storage
    /// order. Rows that do not parse are skipped.
    pub fn positions(&self) -> Vec<RowPosition> {
        let (Some(inning_col), Some(half_col), Some(slot_col)) = (
            self.column_index(INNING_COLUMN),
            self.column_index(HALF_COLUMN),
            self.column_index(SLOT_COLUMN),
        ) else {
            return Vec::new();
        };

        self.rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let inning = row.get(inning_col)?.trim().parse::<u32>().ok()?;
                let half = Half::parse(row.get(half_col)?)?;
                let slot = row.get(slot_col)?.trim().parse::<u8>().ok()?;
                Some(RowPosition {
                    index,
                    inning,
                    half,
                    slot,
                })
            })
            .collect()
    }
}
