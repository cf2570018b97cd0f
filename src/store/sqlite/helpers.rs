use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};

use crate::models::sheet::FIRST_DATA_ROW;

pub fn to_i64(value: usize) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

/// Offset of a 1-based row number among data rows, `None` for the header or
/// anything before it.
pub fn data_offset(row_number: usize) -> Option<i64> {
    row_number
        .checked_sub(FIRST_DATA_ROW)
        .and_then(|offset| i64::try_from(offset).ok())
}

pub fn decode_strings(value: &str, field: &str) -> Result<Vec<String>> {
    serde_json::from_str(value).with_context(|| format!("failed to parse {field}"))
}

pub fn encode_strings(values: &[String], field: &str) -> Result<String> {
    serde_json::to_string(values).with_context(|| format!("failed to encode {field}"))
}
