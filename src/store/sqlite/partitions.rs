use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    helpers::{data_offset, decode_strings, encode_strings},
    into_store_error, SqliteStore,
};
use crate::{
    models::{CellUpdate, SheetRows},
    store::{RemoteStore, StoreError, StoreResult},
};

const ENABLE_LOGS: bool = false;

fn load_header(conn: &Connection, partition: &str) -> Result<Option<Vec<String>>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT header FROM partitions WHERE name = ?1",
            params![partition],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|value| decode_strings(&value, "header")).transpose()
}

fn require_header(conn: &Connection, partition: &str) -> Result<Vec<String>> {
    load_header(conn, partition)?
        .ok_or_else(|| StoreError::NotFound(format!("partition {partition}")).into())
}

/// Row id and cells of the data row at `row_number`, if any.
fn row_at(conn: &Connection, partition: &str, row_number: usize) -> Result<Option<(i64, String)>> {
    let Some(offset) = data_offset(row_number) else {
        return Ok(None);
    };

    let row = conn
        .query_row(
            "SELECT id, cells FROM partition_rows
             WHERE partition = ?1
             ORDER BY id
             LIMIT 1 OFFSET ?2",
            params![partition, offset],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;
    Ok(row)
}

impl SqliteStore {
    pub async fn list_partition_names(&self, name_pattern: &str) -> Result<Vec<String>> {
        let pattern = name_pattern.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM partitions
                 WHERE ?1 = '' OR instr(name, ?1) > 0
                 ORDER BY rowid ASC",
            )?;

            let mut rows = stmt.query(params![pattern])?;
            let mut names: Vec<String> = Vec::new();
            while let Some(row) = rows.next()? {
                names.push(row.get(0)?);
            }
            Ok(names)
        })
        .await
    }

    pub async fn load_partition(&self, partition: &str) -> Result<SheetRows> {
        let partition = partition.to_string();
        self.execute(move |conn| {
            let header = require_header(conn, &partition)?;

            let mut stmt = conn.prepare(
                "SELECT cells FROM partition_rows
                 WHERE partition = ?1
                 ORDER BY id ASC",
            )?;
            let mut rows = stmt.query(params![partition])?;
            let mut data = Vec::new();
            while let Some(row) = rows.next()? {
                let cells: String = row.get(0)?;
                data.push(decode_strings(&cells, "cells")?);
            }

            Ok(SheetRows { header, rows: data })
        })
        .await
    }

    pub async fn extend_header(&self, partition: &str, required: Vec<String>) -> Result<Vec<String>> {
        let partition = partition.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let now = Utc::now().to_rfc3339();

            tx.execute(
                "INSERT OR IGNORE INTO partitions (name, header, created_at, updated_at)
                 VALUES (?1, '[]', ?2, ?2)",
                params![partition, now],
            )?;

            let mut header = require_header(&tx, &partition)?;
            let before = header.len();
            for column in required {
                if !header.contains(&column) {
                    header.push(column);
                }
            }

            if header.len() != before {
                tx.execute(
                    "UPDATE partitions SET header = ?1, updated_at = ?2 WHERE name = ?3",
                    params![encode_strings(&header, "header")?, now, partition],
                )?;
                crate::log_info!(
                    "Extended header of {} by {} column(s)",
                    partition,
                    header.len() - before
                );
            }

            tx.commit()?;
            Ok(header)
        })
        .await
    }

    pub async fn insert_row(&self, partition: &str, values: Vec<String>) -> Result<()> {
        let partition = partition.to_string();
        self.execute(move |conn| {
            require_header(conn, &partition)?;
            conn.execute(
                "INSERT INTO partition_rows (partition, cells, created_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    partition,
                    encode_strings(&values, "cells")?,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn write_cells(&self, partition: &str, updates: Vec<CellUpdate>) -> Result<()> {
        let partition = partition.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let header = require_header(&tx, &partition)?;

            let mut missing: Vec<String> = Vec::new();
            for update in &updates {
                if !header.contains(&update.column) && !missing.contains(&update.column) {
                    missing.push(update.column.clone());
                }
            }
            if !missing.is_empty() {
                return Err(StoreError::SchemaDrift {
                    partition: partition.clone(),
                    columns: missing,
                }
                .into());
            }

            for update in &updates {
                let Some((id, raw)) = row_at(&tx, &partition, update.row_number)? else {
                    return Err(StoreError::NotFound(format!(
                        "row {} in {}",
                        update.row_number, partition
                    ))
                    .into());
                };

                let col = header
                    .iter()
                    .position(|name| name == &update.column)
                    .unwrap_or_default();
                let mut cells = decode_strings(&raw, "cells")?;
                if cells.len() <= col {
                    cells.resize(col + 1, String::new());
                }
                cells[col] = update.value.clone();

                tx.execute(
                    "UPDATE partition_rows SET cells = ?1 WHERE id = ?2",
                    params![encode_strings(&cells, "cells")?, id],
                )?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    pub async fn remove_row(&self, partition: &str, row_number: usize) -> Result<bool> {
        let partition = partition.to_string();
        self.execute(move |conn| {
            let Some((id, _)) = row_at(conn, &partition, row_number)? else {
                return Ok(false);
            };
            let affected = conn.execute("DELETE FROM partition_rows WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
    }
}

impl RemoteStore for SqliteStore {
    async fn list_partitions(&self, name_pattern: &str) -> StoreResult<Vec<String>> {
        self.list_partition_names(name_pattern)
            .await
            .map_err(into_store_error)
    }

    async fn read_all_rows(&self, partition: &str) -> StoreResult<SheetRows> {
        self.load_partition(partition).await.map_err(into_store_error)
    }

    async fn ensure_header(&self, partition: &str, required: &[&str]) -> StoreResult<Vec<String>> {
        let required = required.iter().map(|column| column.to_string()).collect();
        self.extend_header(partition, required)
            .await
            .map_err(into_store_error)
    }

    async fn append_row(&self, partition: &str, values: Vec<String>) -> StoreResult<()> {
        self.insert_row(partition, values)
            .await
            .map_err(into_store_error)
    }

    async fn update_cells(&self, partition: &str, updates: &[CellUpdate]) -> StoreResult<()> {
        self.write_cells(partition, updates.to_vec())
            .await
            .map_err(into_store_error)
    }

    async fn delete_row(&self, partition: &str, row_number: usize) -> StoreResult<bool> {
        self.remove_row(partition, row_number)
            .await
            .map_err(into_store_error)
    }
}
