use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::models::{sheet::FIRST_DATA_ROW, CellUpdate, SheetRows};

use super::{RemoteStore, StoreError, StoreResult};

#[derive(Default)]
struct MemoryInner {
    /// Partition names in creation order.
    order: Vec<String>,
    sheets: HashMap<String, SheetRows>,
}

/// In-process store. Clones share the same partitions.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn data_index(rows: &SheetRows, row_number: usize) -> Option<usize> {
    row_number
        .checked_sub(FIRST_DATA_ROW)
        .filter(|index| *index < rows.len())
}

impl RemoteStore for MemoryStore {
    async fn list_partitions(&self, name_pattern: &str) -> StoreResult<Vec<String>> {
        let inner = self.lock();
        Ok(inner
            .order
            .iter()
            .filter(|name| name.contains(name_pattern))
            .cloned()
            .collect())
    }

    async fn read_all_rows(&self, partition: &str) -> StoreResult<SheetRows> {
        self.lock()
            .sheets
            .get(partition)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("partition {partition}")))
    }

    async fn ensure_header(&self, partition: &str, required: &[&str]) -> StoreResult<Vec<String>> {
        let mut inner = self.lock();
        if !inner.sheets.contains_key(partition) {
            inner.order.push(partition.to_string());
        }
        let sheet = inner.sheets.entry(partition.to_string()).or_default();

        for column in required {
            if !sheet.header.iter().any(|name| name == column) {
                sheet.header.push(column.to_string());
            }
        }

        Ok(sheet.header.clone())
    }

    async fn append_row(&self, partition: &str, values: Vec<String>) -> StoreResult<()> {
        let mut inner = self.lock();
        let sheet = inner
            .sheets
            .get_mut(partition)
            .ok_or_else(|| StoreError::NotFound(format!("partition {partition}")))?;
        sheet.rows.push(values);
        Ok(())
    }

    async fn update_cells(&self, partition: &str, updates: &[CellUpdate]) -> StoreResult<()> {
        let mut inner = self.lock();
        let sheet = inner
            .sheets
            .get_mut(partition)
            .ok_or_else(|| StoreError::NotFound(format!("partition {partition}")))?;

        let mut resolved = Vec::with_capacity(updates.len());
        let mut missing = Vec::new();
        for update in updates {
            let Some(col) = sheet.column_index(&update.column) else {
                if !missing.contains(&update.column) {
                    missing.push(update.column.clone());
                }
                continue;
            };
            let index = data_index(sheet, update.row_number).ok_or_else(|| {
                StoreError::NotFound(format!("row {} in {partition}", update.row_number))
            })?;
            resolved.push((index, col, update.value.clone()));
        }

        if !missing.is_empty() {
            return Err(StoreError::SchemaDrift {
                partition: partition.to_string(),
                columns: missing,
            });
        }

        for (index, col, value) in resolved {
            let row = &mut sheet.rows[index];
            if row.len() <= col {
                row.resize(col + 1, String::new());
            }
            row[col] = value;
        }

        Ok(())
    }

    async fn delete_row(&self, partition: &str, row_number: usize) -> StoreResult<bool> {
        let mut inner = self.lock();
        let Some(sheet) = inner.sheets.get_mut(partition) else {
            return Ok(false);
        };

        match data_index(sheet, row_number) {
            Some(index) => {
                sheet.rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
