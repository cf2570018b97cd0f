//! Fixtures shared by unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::NaiveDate;

use crate::{
    count::Count,
    models::{
        BatterInfo, CellUpdate, GameInfo, Half, Pitch, PitchResult, PitcherInfo,
        PlateAppearanceKey, SheetRows, Situation,
    },
    store::{MemoryStore, RemoteStore, StoreError, StoreResult},
    zone::GridCell,
};

pub fn game() -> GameInfo {
    GameInfo::new(NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(), "Hawks", "Owls")
}

pub fn key(inning: u32, half: Half, slot: u8) -> PlateAppearanceKey {
    PlateAppearanceKey::new(game(), inning, half, slot)
}

pub fn pitch(key: PlateAppearanceKey, result: PitchResult) -> Pitch {
    Pitch {
        key,
        batter: BatterInfo::default(),
        pitcher: PitcherInfo::default(),
        situation: Situation::default(),
        grid: GridCell::clamped(3, 3),
        pitch_type: None,
        pitch_result: result,
        count_before: Count::default(),
        pitch_in_atbat: 1,
        at_bat_result: None,
        batted_type: None,
        batted_position: None,
        batted_outcome: None,
        strategy: None,
        strategy_result: None,
    }
}

/// Memory store with switchable failures.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_appends: AtomicBool,
    pub fail_deletes: AtomicBool,
    /// Zero-based `update_cells` call that gets rate limited; `usize::MAX`
    /// (set by `new`) never fails.
    pub rate_limit_update_call: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            rate_limit_update_call: AtomicUsize::new(usize::MAX),
            ..Self::default()
        }
    }
}

impl RemoteStore for FlakyStore {
    async fn list_partitions(&self, name_pattern: &str) -> StoreResult<Vec<String>> {
        self.inner.list_partitions(name_pattern).await
    }

    async fn read_all_rows(&self, partition: &str) -> StoreResult<SheetRows> {
        self.inner.read_all_rows(partition).await
    }

    async fn ensure_header(&self, partition: &str, required: &[&str]) -> StoreResult<Vec<String>> {
        self.inner.ensure_header(partition, required).await
    }

    async fn append_row(&self, partition: &str, values: Vec<String>) -> StoreResult<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Transient("append timed out".into()));
        }
        self.inner.append_row(partition, values).await
    }

    async fn update_cells(&self, partition: &str, updates: &[CellUpdate]) -> StoreResult<()> {
        let call = self.update_calls.fetch_add(1, Ordering::SeqCst);
        if call == self.rate_limit_update_call.load(Ordering::SeqCst) {
            return Err(StoreError::RateLimited("quota exceeded".into()));
        }
        self.inner.update_cells(partition, updates).await
    }

    async fn delete_row(&self, partition: &str, row_number: usize) -> StoreResult<bool> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Transient("delete timed out".into()));
        }
        self.inner.delete_row(partition, row_number).await
    }
}
