use crate::{
    models::{Pitch, PitchEvent, RowId, COLUMNS},
    settings::LedgerSettings,
    store::{RemoteStore, StoreError, StoreResult},
};

use super::{LedgerEntry, RecentHistory, UndoFailure, UndoReport};

const ENABLE_LOGS: bool = true;

pub struct EventLedger<S> {
    store: S,
    /// Pitches appended in this session, in append order.
    mirror: Vec<PitchEvent>,
    history: RecentHistory,
}

impl<S: RemoteStore> EventLedger<S> {
    pub fn new(store: S, settings: &LedgerSettings) -> Self {
        Self {
            store,
            mirror: Vec::new(),
            history: RecentHistory::with_capacity(settings.history_capacity),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mirror(&self) -> &[PitchEvent] {
        &self.mirror
    }

    pub fn history(&self) -> &RecentHistory {
        &self.history
    }

    /// Last `n` mirrored pitches, oldest first.
    pub fn recent(&self, n: usize) -> &[PitchEvent] {
        let start = self.mirror.len().saturating_sub(n);
        &self.mirror[start..]
    }

    /// Writes `pitch` under a fresh row id.
    ///
    /// The header is reconciled first and the row appended second. When the
    /// append fails after the header grew, the partition keeps the wider
    /// header without the row; nothing local changes and the error is
    /// returned for the caller to surface.
    pub async fn append(&mut self, pitch: Pitch) -> StoreResult<LedgerEntry> {
        let event = PitchEvent::new(RowId::generate(), pitch);
        let partition = event.pitch.game().partition_name();

        let header = self.store.ensure_header(&partition, &COLUMNS).await?;
        let values = event.values_for_header(&header);

        if let Err(err) = self.store.append_row(&partition, values).await {
            crate::log_warn!(
                "Append of {} to {} failed after header reconciliation: {}",
                event.row_id,
                partition,
                err
            );
            return Err(err);
        }

        let entry = LedgerEntry {
            partition,
            row_id: event.row_id.clone(),
        };
        crate::log_info!("Appended pitch {} to {}", entry.row_id, entry.partition);

        if self.history.len() == self.history.capacity() {
            crate::log_debug!(
                "Undo history at capacity {}; oldest entry no longer undoable",
                self.history.capacity()
            );
        }
        self.mirror.push(event);
        self.history.push(entry.clone());
        Ok(entry)
    }

    /// Undoes up to `n` of the most recent appends, newest first.
    ///
    /// Each entry gets one compensating delete. The matching pitch leaves the
    /// mirror either way; failed deletes are reported, never retried.
    pub async fn undo(&mut self, n: usize) -> UndoReport {
        let n = n.min(self.history.len()).min(self.mirror.len());
        let mut report = UndoReport::default();

        for _ in 0..n {
            let Some(entry) = self.history.pop() else {
                break;
            };
            report.attempted += 1;

            match self.delete_by_row_id(&entry.partition, &entry.row_id).await {
                Ok(true) => report.succeeded += 1,
                Ok(false) => {
                    crate::log_warn!("Row {} already gone from {}", entry.row_id, entry.partition);
                    report.failures.push(UndoFailure {
                        row_id: entry.row_id.clone(),
                        reason: "row not found".into(),
                    });
                }
                Err(err) => {
                    crate::log_warn!(
                        "Compensating delete of {} in {} failed: {}",
                        entry.row_id,
                        entry.partition,
                        err
                    );
                    report.failures.push(UndoFailure {
                        row_id: entry.row_id.clone(),
                        reason: err.user_message(),
                    });
                }
            }

            if let Some(pos) = self.mirror.iter().rposition(|e| e.row_id == entry.row_id) {
                self.mirror.remove(pos);
            }
        }

        crate::log_info!("Undo removed {} pitch(es), store deleted {}", report.attempted, report);
        report
    }

    /// `Ok(false)` when the partition or row no longer exists.
    async fn delete_by_row_id(&self, partition: &str, row_id: &RowId) -> StoreResult<bool> {
        let rows = match self.store.read_all_rows(partition).await {
            Ok(rows) => rows,
            Err(StoreError::NotFound(_)) => return Ok(false),
            Err(err) => return Err(err),
        };

        match rows.find_row_number(row_id.as_str()) {
            Some(row_number) => self.store.delete_row(partition, row_number).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{sheet::SheetRows, Half, PitchResult},
        store::MemoryStore,
        test_support::{game, key, pitch, FlakyStore},
    };
    use std::sync::atomic::Ordering;

    fn settings(history_capacity: usize) -> LedgerSettings {
        LedgerSettings {
            history_capacity,
            ..LedgerSettings::default()
        }
    }

    async fn remote_rows<S: RemoteStore>(ledger: &EventLedger<S>) -> SheetRows {
        ledger
            .store()
            .read_all_rows(&game().partition_name())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn append_writes_remote_row_and_mirrors_it() {
        let mut ledger = EventLedger::new(MemoryStore::new(), &settings(100));
        let entry = ledger
            .append(pitch(key(1, Half::Top, 1), PitchResult::Ball))
            .await
            .unwrap();

        assert_eq!(entry.partition, game().partition_name());
        assert_eq!(ledger.mirror().len(), 1);
        assert_eq!(ledger.history().len(), 1);

        let rows = remote_rows(&ledger).await;
        assert_eq!(rows.header, COLUMNS.map(String::from).to_vec());
        assert_eq!(rows.find_row_number(entry.row_id.as_str()), Some(2));
        assert_eq!(rows.cell(0, "pitch_result"), Some("ball"));
    }

    #[tokio::test]
    async fn append_respects_existing_header_layout() {
        let store = MemoryStore::new();
        let partition = game().partition_name();
        store
            .ensure_header(&partition, &["legacy_note", "zone", "row_id"])
            .await
            .unwrap();

        let mut ledger = EventLedger::new(store, &settings(100));
        let entry = ledger
            .append(pitch(key(1, Half::Top, 1), PitchResult::Foul))
            .await
            .unwrap();

        let rows = remote_rows(&ledger).await;
        assert_eq!(&rows.header[..3], &["legacy_note", "zone", "row_id"]);
        assert_eq!(rows.header.len(), COLUMNS.len() + 1);
        assert_eq!(rows.cell(0, "legacy_note"), Some(""));
        assert_eq!(rows.cell(0, "row_id"), Some(entry.row_id.as_str()));
    }

    #[tokio::test]
    async fn failed_append_leaves_local_state_alone() {
        let store = FlakyStore::new();
        store.fail_appends.store(true, Ordering::SeqCst);
        let mut ledger = EventLedger::new(store, &settings(100));

        let err = ledger
            .append(pitch(key(1, Half::Top, 1), PitchResult::Ball))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(ledger.mirror().is_empty());
        assert!(ledger.history().is_empty());

        // The header extension already happened; the row did not.
        let rows = remote_rows(&ledger).await;
        assert_eq!(rows.header.len(), COLUMNS.len());
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn undo_after_appends_restores_mirror() {
        let mut ledger = EventLedger::new(MemoryStore::new(), &settings(100));
        ledger
            .append(pitch(key(2, Half::Bottom, 3), PitchResult::Ball))
            .await
            .unwrap();
        let before: Vec<RowId> = ledger.mirror().iter().map(|e| e.row_id.clone()).collect();

        for _ in 0..3 {
            ledger
                .append(pitch(key(2, Half::Bottom, 4), PitchResult::Foul))
                .await
                .unwrap();
        }

        let report = ledger.undo(3).await;
        assert_eq!((report.attempted, report.succeeded), (3, 3));
        let after: Vec<RowId> = ledger.mirror().iter().map(|e| e.row_id.clone()).collect();
        assert_eq!(after, before);
        assert_eq!(remote_rows(&ledger).await.len(), 1);
    }

    #[tokio::test]
    async fn undo_reports_rows_removed_out_of_band() {
        let store = MemoryStore::new();
        let mut ledger = EventLedger::new(store.clone(), &settings(100));
        for _ in 0..5 {
            ledger
                .append(pitch(key(3, Half::Top, 4), PitchResult::Ball))
                .await
                .unwrap();
        }

        // Someone deletes the newest row directly in the store.
        let partition = game().partition_name();
        assert!(store.delete_row(&partition, 6).await.unwrap());

        let report = ledger.undo(2).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(ledger.mirror().len(), 3);
        assert_eq!(store.read_all_rows(&partition).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn undo_keeps_local_removal_when_store_errors() {
        let store = FlakyStore::new();
        let mut ledger = EventLedger::new(store, &settings(100));
        for _ in 0..2 {
            ledger
                .append(pitch(key(1, Half::Top, 1), PitchResult::Ball))
                .await
                .unwrap();
        }
        ledger.store().fail_deletes.store(true, Ordering::SeqCst);

        let report = ledger.undo(1).await;
        assert_eq!((report.attempted, report.succeeded), (1, 0));
        assert!(report.failures[0].reason.contains("try again"));
        assert_eq!(ledger.mirror().len(), 1);
        assert_eq!(remote_rows(&ledger).await.len(), 2);
    }

    #[tokio::test]
    async fn undo_is_bounded_by_history() {
        let mut ledger = EventLedger::new(MemoryStore::new(), &settings(2));
        for _ in 0..4 {
            ledger
                .append(pitch(key(1, Half::Top, 1), PitchResult::Ball))
                .await
                .unwrap();
        }

        assert_eq!(ledger.history().len(), ledger.history().capacity());

        let report = ledger.undo(10).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(ledger.mirror().len(), 2);
        assert_eq!(ledger.undo(1).await, UndoReport::default());
    }

    #[tokio::test]
    async fn recent_returns_tail_of_mirror() {
        let mut ledger = EventLedger::new(MemoryStore::new(), &settings(100));
        for slot in 1..=4 {
            ledger
                .append(pitch(key(1, Half::Top, slot), PitchResult::Ball))
                .await
                .unwrap();
        }

        let slots: Vec<u8> = ledger.recent(2).iter().map(|e| e.pitch.key.slot).collect();
        assert_eq!(slots, vec![3, 4]);
        assert_eq!(ledger.recent(10).len(), 4);
    }
}
