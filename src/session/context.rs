use crate::{
    carryover::{BatterKey, CarryoverMemory, PitcherKey},
    count,
    error::{SessionError, SessionResult},
    ledger::{EventLedger, LedgerEntry, UndoReport},
    models::{
        BatterInfo, GameInfo, Half, Pitch, PitchDraft, PitchEvent, PitchResult, PitcherInfo,
        PlateAppearanceKey, SheetRows, Situation,
    },
    pointer::{self, Advance},
    settings::LedgerSettings,
    store::{RemoteStore, StoreError},
    zone::GridCell,
};

use super::state::PlateAppearance;

const ENABLE_LOGS: bool = true;

/// Everything one scorekeeping session knows: the game, the plate
/// appearance being scored, remembered participants and the ledger.
pub struct SessionContext<S> {
    game: Option<GameInfo>,
    current: Option<PlateAppearance>,
    carryover: CarryoverMemory,
    situation: Situation,
    ledger: EventLedger<S>,
}

impl<S: RemoteStore> SessionContext<S> {
    pub fn new(store: S, settings: &LedgerSettings) -> Self {
        Self {
            game: None,
            current: None,
            carryover: CarryoverMemory::new(),
            situation: Situation::default(),
            ledger: EventLedger::new(store, settings),
        }
    }

    pub fn game(&self) -> Option<&GameInfo> {
        self.game.as_ref()
    }

    pub fn current(&self) -> Option<&PlateAppearance> {
        self.current.as_ref()
    }

    pub fn situation(&self) -> &Situation {
        &self.situation
    }

    pub fn ledger(&self) -> &EventLedger<S> {
        &self.ledger
    }

    pub fn carryover(&self) -> &CarryoverMemory {
        &self.carryover
    }

    pub fn recent(&self, n: usize) -> &[PitchEvent] {
        self.ledger.recent(n)
    }

    /// Switching to a different game drops the plate appearance in progress.
    pub fn set_game(&mut self, game: GameInfo) {
        if self.game.as_ref() != Some(&game) {
            self.current = None;
            self.situation = Situation::default();
        }
        crate::log_info!("Scoring game {}", game.partition_name());
        self.game = Some(game);
    }

    /// Opens the plate appearance at (inning, half, slot), prefilling batter
    /// and pitcher from memory or from what the ledger already holds.
    pub async fn begin_plate_appearance(
        &mut self,
        inning: u32,
        half: Half,
        slot: u8,
    ) -> SessionResult<PlateAppearance> {
        let game = self.game.clone().ok_or(SessionError::NoGame)?;
        let key = PlateAppearanceKey::new(game, inning, half, slot);
        if !key.is_valid() {
            return Err(SessionError::InvalidKey(format!(
                "inning {inning}, slot {slot}"
            )));
        }

        if let Some(current) = &self.current {
            if current.key == key {
                if current.is_open() {
                    return Ok(current.clone());
                }
                return Err(SessionError::PlateAppearanceClosed(key));
            }
        }

        let rows = self.partition_rows(&key.game).await?;
        Ok(self.open_at(key, &rows).clone())
    }

    /// Moves to the next plate appearance the ledger already has rows for.
    /// [`Advance::GameEnded`] leaves the session where it is.
    pub async fn advance(&mut self) -> SessionResult<Advance> {
        let current_key = self
            .current
            .as_ref()
            .map(|pa| pa.key.clone())
            .ok_or(SessionError::NoPlateAppearance)?;

        let rows = self.partition_rows(&current_key.game).await?;
        let advance = pointer::next(&current_key, &rows.positions());
        match &advance {
            Advance::Next(key) => {
                self.open_at(key.clone(), &rows);
            }
            Advance::GameEnded => {
                crate::log_info!("No recorded plate appearance after {}", current_key);
            }
        }
        Ok(advance)
    }

    pub fn set_batter(&mut self, info: BatterInfo) -> SessionResult<()> {
        let key = self.current_key()?;
        self.carryover.remember_batter(BatterKey::from(&key), info);
        Ok(())
    }

    /// A pitching change; sticks for the rest of this half of every inning.
    pub fn set_pitcher(&mut self, info: PitcherInfo) -> SessionResult<()> {
        let key = self.current_key()?;
        self.carryover.remember_pitcher(PitcherKey::from(&key), info);
        Ok(())
    }

    pub fn batter(&self) -> BatterInfo {
        self.current
            .as_ref()
            .map(|pa| self.carryover.recall_batter(&BatterKey::from(&pa.key)))
            .unwrap_or_default()
    }

    pub fn pitcher(&self) -> PitcherInfo {
        self.current
            .as_ref()
            .map(|pa| self.carryover.recall_pitcher(&PitcherKey::from(&pa.key)))
            .unwrap_or_default()
    }

    pub fn set_situation(&mut self, situation: Situation) {
        self.situation = situation;
    }

    /// Records one pitch under the open plate appearance. Local state only
    /// moves once the store has accepted the row.
    pub async fn record_pitch(&mut self, draft: PitchDraft) -> SessionResult<LedgerEntry> {
        let current = self.current.as_ref().ok_or(SessionError::NoPlateAppearance)?;
        if !current.is_open() {
            return Err(SessionError::PlateAppearanceClosed(current.key.clone()));
        }

        let key = current.key.clone();
        let ends = draft.pitch_result.ends_plate_appearance();
        let pitch = Pitch {
            batter: self.carryover.recall_batter(&BatterKey::from(&key)),
            pitcher: self.carryover.recall_pitcher(&PitcherKey::from(&key)),
            situation: self.situation.clone(),
            grid: GridCell::clamped(draft.grid_col, draft.grid_row),
            pitch_type: draft.pitch_type,
            pitch_result: draft.pitch_result,
            count_before: count::count_before(current.count),
            pitch_in_atbat: current.pitches + 1,
            at_bat_result: if ends { draft.at_bat_result } else { None },
            batted_type: draft.batted_type,
            batted_position: draft.batted_position,
            batted_outcome: draft.batted_outcome,
            strategy: draft.strategy,
            strategy_result: draft.strategy_result,
            key,
        };

        let result = pitch.pitch_result;
        let entry = self.ledger.append(pitch).await?;

        if let Some(current) = self.current.as_mut() {
            current.apply(result);
            if !current.is_open() {
                crate::log_info!("Plate appearance {} closed", current.key);
            }
        }
        Ok(entry)
    }

    /// Undoes the last `n` pitches and rebuilds the plate appearance state
    /// from what is left in the mirror.
    pub async fn undo(&mut self, n: usize) -> UndoReport {
        let report = self.ledger.undo(n).await;
        if report.attempted > 0 {
            self.resync_after_undo();
        }
        report
    }

    fn current_key(&self) -> SessionResult<PlateAppearanceKey> {
        self.current
            .as_ref()
            .map(|pa| pa.key.clone())
            .ok_or(SessionError::NoPlateAppearance)
    }

    async fn partition_rows(&self, game: &GameInfo) -> SessionResult<SheetRows> {
        match self.ledger.store().read_all_rows(&game.partition_name()).await {
            Ok(rows) => Ok(rows),
            Err(StoreError::NotFound(_)) => Ok(SheetRows::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn open_at(&mut self, key: PlateAppearanceKey, rows: &SheetRows) -> &PlateAppearance {
        let new_half = match &self.current {
            Some(current) => (current.key.inning, current.key.half) != (key.inning, key.half),
            None => false,
        };
        if new_half {
            self.situation = Situation::default();
        }

        let batter = self.carryover.prefill_batter(&key, rows);
        let pitcher = self.carryover.prefill_pitcher(&key, rows);
        self.carryover.remember_batter(BatterKey::from(&key), batter);
        self.carryover.remember_pitcher(PitcherKey::from(&key), pitcher);

        crate::log_info!("Opened plate appearance {}", key);
        self.current.insert(PlateAppearance::open(key))
    }

    fn resync_after_undo(&mut self) {
        let Some(current_key) = self.current.as_ref().map(|pa| pa.key.clone()) else {
            return;
        };

        let Some((tail_key, results)) = trailing_run(self.ledger.mirror()) else {
            self.current = Some(PlateAppearance::open(current_key));
            return;
        };

        // Never step back into a game other than the one being scored.
        if tail_key.game != current_key.game {
            self.current = Some(PlateAppearance::open(current_key));
            return;
        }

        let rebuilt = PlateAppearance::replay(tail_key.clone(), &results);
        if tail_key == current_key || rebuilt.is_open() {
            if tail_key != current_key {
                crate::log_info!("Undo reopened plate appearance {}", tail_key);
            }
            self.current = Some(rebuilt);
        } else {
            self.current = Some(PlateAppearance::open(current_key));
        }
    }
}

/// Key and results of the contiguous run of pitches at the end of the
/// mirror that share one plate appearance.
fn trailing_run(mirror: &[PitchEvent]) -> Option<(PlateAppearanceKey, Vec<PitchResult>)> {
    let last = mirror.last()?;
    let key = last.pitch.key.clone();

    let mut results: Vec<PitchResult> = mirror
        .iter()
        .rev()
        .take_while(|event| event.pitch.key == key)
        .map(|event| event.pitch.pitch_result)
        .collect();
    results.reverse();

    // A closed appearance followed by more pitches under the same key is a
    // new trip through the order; only the final occurrence counts.
    if let Some(end) = results[..results.len() - 1]
        .iter()
        .rposition(|result| result.ends_plate_appearance())
    {
        results.drain(..=end);
    }

    Some((key, results))
}
