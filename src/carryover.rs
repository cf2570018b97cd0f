//! Batter and pitcher identity carried between plate appearances.
//!
//! Batters are remembered per (game, half, slot) so the next trip through the
//! order comes prefilled. Pitchers are remembered per (game, half) and stay on
//! until someone records a change.

use std::collections::HashMap;

use crate::models::{
    BatterInfo, GameInfo, Half, PitcherInfo, PlateAppearanceKey, RowPosition, SheetRows, Side,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatterKey {
    pub game: GameInfo,
    pub half: Half,
    pub slot: u8,
}

impl From<&PlateAppearanceKey> for BatterKey {
    fn from(key: &PlateAppearanceKey) -> Self {
        Self {
            game: key.game.clone(),
            half: key.half,
            slot: key.slot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PitcherKey {
    pub game: GameInfo,
    pub half: Half,
}

impl From<&PlateAppearanceKey> for PitcherKey {
    fn from(key: &PlateAppearanceKey) -> Self {
        Self {
            game: key.game.clone(),
            half: key.half,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CarryoverMemory {
    batters: HashMap<BatterKey, BatterInfo>,
    pitchers: HashMap<PitcherKey, PitcherInfo>,
}

impl CarryoverMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember_batter(&mut self, key: BatterKey, info: BatterInfo) {
        self.batters.insert(key, info);
    }

    pub fn remember_pitcher(&mut self, key: PitcherKey, info: PitcherInfo) {
        self.pitchers.insert(key, info);
    }

    /// Empty record when nothing is remembered.
    pub fn recall_batter(&self, key: &BatterKey) -> BatterInfo {
        self.batters.get(key).cloned().unwrap_or_default()
    }

    pub fn recall_pitcher(&self, key: &PitcherKey) -> PitcherInfo {
        self.pitchers.get(key).cloned().unwrap_or_default()
    }

    /// Remembered batter, else the latest batter recorded in `rows` for the
    /// same half and slot, else empty.
    pub fn prefill_batter(&self, key: &PlateAppearanceKey, rows: &SheetRows) -> BatterInfo {
        let remembered = self.recall_batter(&BatterKey::from(key));
        if !remembered.is_empty() {
            return remembered;
        }

        let same_slot = |row: &RowPosition| row.half == key.half && row.slot == key.slot;
        BatterInfo {
            name: latest_value(rows, "batter", same_slot).unwrap_or_default(),
            side: latest_value(rows, "batter_side", same_slot).and_then(|s| Side::parse(&s)),
        }
    }

    /// Remembered pitcher, else the latest pitcher recorded in `rows` for the
    /// same half, else empty.
    pub fn prefill_pitcher(&self, key: &PlateAppearanceKey, rows: &SheetRows) -> PitcherInfo {
        let remembered = self.recall_pitcher(&PitcherKey::from(key));
        if !remembered.is_empty() {
            return remembered;
        }

        let same_half = |row: &RowPosition| row.half == key.half;
        PitcherInfo {
            name: latest_value(rows, "pitcher", same_half).unwrap_or_default(),
            side: latest_value(rows, "pitcher_side", same_half).and_then(|s| Side::parse(&s)),
        }
    }
}

/// Most recent non-blank value of `column` among rows accepted by `matches`.
pub fn latest_value<F>(rows: &SheetRows, column: &str, matches: F) -> Option<String>
where
    F: Fn(&RowPosition) -> bool,
{
    rows.positions()
        .iter()
        .rev()
        .filter(|row| matches(*row))
        .find_map(|row| {
            rows.cell(row.index, column)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
}
