use serde::{Deserialize, Serialize};
use std::fmt;

use super::game::GameInfo;

pub const MIN_SLOT: u8 = 1;
pub const MAX_SLOT: u8 = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn as_str(&self) -> &'static str {
        match self {
            Half::Top => "top",
            Half::Bottom => "bottom",
        }
    }

    /// Accepts the labels written by this crate and the ones older sheets use.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "top" | "Top" | "TOP" | "表" => Some(Half::Top),
            "bottom" | "Bottom" | "BOTTOM" | "裏" => Some(Half::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (inning, half, slot) within one game. Not unique across a game: the same
/// slot comes up again on the next trip through the order, so occurrences are
/// told apart by ledger order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateAppearanceKey {
    pub game: GameInfo,
    pub inning: u32,
    pub half: Half,
    pub slot: u8,
}

impl PlateAppearanceKey {
    pub fn new(game: GameInfo, inning: u32, half: Half, slot: u8) -> Self {
        Self {
            game,
            inning,
            half,
            slot,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.inning >= 1 && (MIN_SLOT..=MAX_SLOT).contains(&self.slot)
    }

    /// Next slot in the order, 9 wrapping to 1, same inning and half.
    pub fn next_slot(&self) -> Self {
        Self {
            slot: (self.slot % MAX_SLOT) + 1,
            ..self.clone()
        }
    }

    /// Top goes to bottom of the same inning, bottom goes to top of the next;
    /// the order restarts at slot 1. `None` once the inning number is
    /// exhausted.
    pub fn flip_half(&self) -> Option<Self> {
        let (inning, half) = match self.half {
            Half::Top => (self.inning, Half::Bottom),
            Half::Bottom => (self.inning.checked_add(1)?, Half::Top),
        };
        Some(Self {
            game: self.game.clone(),
            inning,
            half,
            slot: MIN_SLOT,
        })
    }

    pub fn position(&self) -> (u32, Half, u8) {
        (self.inning, self.half, self.slot)
    }

    pub fn same_position(&self, inning: u32, half: Half, slot: u8) -> bool {
        self.inning == inning && self.half == half && self.slot == slot
    }
}

impl fmt::Display for PlateAppearanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} #{}", self.inning, self.half, self.slot)
    }
}
