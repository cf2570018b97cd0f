//! Pitch records and their tabular row layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{
    game::GameInfo,
    plate_appearance::{Half, PlateAppearanceKey},
};
use crate::{
    count::Count,
    zone::{GridCell, Zone},
};

/// Column order used when a partition is first written. Columns discovered
/// later are appended to the right, never inserted.
pub const COLUMNS: [&str; 29] = [
    "row_id",
    "date",
    "top_team",
    "bottom_team",
    "inning",
    "top_bottom",
    "order",
    "batter",
    "batter_side",
    "pitcher",
    "pitcher_side",
    "runner_1b",
    "runner_2b",
    "runner_3b",
    "grid_col",
    "grid_row",
    "zone",
    "pitch_type",
    "pitch_result",
    "strike_count",
    "ball_count",
    "pitch_in_atbat",
    "atbat_result",
    "batted_type",
    "batted_position",
    "batted_outcome",
    "strategy",
    "strategy_result",
    "outs",
];

pub const ROW_ID_COLUMN: &str = "row_id";
pub const INNING_COLUMN: &str = "inning";
pub const HALF_COLUMN: &str = "top_bottom";
pub const SLOT_COLUMN: &str = "order";

/// Opaque, never-reused identifier of a recorded pitch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(String);

impl RowId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PitchResult {
    CalledStrike,
    SwingingStrike,
    Ball,
    Foul,
    Pickoff,
    PlateAppearanceEnd,
    Other,
}

impl PitchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchResult::CalledStrike => "called_strike",
            PitchResult::SwingingStrike => "swinging_strike",
            PitchResult::Ball => "ball",
            PitchResult::Foul => "foul",
            PitchResult::Pickoff => "pickoff",
            PitchResult::PlateAppearanceEnd => "plate_appearance_end",
            PitchResult::Other => "other",
        }
    }

    pub fn ends_plate_appearance(&self) -> bool {
        matches!(self, PitchResult::PlateAppearanceEnd)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Right,
    Left,
    Switch,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Right => "R",
            Side::Left => "L",
            Side::Switch => "S",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "R" | "r" | "右" => Some(Side::Right),
            "L" | "l" | "左" => Some(Side::Left),
            "S" | "s" | "両" => Some(Side::Switch),
            _ => None,
        }
    }
}

/// Batter identity remembered per batting slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatterInfo {
    pub name: String,
    pub side: Option<Side>,
}

impl BatterInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.side.is_none()
    }
}

/// Pitcher identity remembered per half-inning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PitcherInfo {
    pub name: String,
    pub side: Option<Side>,
}

impl PitcherInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.side.is_none()
    }
}

/// Runners and outs at the moment of the pitch. Empty runner names mean the
/// base is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Situation {
    pub runner_1b: String,
    pub runner_2b: String,
    pub runner_3b: String,
    pub outs: u8,
}

/// What the host collects for a single pitch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchDraft {
    pub grid_col: i64,
    pub grid_row: i64,
    pub pitch_type: Option<String>,
    pub pitch_result: PitchResult,
    /// Kept only when `pitch_result` ends the plate appearance.
    pub at_bat_result: Option<String>,
    pub batted_type: Option<String>,
    pub batted_position: Option<String>,
    pub batted_outcome: Option<String>,
    pub strategy: Option<String>,
    pub strategy_result: Option<String>,
}

impl PitchDraft {
    pub fn new(grid_col: i64, grid_row: i64, pitch_result: PitchResult) -> Self {
        Self {
            grid_col,
            grid_row,
            pitch_type: None,
            pitch_result,
            at_bat_result: None,
            batted_type: None,
            batted_position: None,
            batted_outcome: None,
            strategy: None,
            strategy_result: None,
        }
    }
}

/// A pitch before it has been given a row id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pitch {
    pub key: PlateAppearanceKey,
    pub batter: BatterInfo,
    pub pitcher: PitcherInfo,
    pub situation: Situation,
    pub grid: GridCell,
    pub pitch_type: Option<String>,
    pub pitch_result: PitchResult,
    /// Count immediately preceding this pitch.
    pub count_before: Count,
    pub pitch_in_atbat: u32,
    pub at_bat_result: Option<String>,
    pub batted_type: Option<String>,
    pub batted_position: Option<String>,
    pub batted_outcome: Option<String>,
    pub strategy: Option<String>,
    pub strategy_result: Option<String>,
}

impl Pitch {
    /// Derived from the grid cell; there is no stored copy to drift.
    pub fn zone(&self) -> Zone {
        self.grid.zone()
    }

    pub fn game(&self) -> &GameInfo {
        &self.key.game
    }

    pub fn half(&self) -> Half {
        self.key.half
    }
}

/// A pitch that has been assigned its row id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchEvent {
    pub row_id: RowId,
    pub pitch: Pitch,
}

impl PitchEvent {
    pub fn new(row_id: RowId, pitch: Pitch) -> Self {
        Self { row_id, pitch }
    }

    /// Column name and cell text in [`COLUMNS`] order.
    pub fn cells(&self) -> Vec<(&'static str, String)> {
        let pitch = &self.pitch;
        let game = pitch.game();
        let at_bat_result = if pitch.pitch_result.ends_plate_appearance() {
            pitch.at_bat_result.clone()
        } else {
            None
        };

        let values = [
            self.row_id.to_string(),
            game.date_str(),
            game.top_team().to_string(),
            game.bottom_team().to_string(),
            pitch.key.inning.to_string(),
            pitch.key.half.as_str().to_string(),
            pitch.key.slot.to_string(),
            pitch.batter.name.clone(),
            side_cell(pitch.batter.side),
            pitch.pitcher.name.clone(),
            side_cell(pitch.pitcher.side),
            pitch.situation.runner_1b.clone(),
            pitch.situation.runner_2b.clone(),
            pitch.situation.runner_3b.clone(),
            pitch.grid.col().to_string(),
            pitch.grid.row().to_string(),
            pitch.zone().as_str().to_string(),
            optional_cell(&pitch.pitch_type),
            pitch.pitch_result.as_str().to_string(),
            pitch.count_before.strikes().to_string(),
            pitch.count_before.balls().to_string(),
            pitch.pitch_in_atbat.to_string(),
            optional_cell(&at_bat_result),
            optional_cell(&pitch.batted_type),
            optional_cell(&pitch.batted_position),
            optional_cell(&pitch.batted_outcome),
            optional_cell(&pitch.strategy),
            optional_cell(&pitch.strategy_result),
            pitch.situation.outs.to_string(),
        ];

        COLUMNS.iter().copied().zip(values).collect()
    }

    /// Cell values laid out under `header`; columns the event has no value for
    /// are left blank.
    pub fn values_for_header(&self, header: &[String]) -> Vec<String> {
        let cells = self.cells();
        header
            .iter()
            .map(|column| {
                cells
                    .iter()
                    .find(|(name, _)| *name == column.as_str())
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default()
            })
            .collect()
    }
}

fn side_cell(side: Option<Side>) -> String {
    side.map(|s| s.as_str().to_string()).unwrap_or_default()
}

fn optional_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
