//! Game identity and ledger partition naming.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Characters the tabular backend refuses in partition names.
const FORBIDDEN_NAME_CHARS: [char; 9] = [':', '/', '\\', '?', '*', '[', ']', '\r', '\n'];

pub const MAX_PARTITION_NAME_CHARS: usize = 100;

const DEFAULT_TOP_TEAM: &str = "TopTeam";
const DEFAULT_BOTTOM_TEAM: &str = "BottomTeam";

/// Date plus team pairing; identifies one ledger partition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", from = "GameInfoRecord")]
pub struct GameInfo {
    date: NaiveDate,
    top_team: String,
    bottom_team: String,
}

/// Wire shape of [`GameInfo`]; decoded values go through [`GameInfo::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameInfoRecord {
    date: NaiveDate,
    #[serde(default)]
    top_team: String,
    #[serde(default)]
    bottom_team: String,
}

impl From<GameInfoRecord> for GameInfo {
    fn from(record: GameInfoRecord) -> Self {
        Self::new(record.date, &record.top_team, &record.bottom_team)
    }
}

impl GameInfo {
    pub fn new(date: NaiveDate, top_team: &str, bottom_team: &str) -> Self {
        let top_team = match top_team.trim() {
            "" => DEFAULT_TOP_TEAM,
            name => name,
        };
        let bottom_team = match bottom_team.trim() {
            "" => DEFAULT_BOTTOM_TEAM,
            name => name,
        };

        Self {
            date,
            top_team: top_team.to_string(),
            bottom_team: bottom_team.to_string(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn top_team(&self) -> &str {
        &self.top_team
    }

    pub fn bottom_team(&self) -> &str {
        &self.bottom_team
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `{date}_{top}_vs_{bottom}`, sanitized for the backend.
    pub fn partition_name(&self) -> String {
        sanitize_partition_name(&format!(
            "{}_{}_vs_{}",
            self.date_str(),
            self.top_team,
            self.bottom_team
        ))
    }
}

/// Replaces forbidden characters with a space, trims, and truncates to
/// [`MAX_PARTITION_NAME_CHARS`] characters (not bytes).
pub fn sanitize_partition_name(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if FORBIDDEN_NAME_CHARS.contains(&c) { ' ' } else { c })
        .collect();

    replaced
        .trim()
        .chars()
        .take(MAX_PARTITION_NAME_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 12).unwrap()
    }

    #[test]
    fn partition_name_joins_date_and_teams() {
        let game = GameInfo::new(date(), " Hawks ", "Owls");
        assert_eq!(game.partition_name(), "2025-04-12_Hawks_vs_Owls");
    }

    #[test]
    fn blank_team_names_fall_back_to_defaults() {
        let game = GameInfo::new(date(), "  ", "");
        assert_eq!(game.partition_name(), "2025-04-12_TopTeam_vs_BottomTeam");
    }

    #[test]
    fn decoding_applies_the_same_defaults() {
        let game: GameInfo =
            serde_json::from_str(r#"{"date":"2025-04-12","topTeam":"  Hawks ","bottomTeam":""}"#)
                .unwrap();
        assert_eq!(game.top_team(), "Hawks");
        assert_eq!(game.bottom_team(), "BottomTeam");
        assert_eq!(game, GameInfo::new(date(), "Hawks", ""));
    }

    #[test]
    fn forbidden_characters_become_spaces() {
        let name = sanitize_partition_name("a:b/c\\d?e*f[g]h\ri\nj");
        assert_eq!(name, "a b c d e f g h i j");
    }

    #[test]
    fn long_names_truncate_by_characters() {
        let raw = "野".repeat(150);
        let name = sanitize_partition_name(&raw);
        assert_eq!(name.chars().count(), MAX_PARTITION_NAME_CHARS);
    }
}
