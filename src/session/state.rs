use serde::Serialize;

use crate::{
    count::{self, Count},
    models::{PitchResult, PlateAppearanceKey},
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PlateAppearanceStatus {
    #[default]
    Open,
    /// Terminal for this occurrence of the key.
    Closed,
}

/// The at-bat currently being scored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateAppearance {
    pub key: PlateAppearanceKey,
    pub status: PlateAppearanceStatus,
    pub count: Count,
    /// Pitches recorded in this occurrence so far.
    pub pitches: u32,
}

impl PlateAppearance {
    pub fn open(key: PlateAppearanceKey) -> Self {
        Self {
            key,
            status: PlateAppearanceStatus::Open,
            count: Count::default(),
            pitches: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PlateAppearanceStatus::Open
    }

    /// Applies a recorded pitch. An appearance-ending pitch closes this
    /// occurrence and resets the count for whoever bats next.
    pub fn apply(&mut self, result: PitchResult) {
        self.pitches += 1;
        if result.ends_plate_appearance() {
            self.status = PlateAppearanceStatus::Closed;
            self.count = Count::default();
        } else {
            self.count = count::advance(result, self.count);
        }
    }

    /// Rebuilds state from the pitches still recorded for this occurrence,
    /// oldest first.
    pub fn replay(key: PlateAppearanceKey, results: &[PitchResult]) -> Self {
        let mut state = Self::open(key);
        for result in results {
            state.apply(*result);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Half, test_support::key};

    #[test]
    fn appearance_end_closes_and_resets_count() {
        let mut pa = PlateAppearance::open(key(3, Half::Top, 4));
        pa.apply(PitchResult::Ball);
        pa.apply(PitchResult::Foul);
        assert_eq!(pa.count, Count::new(1, 1));
        assert!(pa.is_open());

        pa.apply(PitchResult::PlateAppearanceEnd);
        assert_eq!(pa.status, PlateAppearanceStatus::Closed);
        assert_eq!(pa.count, Count::default());
        assert_eq!(pa.pitches, 3);
    }

    #[test]
    fn replay_matches_incremental_application() {
        let results = [PitchResult::Ball, PitchResult::CalledStrike, PitchResult::Ball];
        let pa = PlateAppearance::replay(key(1, Half::Bottom, 2), &results);
        assert_eq!(pa.count, Count::new(1, 2));
        assert_eq!(pa.pitches, 3);
        assert!(pa.is_open());
    }
}
