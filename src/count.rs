//! Ball/strike count carried through a plate appearance.
//!
//! Every recorded pitch stores the count as it stood before the pitch; the
//! count is then advanced by the pitch result. Counts saturate at two strikes
//! and three balls. Resetting for a new plate appearance is the caller's job.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::PitchResult;

pub const MAX_STRIKES: u8 = 2;
pub const MAX_BALLS: u8 = 3;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", from = "CountRecord")]
pub struct Count {
    strikes: u8,
    balls: u8,
}

#[derive(Deserialize)]
struct CountRecord {
    #[serde(default)]
    strikes: u8,
    #[serde(default)]
    balls: u8,
}

impl From<CountRecord> for Count {
    fn from(record: CountRecord) -> Self {
        Self::new(record.strikes, record.balls)
    }
}

impl Count {
    /// Builds a count, saturating values beyond the caps.
    pub fn new(strikes: u8, balls: u8) -> Self {
        Self {
            strikes: strikes.min(MAX_STRIKES),
            balls: balls.min(MAX_BALLS),
        }
    }

    pub fn strikes(&self) -> u8 {
        self.strikes
    }

    pub fn balls(&self) -> u8 {
        self.balls
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.balls, self.strikes)
    }
}

/// Snapshot attached to the pitch about to be recorded.
pub fn count_before(count: Count) -> Count {
    count
}

/// Count after a pitch with `result`. Never fails; a foul or strike with two
/// strikes already on the board leaves the count unchanged.
pub fn advance(result: PitchResult, count: Count) -> Count {
    match result {
        PitchResult::CalledStrike | PitchResult::SwingingStrike | PitchResult::Foul => Count {
            strikes: count.strikes.saturating_add(1).min(MAX_STRIKES),
            ..count
        },
        PitchResult::Ball => Count {
            balls: count.balls.saturating_add(1).min(MAX_BALLS),
            ..count
        },
        PitchResult::Pickoff | PitchResult::PlateAppearanceEnd | PitchResult::Other => count,
    }
}

/// Pre-pitch counts for a whole sequence, starting from 0-0.
pub fn replay(results: &[PitchResult]) -> Vec<Count> {
    let mut count = Count::default();
    results
        .iter()
        .map(|result| {
            let before = count_before(count);
            count = advance(*result, count);
            before
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_result() -> impl Strategy<Value = PitchResult> {
        prop_oneof![
            Just(PitchResult::CalledStrike),
            Just(PitchResult::SwingingStrike),
            Just(PitchResult::Ball),
            Just(PitchResult::Foul),
            Just(PitchResult::Pickoff),
            Just(PitchResult::Other),
        ]
    }

    #[test]
    fn strikes_and_fouls_add_a_strike() {
        let count = Count::default();
        assert_eq!(advance(PitchResult::CalledStrike, count), Count::new(1, 0));
        assert_eq!(advance(PitchResult::SwingingStrike, count), Count::new(1, 0));
        assert_eq!(advance(PitchResult::Foul, count), Count::new(1, 0));
    }

    #[test]
    fn foul_with_two_strikes_does_not_add_a_third() {
        let count = Count::new(2, 1);
        assert_eq!(advance(PitchResult::Foul, count), count);
        assert_eq!(advance(PitchResult::SwingingStrike, count), count);
    }

    #[test]
    fn balls_cap_at_three() {
        assert_eq!(advance(PitchResult::Ball, Count::new(0, 3)), Count::new(0, 3));
        assert_eq!(advance(PitchResult::Ball, Count::new(0, 2)), Count::new(0, 3));
    }

    #[test]
    fn pickoff_and_appearance_end_leave_count_alone() {
        let count = Count::new(1, 2);
        assert_eq!(advance(PitchResult::Pickoff, count), count);
        assert_eq!(advance(PitchResult::PlateAppearanceEnd, count), count);
        assert_eq!(advance(PitchResult::Other, count), count);
    }

    #[test]
    fn new_saturates() {
        assert_eq!(Count::new(7, 9), Count::new(2, 3));
    }

    #[test]
    fn decoded_counts_are_capped() {
        let count: Count = serde_json::from_str(r#"{"strikes":9,"balls":255}"#).unwrap();
        assert_eq!(count, Count::new(2, 3));
        assert_eq!(advance(PitchResult::Ball, count), Count::new(2, 3));
        assert_eq!(advance(PitchResult::Foul, count), Count::new(2, 3));
    }

    #[test]
    fn replay_reports_pre_pitch_counts() {
        let results = [
            PitchResult::Ball,
            PitchResult::Ball,
            PitchResult::CalledStrike,
            PitchResult::Foul,
            PitchResult::PlateAppearanceEnd,
        ];
        let counts = replay(&results);
        let balls: Vec<u8> = counts.iter().map(Count::balls).collect();
        let strikes: Vec<u8> = counts.iter().map(Count::strikes).collect();
        assert_eq!(balls, vec![0, 1, 2, 2, 2]);
        assert_eq!(strikes, vec![0, 0, 0, 1, 2]);
    }

    proptest! {
        #[test]
        fn advance_never_exceeds_caps(results in prop::collection::vec(any_result(), 0..40)) {
            let mut count = Count::default();
            for result in results {
                count = advance(result, count);
                prop_assert!(count.strikes() <= MAX_STRIKES);
                prop_assert!(count.balls() <= MAX_BALLS);
            }
        }

        #[test]
        fn counts_never_decrease_within_appearance(results in prop::collection::vec(any_result(), 1..40)) {
            let counts = replay(&results);
            for pair in counts.windows(2) {
                prop_assert!(pair[1].strikes() >= pair[0].strikes());
                prop_assert!(pair[1].balls() >= pair[0].balls());
            }
        }

        #[test]
        fn replay_matches_iterated_advance(results in prop::collection::vec(any_result(), 0..40)) {
            let recorded = replay(&results);
            let mut count = Count::default();
            for (result, before) in results.iter().zip(recorded.iter()) {
                prop_assert_eq!(*before, count);
                count = advance(*result, count);
            }
        }
    }
}
