//! Moves the scorekeeping pointer to the next recorded plate appearance.
//!
//! Rows arrive as they are recorded and may be stored out of order or with
//! gaps, so every lookup filters on inning, half and slot instead of relying
//! on row position.

use serde::Serialize;

use crate::models::{PlateAppearanceKey, RowPosition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "key")]
pub enum Advance {
    Next(PlateAppearanceKey),
    /// Nothing has been recorded past the current plate appearance yet. The
    /// caller stops auto-advancing; this is not an error.
    GameEnded,
}

/// Next slot in the same half if it has rows, else slot 1 of the following
/// half if it has rows, else [`Advance::GameEnded`].
pub fn next(current: &PlateAppearanceKey, existing: &[RowPosition]) -> Advance {
    let candidates = [Some(current.next_slot()), current.flip_half()];

    for candidate in candidates.into_iter().flatten() {
        let recorded = existing
            .iter()
            .any(|row| candidate.same_position(row.inning, row.half, row.slot));
        if recorded {
            return Advance::Next(candidate);
        }
    }

    Advance::GameEnded
}
