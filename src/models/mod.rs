pub mod game;
pub mod pitch;
pub mod plate_appearance;
pub mod sheet;

pub use game::{sanitize_partition_name, GameInfo};
pub use pitch::{
    BatterInfo, Pitch, PitchDraft, PitchEvent, PitchResult, PitcherInfo, RowId, Side, Situation,
    COLUMNS,
};
pub use plate_appearance::{Half, PlateAppearanceKey};
pub use sheet::{CellUpdate, RowPosition, SheetRows};
