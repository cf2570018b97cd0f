pub mod context;
pub mod state;

pub use context::SessionContext;
pub use state::{PlateAppearance, PlateAppearanceStatus};
