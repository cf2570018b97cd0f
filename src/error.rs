use thiserror::Error;

use crate::{models::PlateAppearanceKey, store::StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("game information has not been set")]
    NoGame,

    #[error("no plate appearance is open")]
    NoPlateAppearance,

    #[error("plate appearance {0} is closed; move to another batter first")]
    PlateAppearanceClosed(PlateAppearanceKey),

    #[error("invalid plate appearance: {0}")]
    InvalidKey(String),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Store(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
