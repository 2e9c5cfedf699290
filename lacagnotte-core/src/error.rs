use thiserror::Error;

pub type Result<T> = std::result::Result<T, LotteryError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LotteryError {
    /// Paramètre fourni par l'appelant hors des bornes documentées.
    #[error("configuration invalide : {0}")]
    InvalidConfiguration(String),
    /// Invariant interne violé en cours de calcul.
    #[error("état invalide : {0}")]
    InvalidState(String),
}

impl LotteryError {
    pub fn config(msg: impl Into<String>) -> Self {
        LotteryError::InvalidConfiguration(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        LotteryError::InvalidState(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, LotteryError::InvalidConfiguration(_))
    }

    pub fn is_state(&self) -> bool {
        matches!(self, LotteryError::InvalidState(_))
    }
}
