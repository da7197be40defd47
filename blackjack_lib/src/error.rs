use crate::game::player::Action;
use crate::game::table::Phase;
use thiserror::Error;

/// Errors produced by the blackjack engine.
///
/// `InvalidAction`, `InsufficientBankroll`, `OutOfTurn` and `MalformedSaveRecord` are recoverable and are
/// meant to be handled where they occur (re-prompt, reject the wager, fall back to defaults). `ShoeExhausted` comes
/// from `Shoe::draw` on an empty shoe; rounds draw through `Shoe::next_card`, which rebuilds instead.
#[derive(Debug, Error)]
pub enum BlackjackGameError {
    #[error("{0} is not available for the current hand")]
    InvalidAction(Action),

    #[error("insufficient bankroll: {needed} needed, {available} available")]
    InsufficientBankroll { needed: u64, available: u64 },

    #[error("cannot {0} during the {1:?} phase")]
    OutOfTurn(&'static str, Phase),

    #[error("the shoe ran out of cards")]
    ShoeExhausted,

    #[error("malformed save record: {0}")]
    MalformedSaveRecord(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BlackjackGameError {
    /// Returns true for errors the caller can recover from by re-prompting or falling back to defaults.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BlackjackGameError::InvalidAction(_)
                | BlackjackGameError::InsufficientBankroll { .. }
                | BlackjackGameError::OutOfTurn(..)
                | BlackjackGameError::MalformedSaveRecord(_)
        )
    }
}
