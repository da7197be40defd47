//! Rules and state engine for single player blackjack against a dealer. All amounts are integer cents.

pub mod card;
pub mod config;
pub mod error;
pub mod game;
pub mod save;
pub mod shoe;

pub use card::{Card, FaceType};
pub use config::{TableConfig, TableConfigBuilder};
pub use error::BlackjackGameError;
pub use game::prelude::*;
pub use save::{SaveRecord, SAVE_FILE};
pub use shoe::{default_penetration_threshold, DeckType, Shoe};

pub mod prelude {
    pub use super::{
        game::prelude::*, BlackjackGameError, Card, DeckType, FaceType, SaveRecord, Shoe,
        TableConfig, TableConfigBuilder,
    };
}
