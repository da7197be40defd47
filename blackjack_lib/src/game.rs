//! Module for the rules of a single player game of blackjack: hand valuation, the player's and dealer's hands,
//! and the table that runs a round from the deal through settlement.

pub mod dealer;
pub mod hand;
pub mod player;
pub mod table;
pub mod prelude {
    pub use crate::game::dealer::DealerHand;
    pub use crate::game::hand::{hand_value, CountMethod, Hand};
    pub use crate::game::player::{Action, HandStatus, PlayerHand, WagerContext, MAX_PLAYER_HANDS};
    pub use crate::game::table::{Phase, Table};
}

pub use prelude::*;
