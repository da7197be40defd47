use crate::card::Card;
use crate::error::BlackjackGameError;
use crate::game::hand::Hand;
use crate::shoe::Shoe;
use log::debug;

/// The dealer's hand. `hide_down_card` only affects how the hand is shown, never how it is valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerHand {
    pub hand: Hand,
    pub hide_down_card: bool,
}

impl Default for DealerHand {
    fn default() -> Self {
        DealerHand {
            hand: Hand::new(),
            hide_down_card: true,
        }
    }
}

impl DealerHand {
    /// Associated function to create a new, empty `DealerHand` with its down card hidden.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        DealerHand {
            hand: Hand::with_cards(cards),
            hide_down_card: true,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.hand.cards
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.add_card(card);
    }

    pub fn up_card(&self) -> Option<&Card> {
        self.hand.cards.first()
    }

    pub fn upcard_is_ace(&self) -> bool {
        self.up_card().map_or(false, |c| c.is_ace())
    }

    pub fn soft_total(&self) -> u8 {
        self.hand.soft_total()
    }

    pub fn hard_total(&self) -> u8 {
        self.hand.hard_total()
    }

    pub fn is_busted(&self) -> bool {
        self.hand.is_busted()
    }

    pub fn is_blackjack(&self) -> bool {
        self.hand.is_blackjack()
    }

    /// The total shown to the player: only the up card counts while the down card is hidden.
    pub fn visible_total(&self) -> u8 {
        if self.hide_down_card {
            self.up_card()
                .map_or(0, |c| Hand::with_cards(vec![*c]).soft_total())
        } else {
            self.soft_total()
        }
    }

    /// Returns true if the dealer must take another card. With `hits_soft_17` the dealer also draws on a
    /// soft 17, i.e. a 17 that is only reached by counting an ace as 11.
    pub fn should_hit(&self, hits_soft_17: bool) -> bool {
        let soft = self.soft_total();
        if soft < 17 {
            return true;
        }
        hits_soft_17 && soft == 17 && self.hard_total() < 17
    }

    /// Reveals the down card and draws until the house rules say stand.
    pub fn play(&mut self, shoe: &mut Shoe, hits_soft_17: bool) -> Result<(), BlackjackGameError> {
        self.hide_down_card = false;
        while self.should_hit(hits_soft_17) {
            self.add_card(shoe.next_card()?);
        }
        self.hand.played = true;
        debug!(
            "dealer stands on {}{}",
            self.soft_total(),
            if self.is_busted() { " (busted)" } else { "" }
        );
        Ok(())
    }
}
