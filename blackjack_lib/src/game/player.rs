use crate::card::Card;
use crate::game::hand::Hand;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Maximum number of hands a player may hold after splitting.
pub const MAX_PLAYER_HANDS: usize = 7;

/// The actions a player may take on a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Split,
    Double,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Hit, Action::Stand, Action::Split, Action::Double];

    /// The key that selects this action.
    pub fn key(&self) -> char {
        match self {
            Action::Hit => 'h',
            Action::Stand => 's',
            Action::Split => 'p',
            Action::Double => 'd',
        }
    }

    pub fn from_key(key: char) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|a| a.key() == key.to_ascii_lowercase())
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Split => "split",
            Action::Double => "double",
        };
        write!(f, "{}", label)
    }
}

/// Settlement result of a player hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandStatus {
    #[default]
    Unknown,
    Won,
    Lost,
    Push,
}

/// Snapshot of the table's money and hand count, used to decide whether a new wager is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WagerContext {
    pub bankroll: u64,
    /// Sum of the wagers of every hand that has not been settled yet.
    pub outstanding: u64,
    pub hand_count: usize,
    pub max_hands: usize,
}

impl WagerContext {
    /// True if `wager` can be added on top of the outstanding wagers.
    pub fn can_afford(&self, wager: u64) -> bool {
        self.bankroll >= self.outstanding.saturating_add(wager)
    }
}

/// A hand played by the player along with its wager and settlement state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    pub hand: Hand,
    pub wager: u64,
    pub status: HandStatus,
    pub paid: bool,
    pub stood: bool,
    /// Set on both halves of a split. A split hand totalling 21 on two cards is not a natural.
    pub from_split: bool,
}

impl PlayerHand {
    /// Associated function to create an empty `PlayerHand` with the given wager.
    pub fn new(wager: u64) -> PlayerHand {
        PlayerHand {
            wager,
            ..Default::default()
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.hand.cards
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.add_card(card);
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
        !self.from_split && self.hand.is_blackjack()
    }

    pub fn is_played(&self) -> bool {
        self.hand.played
    }

    /// Returns true if the hand cannot act any further, marking it played.
    ///
    /// A hand that is found busted for the first time is settled on the spot: it is marked lost and its
    /// wager is taken from `bankroll`.
    pub fn is_done(&mut self, bankroll: &mut u64) -> bool {
        let done = self.hand.played
            || self.stood
            || self.is_blackjack()
            || self.is_busted()
            || self.soft_total() == 21
            || self.hard_total() == 21;
        if !done {
            return false;
        }

        self.hand.played = true;
        if !self.paid && self.is_busted() {
            self.paid = true;
            self.status = HandStatus::Lost;
            *bankroll = bankroll.saturating_sub(self.wager);
            info!("hand busted with {}, lost {}", self.hard_total(), self.wager);
        }
        true
    }

    pub fn can_hit(&self) -> bool {
        !(self.hand.played
            || self.stood
            || self.hard_total() == 21
            || self.is_blackjack()
            || self.is_busted())
    }

    pub fn can_stand(&self) -> bool {
        !(self.stood || self.is_busted() || self.is_blackjack())
    }

    pub fn can_double(&self, ctx: &WagerContext) -> bool {
        self.can_double_cards() && ctx.can_afford(self.wager)
    }

    pub fn can_split(&self, ctx: &WagerContext) -> bool {
        self.can_split_cards() && ctx.hand_count < ctx.max_hands && ctx.can_afford(self.wager)
    }

    /// Doubling rules that do not depend on money.
    pub(crate) fn can_double_cards(&self) -> bool {
        !(self.stood || self.hand.len() != 2 || self.is_blackjack())
    }

    /// Splitting rules that do not depend on money or the number of hands. Ranks must match, so a ten and a
    /// jack cannot be split even though both count 10.
    pub(crate) fn can_split_cards(&self) -> bool {
        !self.stood && self.hand.len() == 2 && self.hand.cards[0].rank() == self.hand.cards[1].rank()
    }

    /// Returns true if `action` is allowed on this hand.
    pub fn can(&self, action: Action, ctx: &WagerContext) -> bool {
        match action {
            Action::Hit => self.can_hit(),
            Action::Stand => self.can_stand(),
            Action::Split => self.can_split(ctx),
            Action::Double => self.can_double(ctx),
        }
    }

    pub fn stand(&mut self) {
        self.stood = true;
        self.hand.played = true;
    }

    /// Doubles the wager and ends the hand. The extra card is dealt by the table.
    pub fn double_down(&mut self, card: Card) {
        self.add_card(card);
        self.wager *= 2;
        self.hand.played = true;
    }

    /// Moves the second card into a new hand carrying the same wager and returns it.
    /// Panics if the hand does not hold exactly two cards.
    pub fn split_off(&mut self) -> PlayerHand {
        assert_eq!(self.hand.len(), 2, "only a two card hand can be split");
        let mut split = PlayerHand::new(self.wager);
        if let Some(card) = self.hand.cards.pop() {
            split.add_card(card);
        }
        self.from_split = true;
        split.from_split = true;
        split
    }

    /// Settles the hand against the dealer's final total, adjusting `bankroll`. Does nothing once paid.
    ///
    /// A natural's 3:2 payout is in whole cents, rounded down: a natural on 501 cents pays 751.
    pub fn pay(&mut self, dealer_total: u8, dealer_busted: bool, bankroll: &mut u64) {
        if self.paid {
            return;
        }
        self.paid = true;

        let total = self.soft_total();
        if dealer_busted || total > dealer_total {
            if self.is_blackjack() {
                self.wager = self.wager.saturating_mul(3) / 2;
            }
            *bankroll = bankroll.saturating_add(self.wager);
            self.status = HandStatus::Won;
        } else if total < dealer_total {
            *bankroll = bankroll.saturating_sub(self.wager);
            self.status = HandStatus::Lost;
        } else {
            self.status = HandStatus::Push;
        }
        info!(
            "settled hand {} vs dealer {}{}: {:?} {}",
            total,
            dealer_total,
            if dealer_busted { " (busted)" } else { "" },
            self.status,
            self.wager
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_hand(ranks: &[u8], wager: u64) -> PlayerHand {
        let mut h = PlayerHand::new(wager);
        for (i, &rank) in ranks.iter().enumerate() {
            h.add_card(Card::new(rank, (i % 4) as u8));
        }
        h
    }

    fn ctx(bankroll: u64, outstanding: u64) -> WagerContext {
        WagerContext {
            bankroll,
            outstanding,
            hand_count: 1,
            max_hands: MAX_PLAYER_HANDS,
        }
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(Action::from_key('h'), Some(Action::Hit));
        assert_eq!(Action::from_key('P'), Some(Action::Split));
        assert_eq!(Action::from_key('x'), None);
        assert_eq!(Action::Double.to_string(), "double");
    }

    #[test]
    fn test_pay_blackjack_is_three_to_two_and_idempotent() {
        let mut h = player_hand(&[0, 12], 1000);
        let mut bankroll = 10_000;
        h.pay(20, false, &mut bankroll);
        assert_eq!(bankroll, 11_500);
        assert_eq!(h.status, HandStatus::Won);
        assert!(h.paid);

        h.pay(20, false, &mut bankroll);
        assert_eq!(bankroll, 11_500);
    }

    #[test]
    fn test_natural_on_odd_wager_rounds_down() {
        let mut h = player_hand(&[0, 12], 501);
        let mut bankroll = 1000;
        h.pay(20, false, &mut bankroll);
        assert_eq!(h.wager, 751);
        assert_eq!(bankroll, 1751);
    }

    #[test]
    fn test_money_near_the_limit_does_not_overflow() {
        let mut h = player_hand(&[9, 8], 500);
        let mut bankroll = u64::MAX - 100;
        h.pay(17, false, &mut bankroll);
        assert_eq!(bankroll, u64::MAX);

        assert!(!ctx(u64::MAX - 1, u64::MAX).can_afford(500));
        assert!(ctx(u64::MAX, 500).can_afford(500));
    }

    #[test]
    fn test_pay_win_loss_push() {
        let mut bankroll = 1000;
        let mut win = player_hand(&[9, 8], 100);
        win.pay(18, false, &mut bankroll);
        assert_eq!((win.status, bankroll), (HandStatus::Won, 1100));

        let mut loss = player_hand(&[9, 6], 100);
        loss.pay(18, false, &mut bankroll);
        assert_eq!((loss.status, bankroll), (HandStatus::Lost, 1000));

        let mut push = player_hand(&[9, 7], 100);
        push.pay(18, false, &mut bankroll);
        assert_eq!((push.status, bankroll), (HandStatus::Push, 1000));

        let mut dealer_bust = player_hand(&[9, 1], 100);
        dealer_bust.pay(24, true, &mut bankroll);
        assert_eq!((dealer_bust.status, bankroll), (HandStatus::Won, 1100));
    }

    #[test]
    fn test_bust_is_settled_once() {
        let mut h = player_hand(&[9, 5, 8], 500);
        let mut bankroll = 2000;
        assert!(h.is_done(&mut bankroll));
        assert_eq!(bankroll, 1500);
        assert_eq!(h.status, HandStatus::Lost);
        assert!(h.is_done(&mut bankroll));
        h.pay(17, false, &mut bankroll);
        assert_eq!(bankroll, 1500);
    }

    #[test]
    fn test_is_done_conditions() {
        let mut bankroll = 1000;
        assert!(!player_hand(&[9, 5], 10).is_done(&mut bankroll));
        assert!(player_hand(&[0, 9], 10).is_done(&mut bankroll));
        assert!(player_hand(&[4, 5, 9], 10).is_done(&mut bankroll));
        let mut stood = player_hand(&[9, 5], 10);
        stood.stand();
        assert!(stood.is_done(&mut bankroll));
        assert_eq!(bankroll, 1000);
    }

    #[test]
    fn test_hit_and_stand_eligibility() {
        let h = player_hand(&[9, 5], 10);
        assert!(h.can_hit());
        assert!(h.can_stand());

        let bj = player_hand(&[0, 11], 10);
        assert!(!bj.can_hit());
        assert!(!bj.can_stand());

        let bust = player_hand(&[9, 5, 9], 10);
        assert!(!bust.can_hit());
        assert!(!bust.can_stand());

        let mut stood = player_hand(&[9, 5], 10);
        stood.stand();
        assert!(!stood.can_hit());
        assert!(!stood.can_stand());
    }

    #[test]
    fn test_split_requires_equal_ranks() {
        let mut ten_jack = PlayerHand::new(10);
        ten_jack.add_card(Card::new(9, 0));
        ten_jack.add_card(Card::new(10, 1));
        assert!(!ten_jack.can_split(&ctx(1000, 10)));

        let eights = player_hand(&[7, 7], 10);
        assert!(eights.can_split(&ctx(1000, 10)));
        assert!(!player_hand(&[7, 7, 1], 10).can_split(&ctx(1000, 10)));
    }

    #[test]
    fn test_split_and_double_need_bankroll() {
        let eights = player_hand(&[7, 7], 500);
        assert!(eights.can_split(&ctx(1000, 500)));
        assert!(eights.can_double(&ctx(1000, 500)));
        assert!(!eights.can_split(&ctx(999, 500)));
        assert!(!eights.can_double(&ctx(999, 500)));
    }

    #[test]
    fn test_split_respects_hand_cap() {
        let eights = player_hand(&[7, 7], 10);
        let full = WagerContext {
            hand_count: MAX_PLAYER_HANDS,
            ..ctx(10_000, 70)
        };
        assert!(!eights.can_split(&full));
    }

    #[test]
    fn test_double_not_on_blackjack_or_three_cards() {
        assert!(!player_hand(&[0, 9], 10).can_double(&ctx(1000, 10)));
        assert!(!player_hand(&[1, 2, 3], 10).can_double(&ctx(1000, 10)));
        assert!(player_hand(&[4, 5], 10).can_double(&ctx(1000, 10)));
    }

    #[test]
    fn test_double_down_and_split_off() {
        let mut h = player_hand(&[4, 5], 100);
        h.double_down(Card::new(9, 0));
        assert_eq!(h.wager, 200);
        assert!(h.is_played());
        assert_eq!(h.cards().len(), 3);

        let mut pair = player_hand(&[7, 7], 100);
        let split = pair.split_off();
        assert_eq!(pair.cards().len(), 1);
        assert_eq!(split.cards().len(), 1);
        assert_eq!(split.wager, 100);
        assert_eq!(split.cards()[0].rank(), 7);
        assert!(pair.from_split && split.from_split);
    }

    #[test]
    fn test_split_twenty_one_is_not_a_natural() {
        let mut aces = player_hand(&[0, 0], 100);
        let mut split = aces.split_off();
        aces.add_card(Card::new(12, 0));
        split.add_card(Card::new(9, 0));
        assert_eq!(aces.soft_total(), 21);
        assert!(!aces.is_blackjack());

        let mut bankroll = 1000;
        aces.pay(20, false, &mut bankroll);
        assert_eq!(bankroll, 1100);
    }
}
