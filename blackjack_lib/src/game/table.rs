use crate::card::FaceType;
use crate::config::TableConfig;
use crate::error::BlackjackGameError;
use crate::game::dealer::DealerHand;
use crate::game::player::{Action, PlayerHand, WagerContext};
use crate::save::SaveRecord;
use crate::shoe::{DeckType, Shoe};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Where the table is in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player to deal, change the bet, or change options.
    Betting,
    /// The dealer shows an ace and the player has to take or decline insurance.
    Insurance,
    /// Waiting for an action on the current player hand.
    PlayerTurn,
    /// Every hand has been settled. The hands stay on the table until the next deal.
    RoundOver,
}

/// Struct for a single player blackjack table. Owns the shoe, every hand in play and the player's money.
pub struct Table {
    config: TableConfig,
    shoe: Shoe,
    bankroll: u64,
    current_bet: u64,
    player_hands: Vec<PlayerHand>,
    current_hand: usize,
    dealer_hand: DealerHand,
    insurance: u64,
    phase: Phase,
    face_type: FaceType,
}

impl Table {
    /// Associated function to create a new `Table` with a freshly shuffled shoe.
    pub fn new(config: TableConfig) -> Result<Table, BlackjackGameError> {
        config.validate()?;
        let shoe = Shoe::new(
            config.num_decks,
            config.deck_type,
            config.penetration_threshold,
            config.seed,
        );
        Table::with_shoe(config, shoe)
    }

    /// Creates a `Table` that deals from `shoe`.
    pub fn with_shoe(config: TableConfig, shoe: Shoe) -> Result<Table, BlackjackGameError> {
        config.validate()?;
        let mut table = Table {
            config,
            shoe,
            bankroll: config.starting_bankroll,
            current_bet: config.starting_bet,
            player_hands: Vec::new(),
            current_hand: 0,
            dealer_hand: DealerHand::new(),
            insurance: 0,
            phase: Phase::Betting,
            face_type: config.face_type,
        };
        table.normalize_bet();
        Ok(table)
    }

    /// Restores the bankroll, bet and deck count from a save record. A deck count outside 1 to 8 is ignored.
    pub fn restore(&mut self, record: SaveRecord) {
        if (1..=8).contains(&record.num_decks) {
            if record.num_decks != self.shoe.num_decks() {
                self.shoe.set_num_decks(record.num_decks);
            }
        } else {
            warn!("ignoring saved deck count {}", record.num_decks);
        }
        self.bankroll = record.bankroll;
        self.current_bet = record.current_bet;
        self.refill_if_broke();
        self.normalize_bet();
    }

    /// The state to persist between runs.
    pub fn save_record(&self) -> SaveRecord {
        SaveRecord {
            num_decks: self.shoe.num_decks(),
            bankroll: self.bankroll,
            current_bet: self.current_bet,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn bankroll(&self) -> u64 {
        self.bankroll
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player_hands(&self) -> &[PlayerHand] {
        &self.player_hands
    }

    pub fn current_hand_index(&self) -> usize {
        self.current_hand
    }

    pub fn current_player_hand(&self) -> Option<&PlayerHand> {
        self.player_hands.get(self.current_hand)
    }

    pub fn dealer_hand(&self) -> &DealerHand {
        &self.dealer_hand
    }

    /// The insurance wager placed this round, zero if none.
    pub fn insurance(&self) -> u64 {
        self.insurance
    }

    pub fn face_type(&self) -> FaceType {
        self.face_type
    }

    pub fn set_face_type(&mut self, face_type: FaceType) {
        self.face_type = face_type;
    }

    /// Changes the number of decks, rebuilding the shoe. Only allowed between rounds.
    pub fn set_num_decks(&mut self, num_decks: usize) -> Result<(), BlackjackGameError> {
        self.require_between_rounds("change the number of decks")?;
        if !(1..=8).contains(&num_decks) {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "number of decks must be between 1 and 8, got {num_decks}"
            )));
        }
        self.shoe.set_num_decks(num_decks);
        Ok(())
    }

    /// Changes the deck type, rebuilding the shoe. Only allowed between rounds.
    pub fn set_deck_type(&mut self, deck_type: DeckType) -> Result<(), BlackjackGameError> {
        self.require_between_rounds("change the deck type")?;
        self.shoe.set_deck_type(deck_type);
        Ok(())
    }

    /// Sum of the wagers of all hands that are not settled yet.
    pub fn outstanding_wagers(&self) -> u64 {
        self.player_hands
            .iter()
            .filter(|h| !h.paid)
            .map(|h| h.wager)
            .sum()
    }

    /// The money and hand count a hand needs to decide whether it may double or split.
    pub fn wager_context(&self) -> WagerContext {
        WagerContext {
            bankroll: self.bankroll,
            outstanding: self.outstanding_wagers(),
            hand_count: self.player_hands.len(),
            max_hands: self.config.max_player_hands,
        }
    }

    pub fn more_hands_to_play(&self) -> bool {
        self.current_hand + 1 < self.player_hands.len()
    }

    /// The actions the current hand allows, empty outside of the player's turn.
    pub fn available_actions(&self) -> Vec<Action> {
        let ctx = self.wager_context();
        match (self.phase, self.current_player_hand()) {
            (Phase::PlayerTurn, Some(hand)) => Action::ALL
                .into_iter()
                .filter(|&a| hand.can(a, &ctx))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Clamps the current bet to the table limits, then to the bankroll.
    pub fn normalize_bet(&mut self) {
        if self.current_bet < self.config.min_bet {
            self.current_bet = self.config.min_bet;
        } else if self.current_bet > self.config.max_bet {
            self.current_bet = self.config.max_bet;
        }

        if self.current_bet > self.bankroll {
            self.current_bet = self.bankroll;
        }
    }

    /// Sets a new bet, clamped by `normalize_bet`, and returns the bet actually in place.
    pub fn set_bet(&mut self, bet: u64) -> Result<u64, BlackjackGameError> {
        self.require_between_rounds("change the bet")?;
        self.current_bet = bet;
        self.normalize_bet();
        if self.current_bet != bet {
            debug!("bet of {bet} adjusted to {}", self.current_bet);
        }
        Ok(self.current_bet)
    }

    /// Starts a new round: reshuffles if the shoe is at its threshold, then deals player, dealer, player, dealer.
    pub fn deal(&mut self) -> Result<Phase, BlackjackGameError> {
        self.require_between_rounds("deal")?;
        self.refill_if_broke();
        self.normalize_bet();

        if self.shoe.needs_to_shuffle() {
            info!("{} cards left, reshuffling", self.shoe.remaining());
            self.shoe.rebuild();
        }

        self.player_hands.clear();
        self.current_hand = 0;
        self.insurance = 0;
        self.dealer_hand = DealerHand::new();

        let mut hand = PlayerHand::new(self.current_bet);
        hand.add_card(self.shoe.next_card()?);
        self.dealer_hand.add_card(self.shoe.next_card()?);
        hand.add_card(self.shoe.next_card()?);
        self.dealer_hand.add_card(self.shoe.next_card()?);
        debug!(
            "dealt {} against dealer {}",
            hand.hand.faces(FaceType::Ascii),
            self.dealer_hand.hand.faces(FaceType::Ascii)
        );

        let offer_insurance = self.dealer_hand.upcard_is_ace() && !hand.is_blackjack();
        self.player_hands.push(hand);

        if offer_insurance {
            self.phase = Phase::Insurance;
            return Ok(self.phase);
        }
        self.phase = Phase::PlayerTurn;
        self.advance()
    }

    /// Places an insurance wager of half the bet. It pays 2:1 if the dealer holds a blackjack.
    pub fn take_insurance(&mut self) -> Result<Phase, BlackjackGameError> {
        self.require_phase(Phase::Insurance, "take insurance")?;
        let wager = self.player_hands[0].wager / 2;
        let ctx = self.wager_context();
        if !ctx.can_afford(wager) {
            return Err(BlackjackGameError::InsufficientBankroll {
                needed: ctx.outstanding.saturating_add(wager),
                available: ctx.bankroll,
            });
        }

        self.insurance = wager;
        if self.dealer_hand.is_blackjack() {
            self.bankroll = self.bankroll.saturating_add(wager * 2);
            info!("insurance won {}", wager * 2);
        } else {
            self.bankroll = self.bankroll.saturating_sub(wager);
            info!("insurance lost {wager}");
        }
        self.resolve_insurance()
    }

    pub fn decline_insurance(&mut self) -> Result<Phase, BlackjackGameError> {
        self.require_phase(Phase::Insurance, "decline insurance")?;
        self.resolve_insurance()
    }

    /// Applies `action` to the current hand and moves the round forward.
    pub fn play(&mut self, action: Action) -> Result<Phase, BlackjackGameError> {
        self.require_phase(Phase::PlayerTurn, "play a hand")?;
        let ctx = self.wager_context();
        let idx = self.current_hand;
        let hand = &self.player_hands[idx];

        if !hand.can(action, &ctx) {
            let blocked_by_money = match action {
                Action::Double => hand.can_double_cards(),
                Action::Split => hand.can_split_cards() && ctx.hand_count < ctx.max_hands,
                _ => false,
            };
            if blocked_by_money {
                return Err(BlackjackGameError::InsufficientBankroll {
                    needed: ctx.outstanding.saturating_add(hand.wager),
                    available: ctx.bankroll,
                });
            }
            return Err(BlackjackGameError::InvalidAction(action));
        }

        debug!("hand {} {}", idx + 1, action);
        match action {
            Action::Hit => {
                let card = self.shoe.next_card()?;
                self.player_hands[idx].add_card(card);
            }
            Action::Stand => self.player_hands[idx].stand(),
            Action::Double => {
                let card = self.shoe.next_card()?;
                self.player_hands[idx].double_down(card);
            }
            Action::Split => {
                let mut split = self.player_hands[idx].split_off();
                self.player_hands[idx].add_card(self.shoe.next_card()?);
                split.add_card(self.shoe.next_card()?);
                self.player_hands.insert(idx + 1, split);
            }
        }
        self.advance()
    }

    pub fn hit(&mut self) -> Result<Phase, BlackjackGameError> {
        self.play(Action::Hit)
    }

    pub fn stand(&mut self) -> Result<Phase, BlackjackGameError> {
        self.play(Action::Stand)
    }

    pub fn double_down(&mut self) -> Result<Phase, BlackjackGameError> {
        self.play(Action::Double)
    }

    pub fn split(&mut self) -> Result<Phase, BlackjackGameError> {
        self.play(Action::Split)
    }

    fn resolve_insurance(&mut self) -> Result<Phase, BlackjackGameError> {
        if self.dealer_hand.is_blackjack() {
            self.dealer_hand.hide_down_card = false;
            self.pay_hands();
            return Ok(self.phase);
        }
        self.phase = Phase::PlayerTurn;
        self.advance()
    }

    /// Skips over finished hands. Returns once a hand needs a decision, or plays the dealer when none is left.
    fn advance(&mut self) -> Result<Phase, BlackjackGameError> {
        loop {
            let idx = self.current_hand;
            if !self.player_hands[idx].is_done(&mut self.bankroll) {
                self.phase = Phase::PlayerTurn;
                return Ok(self.phase);
            }
            if self.more_hands_to_play() {
                self.current_hand += 1;
            } else {
                self.play_dealer_hand()?;
                return Ok(self.phase);
            }
        }
    }

    /// The dealer only draws if some hand is still live, i.e. neither busted nor a natural.
    fn play_dealer_hand(&mut self) -> Result<(), BlackjackGameError> {
        let needs_dealer = self
            .player_hands
            .iter()
            .any(|h| !(h.is_busted() || h.is_blackjack()));
        if needs_dealer {
            self.dealer_hand
                .play(&mut self.shoe, self.config.dealer_hits_soft_17)?;
        } else {
            self.dealer_hand.hide_down_card = false;
        }
        self.pay_hands();
        Ok(())
    }

    fn pay_hands(&mut self) {
        let dealer_total = self.dealer_hand.soft_total();
        let dealer_busted = self.dealer_hand.is_busted();
        for hand in self.player_hands.iter_mut() {
            hand.pay(dealer_total, dealer_busted, &mut self.bankroll);
        }
        self.phase = Phase::RoundOver;
        self.normalize_bet();
        info!("round over, bankroll {}", self.bankroll);
    }

    fn refill_if_broke(&mut self) {
        if self.bankroll < self.config.min_bet {
            warn!(
                "bankroll {} is below the minimum bet, resetting to {}",
                self.bankroll, self.config.starting_bankroll
            );
            self.bankroll = self.config.starting_bankroll;
        }
    }

    fn require_phase(&self, expected: Phase, what: &'static str) -> Result<(), BlackjackGameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BlackjackGameError::OutOfTurn(what, self.phase))
        }
    }

    fn require_between_rounds(&self, what: &'static str) -> Result<(), BlackjackGameError> {
        match self.phase {
            Phase::Betting | Phase::RoundOver => Ok(()),
            phase => Err(BlackjackGameError::OutOfTurn(what, phase)),
        }
    }
}
