use crate::card::{Card, CARDS_PER_DECK, NUM_RANKS, NUM_SUITS};
use crate::error::BlackjackGameError;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// The composition of the shoe. Anything other than `Regular` is a practice shoe that repeats a few ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeckType {
    #[default]
    Regular,
    Aces,
    Jacks,
    AcesJacks,
    Sevens,
    Eights,
}

impl DeckType {
    pub const ALL: [DeckType; 6] = [
        DeckType::Regular,
        DeckType::Aces,
        DeckType::Jacks,
        DeckType::AcesJacks,
        DeckType::Sevens,
        DeckType::Eights,
    ];

    /// The ranks a practice shoe is filled with, `None` for a regular shoe.
    fn practice_ranks(&self) -> Option<&'static [u8]> {
        match self {
            DeckType::Regular => None,
            DeckType::Aces => Some(&[0]),
            DeckType::Jacks => Some(&[10]),
            DeckType::AcesJacks => Some(&[0, 10]),
            DeckType::Sevens => Some(&[6]),
            DeckType::Eights => Some(&[7]),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeckType::Regular => "Regular",
            DeckType::Aces => "Aces",
            DeckType::Jacks => "Jacks",
            DeckType::AcesJacks => "Aces & Jacks",
            DeckType::Sevens => "Sevens",
            DeckType::Eights => "Eights",
        }
    }
}

/// Returns the number of remaining cards at or below which a shoe of `num_decks` decks gets reshuffled.
/// The more decks, the deeper the shoe is dealt before reshuffling.
pub fn default_penetration_threshold(num_decks: usize) -> usize {
    let used_pct = match num_decks {
        0 | 1 => 80,
        2 => 81,
        3 => 82,
        4 => 84,
        5 => 86,
        6 => 89,
        7 => 92,
        _ => 95,
    };
    num_decks * CARDS_PER_DECK * (100 - used_pct) / 100
}

/// The supply of cards for a table. Cards are drawn from the back of `cards`.
pub struct Shoe {
    num_decks: usize,
    deck_type: DeckType,
    cards: Vec<Card>,
    penetration_threshold: usize,
    fixed_threshold: bool,
    rng: StdRng,
}

impl Shoe {
    /// Builds and shuffles a new shoe. `threshold` overrides the default reshuffle point,
    /// `seed` makes the shuffles reproducible.
    pub fn new(
        num_decks: usize,
        deck_type: DeckType,
        threshold: Option<usize>,
        seed: Option<u64>,
    ) -> Shoe {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut shoe = Shoe {
            num_decks,
            deck_type,
            cards: Vec::with_capacity(num_decks * CARDS_PER_DECK),
            penetration_threshold: threshold
                .unwrap_or_else(|| default_penetration_threshold(num_decks)),
            fixed_threshold: threshold.is_some(),
            rng,
        };
        shoe.rebuild();
        shoe
    }

    /// Creates a shoe that deals `cards` in the given order and never asks to be reshuffled until it is empty.
    /// Useful for replaying a known sequence of cards.
    pub fn stacked(num_decks: usize, cards: Vec<Card>) -> Shoe {
        let mut cards = cards;
        cards.reverse();
        Shoe {
            num_decks,
            deck_type: DeckType::Regular,
            cards,
            penetration_threshold: 0,
            fixed_threshold: true,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Replaces the whole supply with `num_decks * 52` freshly shuffled cards.
    pub fn rebuild(&mut self) {
        let total = self.num_decks * CARDS_PER_DECK;
        self.cards.clear();

        match self.deck_type.practice_ranks() {
            None => {
                for _ in 0..self.num_decks {
                    for suit in 0..NUM_SUITS {
                        for rank in 0..NUM_RANKS {
                            self.cards.push(Card::new(rank, suit));
                        }
                    }
                }
            }
            Some(ranks) => {
                'fill: loop {
                    for suit in 0..NUM_SUITS {
                        for &rank in ranks {
                            if self.cards.len() >= total {
                                break 'fill;
                            }
                            self.cards.push(Card::new(rank, suit));
                        }
                    }
                }
            }
        }

        self.cards.shuffle(&mut self.rng);
        info!(
            "shuffled a {} shoe of {} deck(s), {} cards",
            self.deck_type.label(),
            self.num_decks,
            self.cards.len()
        );
    }

    /// Removes and returns the next card.
    pub fn draw(&mut self) -> Result<Card, BlackjackGameError> {
        let card = self.cards.pop().ok_or(BlackjackGameError::ShoeExhausted)?;
        debug!("drew {card}, {} cards remaining", self.cards.len());
        Ok(card)
    }

    /// Draws a card for a round in progress. A shoe that runs dry mid round is rebuilt wholesale first, so a
    /// long round (re-splits, practice shoes) never runs out of cards.
    pub fn next_card(&mut self) -> Result<Card, BlackjackGameError> {
        if self.cards.is_empty() {
            warn!("shoe ran out of cards mid round, reshuffling");
            self.rebuild();
        }
        self.draw()
    }

    /// True once the remaining cards are at or below the penetration threshold.
    pub fn needs_to_shuffle(&self) -> bool {
        self.cards.is_empty() || self.cards.len() <= self.penetration_threshold
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    pub fn deck_type(&self) -> DeckType {
        self.deck_type
    }

    pub fn penetration_threshold(&self) -> usize {
        self.penetration_threshold
    }

    /// Changes the number of decks and rebuilds the shoe.
    pub fn set_num_decks(&mut self, num_decks: usize) {
        self.num_decks = num_decks;
        if !self.fixed_threshold {
            self.penetration_threshold = default_penetration_threshold(num_decks);
        }
        self.rebuild();
    }

    /// Changes the deck type and rebuilds the shoe.
    pub fn set_deck_type(&mut self, deck_type: DeckType) {
        self.deck_type = deck_type;
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_six_deck_shoe_has_312_cards() {
        let shoe = Shoe::new(6, DeckType::Regular, None, Some(7));
        assert_eq!(shoe.remaining(), 312);
        assert!(!shoe.needs_to_shuffle());
    }

    #[test]
    fn test_regular_shoe_is_a_permutation_of_full_decks() {
        let mut shoe = Shoe::new(2, DeckType::Regular, None, Some(42));
        let mut counts: HashMap<Card, usize> = HashMap::new();
        while let Ok(card) = shoe.draw() {
            *counts.entry(card).or_default() += 1;
        }
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_shuffle_changes_order() {
        let shoe = Shoe::new(1, DeckType::Regular, None, Some(1));
        let ordered: Vec<Card> = (0..NUM_SUITS)
            .flat_map(|s| (0..NUM_RANKS).map(move |r| Card::new(r, s)))
            .collect();
        assert_ne!(shoe.cards, ordered);
    }

    #[test]
    fn test_practice_shoe_is_full_size() {
        let mut shoe = Shoe::new(2, DeckType::AcesJacks, None, Some(3));
        assert_eq!(shoe.remaining(), 104);
        while let Ok(card) = shoe.draw() {
            assert!(card.rank() == 0 || card.rank() == 10);
        }
    }

    #[test]
    fn test_needs_to_shuffle_at_threshold() {
        let mut shoe = Shoe::new(1, DeckType::Regular, Some(50), Some(9));
        assert!(!shoe.needs_to_shuffle());
        shoe.draw().unwrap();
        assert!(!shoe.needs_to_shuffle());
        shoe.draw().unwrap();
        assert_eq!(shoe.remaining(), 50);
        assert!(shoe.needs_to_shuffle());
        shoe.rebuild();
        assert_eq!(shoe.remaining(), 52);
    }

    #[test]
    fn test_default_thresholds() {
        assert_eq!(default_penetration_threshold(1), 10);
        assert_eq!(default_penetration_threshold(6), 34);
        assert_eq!(default_penetration_threshold(8), 20);
    }

    #[test]
    fn test_draw_from_empty_shoe_fails() {
        let mut shoe = Shoe::stacked(1, vec![Card::new(0, 0)]);
        assert_eq!(shoe.draw().unwrap(), Card::new(0, 0));
        assert!(shoe.needs_to_shuffle());
        assert!(matches!(shoe.draw(), Err(BlackjackGameError::ShoeExhausted)));
    }

    #[test]
    fn test_next_card_rebuilds_an_empty_shoe() {
        let mut shoe = Shoe::stacked(1, vec![Card::new(4, 2)]);
        assert_eq!(shoe.next_card().unwrap(), Card::new(4, 2));
        assert_eq!(shoe.remaining(), 0);
        shoe.next_card().unwrap();
        assert_eq!(shoe.remaining(), 51);
    }

    #[test]
    fn test_stacked_shoe_deals_in_order() {
        let mut shoe = Shoe::stacked(1, vec![Card::new(1, 0), Card::new(2, 0)]);
        assert_eq!(shoe.draw().unwrap().rank(), 1);
        assert_eq!(shoe.draw().unwrap().rank(), 2);
    }

    #[test]
    fn test_changing_decks_rebuilds() {
        let mut shoe = Shoe::new(1, DeckType::Regular, None, Some(5));
        shoe.set_num_decks(4);
        assert_eq!(shoe.remaining(), 208);
        assert_eq!(shoe.penetration_threshold(), 33);
    }
}
