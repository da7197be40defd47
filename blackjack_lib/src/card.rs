use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of ranks in a standard deck, Ace through King.
pub const NUM_RANKS: u8 = 13;
/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of cards in a single standard deck.
pub const CARDS_PER_DECK: usize = 52;

const ASCII_FACES: [[&str; 4]; 13] = [
    ["A♠", "A♥", "A♣", "A♦"],
    ["2♠", "2♥", "2♣", "2♦"],
    ["3♠", "3♥", "3♣", "3♦"],
    ["4♠", "4♥", "4♣", "4♦"],
    ["5♠", "5♥", "5♣", "5♦"],
    ["6♠", "6♥", "6♣", "6♦"],
    ["7♠", "7♥", "7♣", "7♦"],
    ["8♠", "8♥", "8♣", "8♦"],
    ["9♠", "9♥", "9♣", "9♦"],
    ["T♠", "T♥", "T♣", "T♦"],
    ["J♠", "J♥", "J♣", "J♦"],
    ["Q♠", "Q♥", "Q♣", "Q♦"],
    ["K♠", "K♥", "K♣", "K♦"],
];

const UNICODE_FACES: [[&str; 4]; 13] = [
    ["🂡", "🂱", "🃁", "🃑"],
    ["🂢", "🂲", "🃂", "🃒"],
    ["🂣", "🂳", "🃃", "🃓"],
    ["🂤", "🂴", "🃄", "🃔"],
    ["🂥", "🂵", "🃅", "🃕"],
    ["🂦", "🂶", "🃆", "🃖"],
    ["🂧", "🂷", "🃇", "🃗"],
    ["🂨", "🂸", "🃈", "🃘"],
    ["🂩", "🂹", "🃉", "🃙"],
    ["🂪", "🂺", "🃊", "🃚"],
    ["🂫", "🂻", "🃋", "🃛"],
    ["🂭", "🂽", "🃍", "🃝"],
    ["🂮", "🂾", "🃎", "🃞"],
];

/// How cards are drawn on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaceType {
    /// Rank letter followed by the suit symbol, e.g. `A♠`.
    #[default]
    Ascii,
    /// Unicode playing card code points, e.g. `🂡`.
    Unicode,
}

impl FaceType {
    /// Placeholder shown in place of a face down card.
    pub fn back(&self) -> &'static str {
        match self {
            FaceType::Ascii => "??",
            FaceType::Unicode => "🂠",
        }
    }
}

/// A single playing card. `rank` runs from 0 (Ace) to 12 (King), `suit` from 0 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: u8,
}

impl Card {
    /// Associated function to create a new `Card`. Panics if `rank` or `suit` is out of range.
    pub fn new(rank: u8, suit: u8) -> Card {
        assert!(rank < NUM_RANKS, "invalid rank {rank}");
        assert!(suit < NUM_SUITS, "invalid suit {suit}");
        Card { rank, suit }
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> u8 {
        self.suit
    }

    pub fn is_ace(&self) -> bool {
        self.rank == 0
    }

    /// True for tens and face cards, everything that counts as 10.
    pub fn is_ten(&self) -> bool {
        self.rank > 8
    }

    /// The card's contribution to a hand with every ace counted low.
    pub fn value(&self) -> u8 {
        u8::min(self.rank + 1, 10)
    }

    /// Returns the face of the card in the given style.
    pub fn face(&self, face_type: FaceType) -> &'static str {
        match face_type {
            FaceType::Ascii => ASCII_FACES[self.rank as usize][self.suit as usize],
            FaceType::Unicode => UNICODE_FACES[self.rank as usize][self.suit as usize],
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.face(FaceType::Ascii))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(Card::new(0, 0).is_ace());
        assert!(!Card::new(1, 0).is_ace());
        assert!(!Card::new(8, 2).is_ten());
        for rank in 9..13 {
            assert!(Card::new(rank, 3).is_ten());
        }
    }

    #[test]
    fn test_values_are_capped_at_ten() {
        let values: Vec<u8> = (0..13).map(|r| Card::new(r, 0).value()).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10]);
    }

    #[test]
    fn test_faces() {
        assert_eq!(Card::new(0, 0).to_string(), "A♠");
        assert_eq!(Card::new(9, 1).face(FaceType::Ascii), "T♥");
        assert_eq!(Card::new(12, 3).face(FaceType::Unicode), "🃞");
        assert_eq!(FaceType::Unicode.back(), "🂠");
    }

    #[test]
    #[should_panic]
    fn test_invalid_rank_panics() {
        Card::new(13, 0);
    }
}
