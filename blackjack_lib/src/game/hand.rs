use crate::card::{Card, FaceType};
use serde::{Deserialize, Serialize};

/// Whether an eligible ace is counted as 11 (`Soft`) or every ace as 1 (`Hard`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMethod {
    Soft,
    Hard,
}

/// Computes the value of `cards`.
///
/// Cards are counted left to right. In soft mode an ace counts 11 when the running total is still below 11,
/// otherwise 1. A soft count over 21 falls back to the hard count. Totals above 255 are reported as 255.
pub fn hand_value(cards: &[Card], method: CountMethod) -> u8 {
    let mut total = 0u32;
    for card in cards {
        let value = u32::from(card.value());
        total += if method == CountMethod::Soft && value == 1 && total < 11 {
            11
        } else {
            value
        };
    }

    if method == CountMethod::Soft && total > 21 {
        return hand_value(cards, CountMethod::Hard);
    }

    u8::try_from(total).unwrap_or(u8::MAX)
}

/// The cards held by the player or the dealer, plus whether the hand is finished acting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub played: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Hand {
            cards,
            played: false,
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn value(&self, method: CountMethod) -> u8 {
        hand_value(&self.cards, method)
    }

    pub fn soft_total(&self) -> u8 {
        self.value(CountMethod::Soft)
    }

    pub fn hard_total(&self) -> u8 {
        self.value(CountMethod::Hard)
    }

    pub fn is_busted(&self) -> bool {
        self.hard_total() > 21
    }

    /// Two cards totalling 21. Only meaningful before the hand has been hit or split.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.soft_total() == 21
    }

    /// Space separated card faces.
    pub fn faces(&self, face_type: FaceType) -> String {
        self.cards
            .iter()
            .map(|c| c.face(face_type))
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ACE: u8 = 0;
    const SIX: u8 = 5;
    const NINE: u8 = 8;
    const TEN: u8 = 9;
    const KING: u8 = 12;

    fn hand(ranks: &[u8]) -> Hand {
        Hand::with_cards(ranks.iter().map(|&r| Card::new(r, 0)).collect())
    }

    #[test]
    fn test_ace_king_is_blackjack() {
        let h = hand(&[ACE, KING]);
        assert_eq!(h.soft_total(), 21);
        assert_eq!(h.hard_total(), 11);
        assert!(h.is_blackjack());
    }

    #[test]
    fn test_ace_ace_nine_is_soft_21_not_blackjack() {
        let h = hand(&[ACE, ACE, NINE]);
        assert_eq!(h.soft_total(), 21);
        assert_eq!(h.hard_total(), 11);
        assert!(!h.is_blackjack());
    }

    #[test]
    fn test_ten_ten_ace_counts_ace_low() {
        let h = hand(&[TEN, TEN, ACE]);
        assert_eq!(h.hard_total(), 21);
        assert_eq!(h.soft_total(), 21);
        assert!(!h.is_blackjack());
        assert!(!h.is_busted());
    }

    #[test]
    fn test_soft_count_falls_back_to_hard_on_bust() {
        let h = hand(&[ACE, SIX, TEN]);
        assert_eq!(h.soft_total(), 17);
        assert_eq!(h.hard_total(), 17);
    }

    #[test]
    fn test_busted_hand() {
        let h = hand(&[TEN, KING, 1]);
        assert_eq!(h.hard_total(), 22);
        assert_eq!(h.soft_total(), 22);
        assert!(h.is_busted());
    }

    #[test]
    fn test_ace_is_counted_by_position() {
        // 5 + A: running total 5 when the ace is seen, so it counts 11
        assert_eq!(hand(&[4, ACE]).soft_total(), 16);
        // A + A: only the first ace fits under 11
        assert_eq!(hand(&[ACE, ACE]).soft_total(), 12);
    }

    #[test]
    fn test_long_hands_saturate() {
        let kings = hand(&[KING; 30]);
        assert_eq!(kings.hard_total(), u8::MAX);
        assert_eq!(kings.soft_total(), u8::MAX);
        assert!(kings.is_busted());

        let aces = hand(&[ACE; 40]);
        assert_eq!(aces.hard_total(), 40);
        assert_eq!(aces.soft_total(), 40);
    }

    #[test]
    fn test_faces() {
        assert_eq!(hand(&[ACE, TEN]).faces(FaceType::Ascii), "A♠ T♠");
    }

    proptest! {
        #[test]
        fn test_soft_total_never_below_hard_total(
            cards in prop::collection::vec((0u8..13, 0u8..4), 0..12)
        ) {
            let h = Hand::with_cards(cards.into_iter().map(|(r, s)| Card::new(r, s)).collect());
            prop_assert!(h.hard_total() <= h.soft_total());
            prop_assert_eq!(h.is_busted(), h.hard_total() > 21);
        }
    }
}
