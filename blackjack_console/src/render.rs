//! Text rendering of the table. Nothing in here touches the rules, it only reads the engine's state.

use blackjack_lib::prelude::*;

/// Formats an amount in cents as dollars with two decimals, e.g. `150` as `1.50`.
pub fn format_money(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Parses a dollar amount such as `25` or `12.5` into cents. At most two decimals are accepted.
pub fn parse_dollars(input: &str) -> Option<u64> {
    let input = input.trim().trim_start_matches('$');
    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: u64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<u64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

pub fn draw_dealer_hand(dealer: &DealerHand, face_type: FaceType) -> String {
    let mut out = String::from(" ");
    for (i, card) in dealer.cards().iter().enumerate() {
        if i == 1 && dealer.hide_down_card {
            out.push_str(face_type.back());
        } else {
            out.push_str(card.face(face_type));
        }
        out.push(' ');
    }
    out.push_str(&format!(" ⇒  {}", dealer.visible_total()));
    out
}

/// One line for a player hand: cards, total, wager, the marker for the hand being played and the result.
pub fn draw_player_hand(hand: &PlayerHand, is_current: bool, face_type: FaceType) -> String {
    let mut out = String::from(" ");
    for card in hand.cards() {
        out.push_str(card.face(face_type));
        out.push(' ');
    }
    out.push_str(&format!(" ⇒  {}  ", hand.soft_total()));

    match hand.status {
        HandStatus::Lost => out.push('-'),
        HandStatus::Won => out.push('+'),
        _ => {}
    }
    out.push('$');
    out.push_str(&format_money(hand.wager));
    if is_current && !hand.is_played() {
        out.push_str(" ⇐");
    }

    let result = status_text(hand);
    if !result.is_empty() {
        out.push_str("  ");
        out.push_str(result);
    }
    out
}

pub fn status_text(hand: &PlayerHand) -> &'static str {
    match hand.status {
        HandStatus::Lost if hand.is_busted() => "Busted!",
        HandStatus::Lost => "Lose!",
        HandStatus::Won if hand.is_blackjack() => "Blackjack!",
        HandStatus::Won => "Won!",
        HandStatus::Push => "Push",
        HandStatus::Unknown => "",
    }
}

/// Draws the dealer and every player hand, followed by the bankroll.
pub fn draw_hands(table: &Table) -> String {
    let face_type = table.face_type();
    let mut out = String::from("\n Dealer:\n");
    if !table.dealer_hand().cards().is_empty() {
        out.push_str(&draw_dealer_hand(table.dealer_hand(), face_type));
        out.push('\n');
    }

    out.push_str(&format!(
        "\n Player ${}:\n",
        format_money(table.bankroll())
    ));
    for (i, hand) in table.player_hands().iter().enumerate() {
        let is_current = table.phase() == Phase::PlayerTurn && i == table.current_hand_index();
        out.push_str(&draw_player_hand(hand, is_current, face_type));
        out.push('\n');
    }
    out
}

/// The keys for the actions the current hand allows.
pub fn action_prompt(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|a| match a {
            Action::Hit => "(H) Hit",
            Action::Stand => "(S) Stand",
            Action::Split => "(P) Split",
            Action::Double => "(D) Double",
        })
        .collect::<Vec<&str>>()
        .join("  ")
}
