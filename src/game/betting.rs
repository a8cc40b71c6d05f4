//! Legal-action bounds derived from table state.

use super::entities::{Chips, SeatIndex, Table};

/// The legal action set and bet bounds for a seat.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ActionBounds {
    /// The seat is not facing a bet and may check.
    pub can_check: bool,
    /// The seat is facing a bet and may call.
    pub can_call: bool,
    /// An opening bet is offered, defaulting to `min_bet`.
    pub can_bet: bool,
    /// A raise over the current bet is offered, defaulting to `min_bet`.
    pub can_raise: bool,
    /// The stack is too short for a full bet or raise; only a shove is
    /// offered.
    pub can_all_in: bool,
    /// The big blind when nothing has been bet, otherwise the standard
    /// minimum raise over the previous raise. Not clamped to the stack;
    /// see [`clamp_wager`] for the input-facing variant.
    pub min_bet: Chips,
    /// Total chips the seat could ever have in the pot this hand.
    pub max_spend: Chips,
}

/// Compute the legal actions and bet bounds for `seat`.
///
/// Pure with respect to the table: safe to call on every state change and
/// on every edit of a proposed bet amount.
pub fn action_bounds(table: &Table, seat: SeatIndex) -> ActionBounds {
    let s = &table.seats[seat];
    let max_spend = s.bet + s.stack;
    let min_bet = min_bet(table);
    let mut bounds = ActionBounds {
        min_bet,
        max_spend,
        ..ActionBounds::default()
    };
    if s.bet == table.highest_bet {
        bounds.can_check = true;
        if max_spend > min_bet {
            bounds.can_bet = true;
        } else {
            bounds.can_all_in = true;
        }
    } else {
        bounds.can_call = true;
        if max_spend <= table.highest_bet || table.no_further_raising {
            // Nothing beyond calling is offered.
        } else if max_spend > min_bet {
            bounds.can_raise = true;
        } else {
            bounds.can_all_in = true;
        }
    }
    bounds
}

/// Clamp a proposed total wager for `seat` to the legal input range.
///
/// The lower bound is capped at the seat's stack so a short stack still
/// resolves to a shove; the upper bound is the seat's maximum spend.
pub fn clamp_wager(table: &Table, seat: SeatIndex, amount: Chips) -> Chips {
    let s = &table.seats[seat];
    let max_spend = s.bet + s.stack;
    let floor = min_bet(table).min(s.stack);
    amount.clamp(floor, max_spend)
}

fn min_bet(table: &Table) -> Chips {
    if table.highest_bet == 0 {
        table.big_blind
    } else {
        2 * table.highest_bet - table.second_highest_bet
    }
}
