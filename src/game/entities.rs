use std::{collections::VecDeque, fmt};

/// Number of fixed seats at the table. Seat indices are stable for the
/// session's lifetime; a slot is reused, not recreated, when a player
/// leaves and another joins.
pub const MAX_SEATS: usize = 6;

/// Type alias for whole chips. All bets and player stacks are represented
/// as whole chips.
pub type Chips = u32;

/// Type alias for seat positions at the table.
pub type SeatIndex = usize;

/// Card suits in wire order: a card id integer-divided by 13 indexes this
/// sequence.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Suit {
    Spade,
    Club,
    Heart,
    Diamond,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Club => "♣",
            Self::Heart => "♥",
            Self::Diamond => "♦",
        };
        write!(f, "{repr}")
    }
}

/// A card as it travels on the wire: an id in `0..=51`. The suit is the id
/// divided by 13 and the rank is the remainder plus 2, with 11..=14 reading
/// as J, Q, K, and A. The encoding is bit-exact with the server's and must
/// not change.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Card(u8);

impl Card {
    /// Construct a card from its wire id. Ids above 51 are not cards.
    pub fn from_id(id: u8) -> Option<Self> {
        (id <= 51).then_some(Self(id))
    }

    /// The wire id this card was built from.
    pub fn id(self) -> u8 {
        self.0
    }

    pub fn suit(self) -> Suit {
        match self.0 / 13 {
            0 => Suit::Spade,
            1 => Suit::Club,
            2 => Suit::Heart,
            _ => Suit::Diamond,
        }
    }

    /// The card's rank, 2..=14. Ranks 2 through 10 map to themselves;
    /// 11..=14 are J, Q, K, and A.
    pub fn rank(self) -> u8 {
        self.0 % 13 + 2
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rank = match self.rank() {
            11 => "J",
            12 => "Q",
            13 => "K",
            14 => "A",
            r => &r.to_string(),
        };
        write!(f, "{rank}{}", self.suit())
    }
}

/// A fixed table position a player may occupy.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Seat {
    pub occupied: bool,
    pub name: String,
    pub stack: Chips,
    /// The seat's current bet for this betting round.
    pub bet: Chips,
    /// Whether the seat is still contesting the current pot.
    pub in_hand: bool,
    /// Hole cards. Only the viewer's own seat and showdown-revealed seats
    /// ever carry real values.
    pub hand: [Option<Card>; 2],
}

impl Seat {
    /// Seat a player under `name`, starting from cleared defaults.
    pub fn occupy(&mut self, name: &str) {
        *self = Self {
            occupied: true,
            name: name.to_string(),
            ..Self::default()
        };
    }

    /// Clear the slot back to its vacant defaults.
    pub fn vacate(&mut self) {
        *self = Self::default();
    }
}

/// The shared game state visible to the client.
///
/// Exactly one `Table` exists per session. It is constructed once with
/// all-default values, mutated in place by the reconciler for the session's
/// duration, and discarded when the session ends. The session's receive
/// thread is its only writer; everything else reads it through the shared
/// mutex.
#[derive(Clone, Debug)]
pub struct Table {
    /// Whether a hand is in progress.
    pub active: bool,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Community cards in deal order; `None` means not dealt yet.
    pub community: [Option<Card>; 5],
    /// The main pot at index 0, side pots at 1..=4. The length is always 5;
    /// unused slots stay 0.
    pub pots: [Chips; 5],
    pub dealer: SeatIndex,
    pub acting: SeatIndex,
    /// Highest and second highest current bets, as reported by the server.
    /// `highest_bet >= second_highest_bet` holds on the wire; the client
    /// trusts the values as received.
    pub highest_bet: Chips,
    pub second_highest_bet: Chips,
    /// True when every other live seat is already all-in, so the acting
    /// seat cannot raise beyond calling.
    pub no_further_raising: bool,
    /// The viewer's seat, discovered by matching `my_name` against seat
    /// records rather than being told directly.
    pub my_seat: SeatIndex,
    pub my_name: String,
    /// Chat lines, most recent first.
    pub chat: VecDeque<String>,
    pub seats: [Seat; MAX_SEATS],
    winner_announcement_pending: bool,
}

impl Table {
    pub fn new(my_name: &str) -> Self {
        Self {
            active: false,
            small_blind: 0,
            big_blind: 0,
            community: [None; 5],
            pots: [0; 5],
            dealer: 0,
            acting: 0,
            highest_bet: 0,
            second_highest_bet: 0,
            no_further_raising: false,
            my_seat: 0,
            my_name: my_name.to_string(),
            chat: VecDeque::new(),
            seats: Default::default(),
            winner_announcement_pending: false,
        }
    }

    /// Whether a winner announcement is holding the display frozen on the
    /// previous showdown.
    pub fn winner_announcement_pending(&self) -> bool {
        self.winner_announcement_pending
    }

    /// Consume the winner-announcement flag.
    ///
    /// The consumer that refreshes the display must call this on every
    /// state-changed notification: a `true` result means this refresh must
    /// be skipped so the showdown stays visible. The flag reads cleared on
    /// every later call until the next announcement.
    pub fn take_winner_announcement(&mut self) -> bool {
        std::mem::take(&mut self.winner_announcement_pending)
    }

    pub(crate) fn set_winner_announcement(&mut self) {
        self.winner_announcement_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_suits_follow_wire_order() {
        assert_eq!(Card::from_id(0).unwrap().suit(), Suit::Spade);
        assert_eq!(Card::from_id(13).unwrap().suit(), Suit::Club);
        assert_eq!(Card::from_id(26).unwrap().suit(), Suit::Heart);
        assert_eq!(Card::from_id(39).unwrap().suit(), Suit::Diamond);
        assert_eq!(Card::from_id(51).unwrap().suit(), Suit::Diamond);
    }

    #[test]
    fn card_ranks_map_remainder_plus_two() {
        assert_eq!(Card::from_id(0).unwrap().rank(), 2);
        assert_eq!(Card::from_id(8).unwrap().rank(), 10);
        assert_eq!(Card::from_id(9).unwrap().rank(), 11);
        assert_eq!(Card::from_id(12).unwrap().rank(), 14);
        assert_eq!(Card::from_id(25).unwrap().rank(), 14);
    }

    #[test]
    fn card_ids_round_trip() {
        for id in 0..=51 {
            let card = Card::from_id(id).unwrap();
            let suit_index = match card.suit() {
                Suit::Spade => 0,
                Suit::Club => 1,
                Suit::Heart => 2,
                Suit::Diamond => 3,
            };
            // Decoding the rank/suit pair recovers the same id.
            assert_eq!(suit_index * 13 + card.rank() - 2, id);
            assert_eq!(card.id(), id);
        }
    }

    #[test]
    fn card_ids_above_deck_are_rejected() {
        assert!(Card::from_id(52).is_none());
        assert!(Card::from_id(u8::MAX).is_none());
    }

    #[test]
    fn card_display() {
        assert_eq!(Card::from_id(0).unwrap().to_string(), "2♠");
        assert_eq!(Card::from_id(12).unwrap().to_string(), "A♠");
        assert_eq!(Card::from_id(22).unwrap().to_string(), "J♣");
        assert_eq!(Card::from_id(51).unwrap().to_string(), "A♦");
    }

    #[test]
    fn occupy_clears_previous_tenant() {
        let mut seat = Seat {
            occupied: true,
            name: "alice".into(),
            stack: 500,
            bet: 20,
            in_hand: true,
            hand: [Card::from_id(0), Card::from_id(1)],
        };
        seat.occupy("bob");
        assert!(seat.occupied);
        assert_eq!(seat.name, "bob");
        assert_eq!(seat.stack, 0);
        assert_eq!(seat.bet, 0);
        assert!(!seat.in_hand);
        assert_eq!(seat.hand, [None, None]);
    }

    #[test]
    fn winner_announcement_clears_exactly_once() {
        let mut table = Table::new("alice");
        assert!(!table.take_winner_announcement());
        table.set_winner_announcement();
        assert!(table.winner_announcement_pending());
        assert!(table.take_winner_announcement());
        assert!(!table.take_winner_announcement());
    }
}
