//! Frame reconciliation: interpreting server events and applying their
//! diffs to the table.
//!
//! The table-state frame is a tokenized, nested, positional mini-grammar: a
//! space-separated list of tagged components, each parsed into a
//! [`TableComponent`] variant before any state is touched. Unknown component
//! tags and unknown top-level codes are ignored so newer servers stay
//! compatible; a field that is present but malformed is a fatal
//! [`ProtocolError`].

use std::str::FromStr;

use super::entities::{Card, Chips, MAX_SEATS, SeatIndex, Table};
use crate::net::{codec::Frame, errors::ProtocolError, protocol::EventCode};

/// What the transport loop should do after a frame is applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Applied {
    /// Notify the collaborator so it can redraw.
    Refresh,
    /// Applied without notification; identity corrections must not surface
    /// as visible events.
    Silent,
    /// The session is over.
    Disconnect,
}

/// A parsed inbound event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServerEvent {
    /// Order to tear down the session.
    Disconnect,
    /// The viewer's own hole cards.
    Hand(Card, Card),
    /// A diff of the shared table state.
    TableState(Vec<TableComponent>),
    /// A chat line.
    Chat(String),
    /// The server renamed the viewer, e.g. the requested name was taken.
    NameCorrection(String),
    /// Hands revealed at contest resolution.
    Showdown(Vec<RevealedHand>),
    /// A chat line that also holds the display frozen on the showdown.
    Announcement(String),
    /// A code outside the recognized table; applied as a no-op.
    Unknown,
}

/// One component of a table-state frame, keyed by its 2-character tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TableComponent {
    /// `ON`: whether a hand is in progress.
    Active(bool),
    /// `BL`: small and big blinds.
    Blinds { small: Chips, big: Chips },
    /// `PL`: per-seat records.
    Seats(Vec<SeatRecord>),
    /// `BT`: highest and second highest bets.
    Bets { highest: Chips, second_highest: Chips },
    /// `PT`: main and side pots; empty means the no-pots sentinel.
    Pots(Vec<Chips>),
    /// `DL`: dealer seat.
    Dealer(SeatIndex),
    /// `AC`: acting seat.
    Acting(SeatIndex),
    /// `CM`: community cards dealt so far.
    Community(Vec<Card>),
    /// `NR`: whether the acting seat is barred from raising.
    NoFurtherRaising(bool),
}

/// One `PL` record: either a vacancy or a full seat refresh.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeatRecord {
    pub seat: SeatIndex,
    /// `None` is the vacancy sentinel: the seat is disabled if occupied and
    /// nothing else in it is touched.
    pub update: Option<SeatUpdate>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeatUpdate {
    pub name: String,
    pub stack: Chips,
    pub bet: Chips,
    pub in_hand: bool,
}

/// A showdown reveal for one seat.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RevealedHand {
    pub seat: SeatIndex,
    pub cards: [Card; 2],
}

impl ServerEvent {
    /// Parse a decoded frame into an event without touching any state.
    pub fn parse(frame: &Frame) -> Result<Self, ProtocolError> {
        let Some(code) = EventCode::from_wire(&frame.code) else {
            return Ok(Self::Unknown);
        };
        let command = frame.command.as_str();
        let event = match code {
            EventCode::Disconnect => Self::Disconnect,
            EventCode::Hand => {
                let (first, second) = parse_hole_cards(command)?;
                Self::Hand(first, second)
            }
            EventCode::TableState => Self::TableState(parse_components(command)?),
            EventCode::ChatMessage => Self::Chat(command.to_string()),
            EventCode::NameCorrection => Self::NameCorrection(command.to_string()),
            EventCode::Showdown => Self::Showdown(parse_showdown(command)?),
            EventCode::Announcement => Self::Announcement(command.to_string()),
        };
        Ok(event)
    }
}

impl TableComponent {
    /// Parse one `TAG:payload` component. Unknown tags yield `None`.
    pub fn parse(raw: &str) -> Result<Option<Self>, ProtocolError> {
        let malformed = || ProtocolError::Malformed {
            what: "table-state component",
            value: raw.to_string(),
        };
        if raw.len() < 2 || !raw.is_char_boundary(2) {
            return Err(malformed());
        }
        let (tag, rest) = raw.split_at(2);
        let payload = match rest.strip_prefix(':') {
            Some(payload) => payload,
            None if rest.is_empty() => "",
            None => return Err(malformed()),
        };
        let component = match tag {
            "ON" => Self::Active(parse_flag(payload)?),
            "BL" => {
                let (small, big) = payload.split_once(':').ok_or_else(malformed)?;
                Self::Blinds {
                    small: parse_num("small blind", small)?,
                    big: parse_num("big blind", big)?,
                }
            }
            "PL" => {
                let mut records = Vec::new();
                for record in payload.split(',').filter(|r| !r.is_empty()) {
                    records.push(SeatRecord::parse(record)?);
                }
                Self::Seats(records)
            }
            "BT" => {
                let (highest, second) = payload.split_once(':').ok_or_else(malformed)?;
                Self::Bets {
                    highest: parse_num("highest bet", highest)?,
                    second_highest: parse_num("second highest bet", second)?,
                }
            }
            "PT" => {
                // A lone `0` is the no-pots sentinel.
                if payload == "0" {
                    Self::Pots(Vec::new())
                } else {
                    let pots = payload
                        .split(':')
                        .map(|pot| parse_num("pot", pot))
                        .collect::<Result<Vec<Chips>, _>>()?;
                    if pots.len() > 5 {
                        return Err(ProtocolError::TooMany {
                            what: "pots",
                            count: pots.len(),
                        });
                    }
                    Self::Pots(pots)
                }
            }
            "DL" => Self::Dealer(parse_seat(payload)?),
            "AC" => Self::Acting(parse_seat(payload)?),
            "CM" => {
                if payload.is_empty() {
                    Self::Community(Vec::new())
                } else {
                    let cards = payload
                        .split(':')
                        .map(parse_card)
                        .collect::<Result<Vec<Card>, _>>()?;
                    if cards.len() > 5 {
                        return Err(ProtocolError::TooMany {
                            what: "community cards",
                            count: cards.len(),
                        });
                    }
                    Self::Community(cards)
                }
            }
            "NR" => Self::NoFurtherRaising(parse_flag(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(component))
    }
}

impl SeatRecord {
    /// Parse one `seat:name:stack:bet:inHand` record, or the `seat:_`
    /// vacancy form.
    fn parse(record: &str) -> Result<Self, ProtocolError> {
        let malformed = || ProtocolError::Malformed {
            what: "seat record",
            value: record.to_string(),
        };
        let mut fields = record.split(':');
        let seat = parse_seat(fields.next().ok_or_else(malformed)?)?;
        let name = fields.next().ok_or_else(malformed)?;
        if name == "_" {
            if fields.next().is_some() {
                return Err(malformed());
            }
            return Ok(Self { seat, update: None });
        }
        let update = SeatUpdate {
            name: name.to_string(),
            stack: parse_num("stack", fields.next().ok_or_else(malformed)?)?,
            bet: parse_num("bet", fields.next().ok_or_else(malformed)?)?,
            in_hand: parse_flag(fields.next().ok_or_else(malformed)?)?,
        };
        if fields.next().is_some() {
            return Err(malformed());
        }
        Ok(Self {
            seat,
            update: Some(update),
        })
    }
}

/// Apply one decoded frame to the table.
///
/// Parsing happens entirely before any mutation, so a malformed frame
/// leaves the table untouched. Returns how the transport loop should react.
pub fn apply_frame(table: &mut Table, frame: &Frame) -> Result<Applied, ProtocolError> {
    Ok(apply_event(table, ServerEvent::parse(frame)?))
}

/// Apply a parsed event to the table.
pub fn apply_event(table: &mut Table, event: ServerEvent) -> Applied {
    match event {
        ServerEvent::Disconnect => return Applied::Disconnect,
        ServerEvent::Hand(first, second) => {
            table.seats[table.my_seat].hand = [Some(first), Some(second)];
        }
        ServerEvent::TableState(components) => {
            for component in components {
                apply_component(table, component);
            }
        }
        ServerEvent::Chat(line) => table.chat.push_front(line),
        ServerEvent::NameCorrection(name) => {
            table.my_name = name;
            return Applied::Silent;
        }
        ServerEvent::Showdown(hands) => {
            for RevealedHand { seat, cards } in hands {
                table.seats[seat].hand = [Some(cards[0]), Some(cards[1])];
            }
        }
        ServerEvent::Announcement(line) => {
            table.chat.push_front(line);
            table.set_winner_announcement();
        }
        ServerEvent::Unknown => return Applied::Silent,
    }
    Applied::Refresh
}

fn apply_component(table: &mut Table, component: TableComponent) {
    match component {
        TableComponent::Active(active) => {
            table.active = active;
            // Hand end: the viewer's hole cards are no longer valid.
            if !active {
                table.seats[table.my_seat].hand = [None, None];
            }
        }
        TableComponent::Blinds { small, big } => {
            table.small_blind = small;
            table.big_blind = big;
        }
        TableComponent::Seats(records) => {
            for SeatRecord { seat, update } in records {
                apply_seat_record(table, seat, update);
            }
        }
        TableComponent::Bets {
            highest,
            second_highest,
        } => {
            table.highest_bet = highest;
            table.second_highest_bet = second_highest;
        }
        TableComponent::Pots(pots) => {
            table.pots = [0; 5];
            for (slot, pot) in table.pots.iter_mut().zip(pots) {
                *slot = pot;
            }
        }
        TableComponent::Dealer(seat) => table.dealer = seat,
        TableComponent::Acting(seat) => table.acting = seat,
        TableComponent::Community(cards) => {
            table.community = [None; 5];
            for (slot, card) in table.community.iter_mut().zip(cards) {
                *slot = Some(card);
            }
        }
        TableComponent::NoFurtherRaising(no_raising) => table.no_further_raising = no_raising,
    }
}

fn apply_seat_record(table: &mut Table, seat: SeatIndex, update: Option<SeatUpdate>) {
    let Some(update) = update else {
        let slot = &mut table.seats[seat];
        if slot.occupied {
            slot.vacate();
        }
        return;
    };
    let slot = &mut table.seats[seat];
    if !slot.occupied {
        slot.occupy(&update.name);
    }
    slot.name = update.name;
    slot.stack = update.stack;
    slot.bet = update.bet;
    slot.in_hand = update.in_hand;
    // The server never names the viewer's seat directly; the client
    // discovers it by matching its own name.
    if table.seats[seat].name == table.my_name {
        table.my_seat = seat;
    }
}

fn parse_num<T: FromStr>(field: &'static str, value: &str) -> Result<T, ProtocolError> {
    value.parse().map_err(|_| ProtocolError::BadNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_seat(value: &str) -> Result<SeatIndex, ProtocolError> {
    let seat: SeatIndex = parse_num("seat", value)?;
    if seat >= MAX_SEATS {
        return Err(ProtocolError::SeatOutOfRange(seat));
    }
    Ok(seat)
}

fn parse_card(value: &str) -> Result<Card, ProtocolError> {
    let id: u8 = parse_num("card", value)?;
    Card::from_id(id).ok_or(ProtocolError::CardOutOfRange(id))
}

fn parse_flag(payload: &str) -> Result<bool, ProtocolError> {
    match payload.as_bytes() {
        [b'0'] => Ok(false),
        [digit] if digit.is_ascii_digit() => Ok(true),
        _ => Err(ProtocolError::BadNumber {
            field: "flag",
            value: payload.to_string(),
        }),
    }
}

fn parse_hole_cards(command: &str) -> Result<(Card, Card), ProtocolError> {
    if command.len() != 4 || !command.is_ascii() {
        return Err(ProtocolError::Malformed {
            what: "hand",
            value: command.to_string(),
        });
    }
    Ok((parse_card(&command[..2])?, parse_card(&command[2..])?))
}

fn parse_components(command: &str) -> Result<Vec<TableComponent>, ProtocolError> {
    let mut components = Vec::new();
    for raw in command.split(' ').filter(|c| !c.is_empty()) {
        if let Some(component) = TableComponent::parse(raw)? {
            components.push(component);
        }
    }
    Ok(components)
}

fn parse_showdown(command: &str) -> Result<Vec<RevealedHand>, ProtocolError> {
    let mut hands = Vec::new();
    for entry in command.split(' ').filter(|e| !e.is_empty()) {
        let malformed = || ProtocolError::Malformed {
            what: "showdown entry",
            value: entry.to_string(),
        };
        let (seat, cards) = entry.split_once(':').ok_or_else(malformed)?;
        let seat = parse_seat(seat)?;
        if cards.len() != 4 || !cards.is_ascii() {
            return Err(malformed());
        }
        hands.push(RevealedHand {
            seat,
            cards: [parse_card(&cards[..2])?, parse_card(&cards[2..])?],
        });
    }
    Ok(hands)
}
