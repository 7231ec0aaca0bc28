use crate::{Card, Rank};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Winning hand categories, lowest first. Evaluation checks them in the
/// opposite order so a hand is only ever reported as its best category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandKind {
    JacksOrBetter,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
    RoyalFlush,
}

impl HandKind {
    pub const ALL: [HandKind; 9] = [
        HandKind::JacksOrBetter,
        HandKind::TwoPair,
        HandKind::Trips,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::Quads,
        HandKind::StraightFlush,
        HandKind::RoyalFlush,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandKind::JacksOrBetter => "jacks_or_better",
            HandKind::TwoPair => "two_pair",
            HandKind::Trips => "trips",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "full_house",
            HandKind::Quads => "quads",
            HandKind::StraightFlush => "straight_flush",
            HandKind::RoyalFlush => "royal_flush",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HandKind::JacksOrBetter => "Jacks or Better",
            HandKind::TwoPair => "Two Pair",
            HandKind::Trips => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::Quads => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
            HandKind::RoyalFlush => "Royal Flush",
        }
    }

    /// Fixed payout schedule.
    pub fn payout(self) -> i64 {
        match self {
            HandKind::JacksOrBetter => 10,
            HandKind::TwoPair => 25,
            HandKind::Trips => 50,
            HandKind::Straight => 80,
            HandKind::Flush => 100,
            HandKind::FullHouse => 150,
            HandKind::Quads => 250,
            HandKind::StraightFlush => 500,
            HandKind::RoyalFlush => 800,
        }
    }
}

/// Result of evaluating a played hand. `winning` holds the indices into the
/// played cards that earned the category and collect per-card bonus points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub kind: Option<HandKind>,
    pub winning: Vec<usize>,
}

impl Evaluation {
    pub fn is_winning(&self) -> bool {
        self.kind.is_some()
    }

    pub fn payout(&self) -> i64 {
        self.kind.map(HandKind::payout).unwrap_or(0)
    }
}

pub fn evaluate(cards: &[Card]) -> Evaluation {
    match evaluate_hand(cards) {
        Some(kind) => Evaluation {
            kind: Some(kind),
            winning: winning_cards(cards, kind),
        },
        None => Evaluation {
            kind: None,
            winning: Vec::new(),
        },
    }
}

/// Classifies exactly five cards; anything else can never win. First match
/// in descending category order wins, so four aces report as Quads and
/// never as a pair-family hand.
pub fn evaluate_hand(cards: &[Card]) -> Option<HandKind> {
    if cards.len() != 5 {
        return None;
    }

    let mut values: Vec<u8> = cards.iter().map(|card| card.rank.value()).collect();
    values.sort_unstable();
    let is_flush = cards.iter().all(|card| card.suit == cards[0].suit);
    let is_straight = is_straight_run(&values);

    if is_flush && is_straight {
        return if values[0] == 10 {
            Some(HandKind::RoyalFlush)
        } else {
            Some(HandKind::StraightFlush)
        };
    }

    let rank_counts = count_ranks(cards);
    let mut counts: Vec<usize> = rank_counts.values().copied().collect();
    counts.sort_by(|a, b| b.cmp(a));

    if counts == [4, 1] {
        return Some(HandKind::Quads);
    }
    if counts == [3, 2] {
        return Some(HandKind::FullHouse);
    }
    if is_flush {
        return Some(HandKind::Flush);
    }
    if is_straight {
        return Some(HandKind::Straight);
    }
    if counts == [3, 1, 1] {
        return Some(HandKind::Trips);
    }
    if counts == [2, 2, 1] {
        return Some(HandKind::TwoPair);
    }
    if counts == [2, 1, 1, 1] {
        let qualifies = rank_counts
            .iter()
            .any(|(rank, &count)| count == 2 && rank.value() >= Rank::Jack.value());
        if qualifies {
            return Some(HandKind::JacksOrBetter);
        }
    }
    None
}

/// Indices of the cards credited with the win: the repeated ranks for the
/// count-based categories, the whole hand for runs and flushes.
pub fn winning_cards(cards: &[Card], kind: HandKind) -> Vec<usize> {
    let rank_counts = count_ranks(cards);
    match kind {
        HandKind::Straight
        | HandKind::Flush
        | HandKind::FullHouse
        | HandKind::StraightFlush
        | HandKind::RoyalFlush => (0..cards.len()).collect(),
        HandKind::Quads => pick_indices_by_count(cards, &rank_counts, 4, 1),
        HandKind::Trips => pick_indices_by_count(cards, &rank_counts, 3, 1),
        HandKind::TwoPair => pick_indices_by_count(cards, &rank_counts, 2, 2),
        HandKind::JacksOrBetter => pick_indices_by_count(cards, &rank_counts, 2, 1),
    }
}

fn count_ranks(cards: &[Card]) -> HashMap<Rank, usize> {
    let mut rank_counts: HashMap<Rank, usize> = HashMap::new();
    for card in cards {
        *rank_counts.entry(card.rank).or_insert(0) += 1;
    }
    rank_counts
}

fn is_straight_run(sorted_values: &[u8]) -> bool {
    // Ace-low wheel is a hardcoded exception, not modular arithmetic.
    if sorted_values == [2, 3, 4, 5, 14] {
        return true;
    }
    sorted_values.windows(2).all(|w| w[1] == w[0] + 1)
}

fn pick_indices_by_count(
    cards: &[Card],
    rank_counts: &HashMap<Rank, usize>,
    count: usize,
    max_groups: usize,
) -> Vec<usize> {
    let mut ranks: Vec<Rank> = rank_counts
        .iter()
        .filter(|(_, &c)| c == count)
        .map(|(rank, _)| *rank)
        .collect();
    ranks.sort_by(|a, b| b.value().cmp(&a.value()));
    ranks.truncate(max_groups);

    let mut picked = Vec::new();
    for (idx, card) in cards.iter().enumerate() {
        if ranks.contains(&card.rank) {
            picked.push(idx);
        }
    }
    picked
}
