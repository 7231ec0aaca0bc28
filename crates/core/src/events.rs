use crate::{Card, HandKind, Notice, SortOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    HandDealt {
        count: usize,
    },
    SelectionChanged {
        selected: Vec<usize>,
        can_play: bool,
        can_discard: bool,
    },
    DiscardStarted {
        count: usize,
    },
    /// One (old, new) pair per replaced hand position, in position order.
    CardsReplaced {
        replacements: Vec<(Card, Card)>,
    },
    HandScored {
        kind: HandKind,
        payout: i64,
        card_points: i64,
        total: i64,
        winning: Vec<Card>,
        score: i64,
    },
    NoWin,
    HandSorted {
        order: SortOrder,
    },
    NoticeShown {
        notice: Notice,
    },
    NoticeCleared,
    SessionEnded {
        score: i64,
        won: bool,
    },
    SessionReset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
