use crate::{Card, Deck, Event, EventBus, RngState, Scheduler, SessionRules, Wake};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod actions;
mod wake;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a transition is in flight")]
    Busy,
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("no card at position {0}")]
    InvalidPosition(usize),
    #[error("no discards left")]
    NoDiscardsLeft,
}

/// `Dealt` is the only phase in which the selection may change; everything
/// between an accepted discard/play and its final wake-up counts as busy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dealt,
    Discarding,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Transient user-visible message; auto-cleared by a scheduled wake and
/// never part of game state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Notice {
    DiscardsExhausted,
}

/// Owns the deck, hand, selection, and counters; the only place any of
/// them is mutated. Multi-step transitions are sequenced by [`Wake`]s the
/// host delivers back through [`SessionState::wake`].
#[derive(Debug)]
pub struct SessionState {
    rules: SessionRules,
    rng: RngState,
    deck: Deck,
    hand: Vec<Card>,
    selection: Vec<usize>,
    score: i64,
    hands_played: u8,
    discards_used: u8,
    phase: Phase,
    sort: Option<SortOrder>,
    notice: Option<Notice>,
    // Cards removed by the in-flight play, owed back at replenish time.
    pending_replenish: usize,
}

/// Serializable view for frontends and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub score: i64,
    pub hands_played: u8,
    pub discards_used: u8,
    pub hand: Vec<Card>,
    pub selection: Vec<usize>,
    pub sort: Option<SortOrder>,
    pub notice: Option<Notice>,
    pub deck_len: usize,
}

impl SessionState {
    pub fn new(rules: SessionRules, seed: u64) -> Self {
        let mut rng = RngState::from_seed(seed);
        let mut deck = Deck::standard52();
        deck.shuffle(&mut rng);
        Self {
            rules,
            rng,
            deck,
            hand: Vec::new(),
            selection: Vec::new(),
            score: 0,
            hands_played: 0,
            discards_used: 0,
            phase: Phase::Idle,
            sort: None,
            notice: None,
            pending_replenish: 0,
        }
    }

    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn hands_played(&self) -> u8 {
        self.hands_played
    }

    pub fn discards_used(&self) -> u8 {
        self.discards_used
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// True while a discard, play, or end-of-session transition is in
    /// flight; every user-initiated action is rejected until the final
    /// wake-up lands.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Discarding | Phase::Playing | Phase::Ended)
    }

    pub fn can_play(&self) -> bool {
        self.phase == Phase::Dealt && self.selection_in_range()
    }

    pub fn can_discard(&self) -> bool {
        self.can_play()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            score: self.score,
            hands_played: self.hands_played,
            discards_used: self.discards_used,
            hand: self.hand.clone(),
            selection: self.selection.clone(),
            sort: self.sort,
            notice: self.notice,
            deck_len: self.deck.len(),
        }
    }

    fn selection_in_range(&self) -> bool {
        !self.selection.is_empty() && self.selection.len() <= self.rules.play_limit
    }

    fn show_notice(
        &mut self,
        notice: Notice,
        scheduler: &mut impl Scheduler,
        events: &mut EventBus,
    ) {
        self.notice = Some(notice);
        events.push(Event::NoticeShown { notice });
        scheduler.after(self.rules.notice, Wake::ClearNotice);
    }

    fn clear_notice(&mut self, events: &mut EventBus) {
        if self.notice.take().is_some() {
            events.push(Event::NoticeCleared);
        }
    }

    /// Draws one card, transparently rebuilding an exhausted deck first.
    fn draw_card(&mut self) -> Card {
        loop {
            if let Some(card) = self.deck.draw() {
                return card;
            }
            self.deck.rebuild(&mut self.rng);
        }
    }

    fn apply_sort(&mut self) {
        let Some(order) = self.sort else {
            return;
        };
        match order {
            SortOrder::Ascending => self.hand.sort_by_key(|card| card.rank.value()),
            SortOrder::Descending => self
                .hand
                .sort_by_key(|card| std::cmp::Reverse(card.rank.value())),
        }
    }

    /// Re-sorts the hand, then re-locates each previously selected card by
    /// (rank, suit) equality at its new position. A used-slot mask keeps the
    /// mapping one-to-one when a mid-session rebuild has produced duplicate
    /// (rank, suit) pairs in the hand.
    fn resort_preserving_selection(&mut self) {
        let selected: Vec<Card> = self.selection.iter().map(|&pos| self.hand[pos]).collect();
        self.apply_sort();
        self.selection.clear();
        let mut used = vec![false; self.hand.len()];
        for card in selected {
            let found = self
                .hand
                .iter()
                .enumerate()
                .find(|&(idx, held)| !used[idx] && *held == card);
            if let Some((idx, _)) = found {
                used[idx] = true;
                self.selection.push(idx);
            }
        }
    }
}
