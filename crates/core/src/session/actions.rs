use super::*;
use crate::*;

impl SessionState {
    /// Deals the opening hand. Every later hand arrives through the
    /// replenish or reset wake-ups instead.
    pub fn deal(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        if self.phase != Phase::Idle {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        self.deal_fresh_hand(events);
        Ok(())
    }

    pub(super) fn deal_fresh_hand(&mut self, events: &mut EventBus) {
        if self.deck.len() < self.rules.hand_size {
            self.deck.rebuild(&mut self.rng);
        }
        self.hand.clear();
        self.selection.clear();
        for _ in 0..self.rules.hand_size {
            let card = self.draw_card();
            self.hand.push(card);
        }
        self.apply_sort();
        self.phase = Phase::Dealt;
        events.push(Event::HandDealt {
            count: self.hand.len(),
        });
    }

    /// Toggles membership of a hand position in the selection and reports
    /// the resulting play/discard enablement.
    pub fn toggle_select(
        &mut self,
        pos: usize,
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.phase != Phase::Dealt {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        if pos >= self.hand.len() {
            return Err(SessionError::InvalidPosition(pos));
        }
        match self.selection.iter().position(|&selected| selected == pos) {
            Some(at) => {
                self.selection.remove(at);
            }
            None => self.selection.push(pos),
        }
        events.push(Event::SelectionChanged {
            selected: self.selection.clone(),
            can_play: self.can_play(),
            can_discard: self.can_discard(),
        });
        Ok(())
    }

    /// Starts the discard transition. All guards run before any mutation;
    /// the replacement itself happens on the scheduled wake-up.
    pub fn discard(
        &mut self,
        scheduler: &mut impl Scheduler,
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.phase != Phase::Dealt {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        if !self.selection_in_range() {
            return Err(SessionError::InvalidSelection);
        }
        if self.discards_used >= self.rules.max_discards {
            self.show_notice(Notice::DiscardsExhausted, scheduler, events);
            return Err(SessionError::NoDiscardsLeft);
        }
        self.phase = Phase::Discarding;
        events.push(Event::DiscardStarted {
            count: self.selection.len(),
        });
        scheduler.after(self.rules.fade_out, Wake::ReplaceDiscards);
        Ok(())
    }

    /// Plays the selected cards: removes them, scores them, and either
    /// schedules a replenish or ends the session once the hand limit is
    /// reached. Only an exact five-card play can win.
    pub fn play(
        &mut self,
        scheduler: &mut impl Scheduler,
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.phase != Phase::Dealt {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        if !self.selection_in_range() {
            return Err(SessionError::InvalidSelection);
        }

        let mut picked = self.selection.clone();
        picked.sort_unstable();
        let played: Vec<Card> = picked.iter().map(|&pos| self.hand[pos]).collect();
        for &pos in picked.iter().rev() {
            self.hand.remove(pos);
        }
        self.selection.clear();
        self.pending_replenish = played.len();

        let result = evaluate(&played);
        if let Some(kind) = result.kind {
            let winning: Vec<Card> = result.winning.iter().map(|&idx| played[idx]).collect();
            let card_points: i64 = winning.iter().map(|card| card.rank.point_value()).sum();
            let payout = kind.payout();
            let total = payout + card_points;
            self.score += total;
            events.push(Event::HandScored {
                kind,
                payout,
                card_points,
                total,
                winning,
                score: self.score,
            });
        } else {
            events.push(Event::NoWin);
        }
        self.hands_played += 1;

        if self.hands_played >= self.rules.max_hands {
            let won = self.score >= self.rules.win_threshold;
            events.push(Event::SessionEnded {
                score: self.score,
                won,
            });
            self.phase = Phase::Ended;
            scheduler.after(self.rules.reset, Wake::Reset);
        } else {
            self.phase = Phase::Playing;
            scheduler.after(self.rules.score_reveal, Wake::Replenish);
        }
        Ok(())
    }

    /// Re-sorts the hand by rank value and flips the remembered direction;
    /// the active direction also applies to later deals and replenishments.
    /// The selection survives by card identity, not by position.
    pub fn sort_toggle(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if self.phase != Phase::Dealt {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        let order = self
            .sort
            .map(SortOrder::toggled)
            .unwrap_or(SortOrder::Ascending);
        self.sort = Some(order);
        self.resort_preserving_selection();
        events.push(Event::HandSorted { order });
        Ok(())
    }
}
