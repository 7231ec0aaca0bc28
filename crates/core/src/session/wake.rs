use super::*;
use crate::*;

impl SessionState {
    /// Advances the in-flight transition by one phase. Wakes that do not
    /// match the current phase are stale and dropped without touching
    /// state, so a late timer can never corrupt a newer transition.
    pub fn wake(&mut self, wake: Wake, scheduler: &mut impl Scheduler, events: &mut EventBus) {
        match (self.phase, wake) {
            (Phase::Discarding, Wake::ReplaceDiscards) => {
                self.replace_discards(scheduler, events)
            }
            (Phase::Discarding, Wake::FinishDiscard) => self.phase = Phase::Dealt,
            (Phase::Playing, Wake::Replenish) => self.replenish(events),
            (Phase::Ended, Wake::Reset) => self.reset(events),
            (_, Wake::ClearNotice) => self.clear_notice(events),
            _ => {}
        }
    }

    fn replace_discards(&mut self, scheduler: &mut impl Scheduler, events: &mut EventBus) {
        self.discards_used += 1;
        let mut picked = self.selection.clone();
        picked.sort_unstable();
        let mut replacements = Vec::with_capacity(picked.len());
        for &pos in &picked {
            let fresh = self.draw_card();
            let old = std::mem::replace(&mut self.hand[pos], fresh);
            replacements.push((old, fresh));
        }
        self.selection.clear();
        self.apply_sort();
        events.push(Event::CardsReplaced { replacements });
        scheduler.after(self.rules.swap + self.rules.fade_in, Wake::FinishDiscard);
    }

    fn replenish(&mut self, events: &mut EventBus) {
        let count = self.pending_replenish;
        self.pending_replenish = 0;
        for _ in 0..count {
            let card = self.draw_card();
            self.hand.push(card);
        }
        self.apply_sort();
        self.phase = Phase::Dealt;
        events.push(Event::HandDealt { count });
    }

    fn reset(&mut self, events: &mut EventBus) {
        self.score = 0;
        self.hands_played = 0;
        self.discards_used = 0;
        self.pending_replenish = 0;
        self.notice = None;
        self.deck.rebuild(&mut self.rng);
        events.push(Event::SessionReset);
        self.deal_fresh_hand(events);
    }
}
