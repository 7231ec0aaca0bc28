use std::collections::VecDeque;
use std::time::Duration;

/// Deferred phase of a multi-step transition. Each wake-up advances the
/// session by exactly one phase via [`crate::SessionState::wake`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    ReplaceDiscards,
    FinishDiscard,
    Replenish,
    Reset,
    ClearNotice,
}

/// Environment hook for delayed wake-ups. The session never sleeps or
/// blocks; it asks its host to call back after the given delay.
pub trait Scheduler {
    fn after(&mut self, delay: Duration, wake: Wake);
}

/// FIFO scheduler for hosts that drive the session from a plain loop: pop
/// an entry, wait out the delay (or don't, in tests), then deliver the wake.
/// Wakes of a single transition stay in program order.
#[derive(Debug, Default)]
pub struct WakeQueue {
    pending: VecDeque<(Duration, Wake)>,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<(Duration, Wake)> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for WakeQueue {
    fn after(&mut self, delay: Duration, wake: Wake) {
        self.pending.push_back((delay, wake));
    }
}
