use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-session limits and transition timings. The defaults match the
/// original game: five hands, three discards, 500 points to win, a nine
/// card hand, and at most five cards played or discarded at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRules {
    pub max_hands: u8,
    pub max_discards: u8,
    pub win_threshold: i64,
    pub hand_size: usize,
    pub play_limit: usize,
    /// Fade-out before discarded cards are replaced.
    pub fade_out: Duration,
    /// Gap between the card swap and the fade-in.
    pub swap: Duration,
    /// Fade-in after the replacements land.
    pub fade_in: Duration,
    /// Score reveal before the hand is replenished.
    pub score_reveal: Duration,
    /// Lifetime of a transient notice.
    pub notice: Duration,
    /// Pause on the final verdict before the session resets.
    pub reset: Duration,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            max_hands: 5,
            max_discards: 3,
            win_threshold: 500,
            hand_size: 9,
            play_limit: 5,
            fade_out: Duration::from_millis(800),
            swap: Duration::from_millis(50),
            fade_in: Duration::from_millis(800),
            score_reveal: Duration::from_secs(2),
            notice: Duration::from_secs(2),
            reset: Duration::from_secs(2),
        }
    }
}
