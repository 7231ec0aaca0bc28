use crate::{Card, Rank, RngState, Suit};

/// Draw pile. Exhaustion is never an error: callers rebuild a full 52-card
/// deck (and reshuffle) before a draw that would otherwise fail.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        Self { cards }
    }

    /// Replaces any remaining content with a freshly shuffled 52-card deck.
    pub fn rebuild(&mut self, rng: &mut RngState) {
        *self = Self::standard52();
        self.shuffle(rng);
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.cards);
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
