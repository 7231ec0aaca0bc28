//! Core game rules. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod deck;
pub mod events;
pub mod hand;
pub mod rng;
pub mod rules;
pub mod session;
pub mod timer;

pub use cards::*;
pub use deck::*;
pub use events::*;
pub use hand::*;
pub use rng::*;
pub use rules::*;
pub use session::*;
pub use timer::*;
