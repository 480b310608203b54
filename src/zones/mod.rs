//! Card piles.
//!
//! ## Key Types
//!
//! - `Pile`: Hand, Played, InnerCircle, Deck, Discard
//! - `PileSet`: A player's piles and the named moves between them

pub mod piles;

pub use piles::{Pile, PileSet};
