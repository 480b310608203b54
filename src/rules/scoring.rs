//! Final scoring and match result.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Phase, SeatIndex, SeatMap};
use crate::zones::Pile;

/// Result of a completed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(SeatIndex),
    /// Two or more seats share the top score.
    Draw,
}

impl GameResult {
    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, seat: SeatIndex) -> bool {
        matches!(self, GameResult::Winner(s) if *s == seat)
    }
}

impl GameState {
    /// Score per seat: VP tokens, deck VP of every card outside the
    /// Inner Circle, inner-circle VP of promoted cards, and one point
    /// per trophy.
    #[must_use]
    pub fn final_scores(&self) -> SeatMap<u32> {
        SeatMap::new(self.players.seat_count(), |seat| {
            let player = &self.players[seat];
            let card_vp: u32 = Pile::ALL
                .into_iter()
                .flat_map(move |pile| player.piles().pile(pile).iter().map(move |c| (pile, c)))
                .filter_map(|(pile, card)| {
                    let def = self.registry.get_card_by_id(card.card_id)?;
                    Some(if pile == Pile::InnerCircle {
                        def.inner_circle_vp
                    } else {
                        def.deck_vp
                    })
                })
                .sum();
            player.resource(crate::core::Resource::VictoryPoints)
                + card_vp
                + player.trophies().len() as u32
        })
    }

    /// The result, once the match is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.phase != Phase::GameOver {
            return None;
        }
        let scores = self.final_scores();
        let best = scores.iter().map(|(_, &s)| s).max()?;
        let mut leaders = scores.iter().filter(|(_, s)| **s == best).map(|(seat, _)| seat);
        match (leaders.next(), leaders.next()) {
            (Some(seat), None) => Some(GameResult::Winner(seat)),
            _ => Some(GameResult::Draw),
        }
    }
}
