//! Command execution.
//!
//! `GameState::execute` is the single entry point through which every
//! command changes a match. Each handler validates everything it needs
//! before its first mutation, so a returned `RuleViolation` means the
//! state is exactly as it was.
//!
//! Card-granted actions must match a pending `TargetRequest` from the
//! card named in the command. Actions without a card are paid with
//! Power where that is allowed.

use crate::actions::TargetKind;
use crate::cards::CardId;
use crate::command::{Command, CommandKind};
use crate::core::{
    GameState, NodeId, Phase, PlayerColor, Resource, RuleViolation, SeatIndex, SiteId,
};
use crate::effects::EffectResolver;
use crate::map::distribute_start_of_turn_rewards;
use crate::zones::Pile;

impl GameState {
    /// Apply one command.
    ///
    /// View-only commands are accepted without effect.
    pub fn execute(&mut self, command: &Command) -> Result<(), RuleViolation> {
        if command.kind.is_view_only() {
            return Ok(());
        }
        let seat = command.seat;
        self.check_turn(seat, &command.kind)?;

        match &command.kind {
            CommandKind::PlayCard {
                card_id,
                hand_idx,
                skip_optional,
            } => self.play_card(seat, *card_id, *hand_idx, *skip_optional)?,
            CommandKind::BuyCard { card_id } => self.buy_card(seat, *card_id)?,
            CommandKind::DeployTroop { node } => self.deploy_troop(seat, *node)?,
            CommandKind::Devour {
                card_id,
                hand_idx,
                source_card_id,
            } => self.devour(seat, *card_id, *hand_idx, *source_card_id)?,
            CommandKind::ResolveSpy {
                site,
                color,
                card_id,
            } => self.resolve_spy(seat, *site, *color, *card_id)?,
            CommandKind::Assassinate {
                node,
                card_id,
                devour_card_id,
            } => self.assassinate(seat, *node, *card_id, *devour_card_id)?,
            CommandKind::Supplant {
                node,
                card_id,
                devour_card_id,
            } => self.supplant(seat, *node, *card_id, *devour_card_id)?,
            CommandKind::PlaceSpy { site, card_id } => self.place_spy(seat, *site, *card_id)?,
            CommandKind::MoveTroop { src, dest, card_id } => {
                self.move_troop(seat, *src, *dest, *card_id)?
            }
            CommandKind::ReturnTroop { node, card_id } => {
                self.return_troop(seat, *node, *card_id)?
            }
            CommandKind::Promote { card_id } => self.promote(seat, *card_id)?,
            CommandKind::ActionCompleted => self.skip_request(),
            CommandKind::EndTurn => {
                self.turn.record(seat, command.kind.clone());
                self.log(Some(seat), "ended turn");
                self.end_turn(seat);
                return Ok(());
            }
            CommandKind::CancelAction | CommandKind::ToggleMarket | CommandKind::SwitchMode => {}
        }

        self.turn.record(seat, command.kind.clone());
        self.log(Some(seat), describe(&command.kind));
        Ok(())
    }

    fn check_turn(&self, seat: SeatIndex, kind: &CommandKind) -> Result<(), RuleViolation> {
        match self.phase {
            Phase::GameOver => return Err(RuleViolation::WrongPhase(Phase::GameOver)),
            Phase::Setup if !matches!(kind, CommandKind::DeployTroop { .. }) => {
                return Err(RuleViolation::WrongPhase(Phase::Setup));
            }
            _ => {}
        }
        if seat != self.active {
            return Err(RuleViolation::WrongSeat {
                expected: self.active,
                actual: seat,
            });
        }
        Ok(())
    }

    fn color(&self, seat: SeatIndex) -> PlayerColor {
        self.players[seat].color
    }

    fn check_reach(&self, node: NodeId, color: PlayerColor) -> Result<(), RuleViolation> {
        self.map.check_node(node)?;
        if !self.map.reach(node, color) {
            return Err(RuleViolation::NoReach { color, node });
        }
        Ok(())
    }

    /// Position of the pending request granted by `card_id` for `kind`,
    /// or, with a devour, of the devour request chained into `kind`.
    fn find_request(
        &self,
        kind: TargetKind,
        card_id: CardId,
        with_devour: bool,
    ) -> Result<usize, RuleViolation> {
        let (want, then) = if with_devour {
            (TargetKind::DevourHand, Some(kind))
        } else {
            (kind, None)
        };
        self.pending
            .iter()
            .position(|r| r.kind == want && r.card_id == card_id && r.then == then)
            .ok_or(RuleViolation::NoPendingRequest { kind, card: card_id })
    }

    fn find_in_hand(
        &self,
        seat: SeatIndex,
        card_id: CardId,
        hint: Option<usize>,
    ) -> Result<usize, RuleViolation> {
        self.players[seat]
            .piles()
            .find(Pile::Hand, card_id, hint)
            .ok_or(RuleViolation::CardNotFound {
                card: card_id,
                location: Pile::Hand.into(),
            })
    }

    fn devour_at(&mut self, seat: SeatIndex, hand_idx: usize) {
        if let Some(card) = self.players[seat].piles_mut().devour_from_hand(hand_idx) {
            tracing::debug!(%seat, card = %card.card_id, "card devoured");
            self.devoured.push(card);
        }
    }

    // === Cards ===

    fn play_card(
        &mut self,
        seat: SeatIndex,
        card_id: CardId,
        hand_idx: u32,
        skip_optional: bool,
    ) -> Result<(), RuleViolation> {
        let idx = self.find_in_hand(seat, card_id, Some(hand_idx as usize))?;
        let aspect = self
            .registry
            .get_card_by_id(card_id)
            .map(|d| d.aspect)
            .ok_or(RuleViolation::UnknownCard(card_id))?;

        let Some(card) = self.players[seat].piles_mut().play_from_hand(idx) else {
            return Err(RuleViolation::CardNotFound {
                card: card_id,
                location: Pile::Hand.into(),
            });
        };
        self.turn.record_played_card(aspect);
        EffectResolver::resolve_effects(self, seat, &card, skip_optional);
        Ok(())
    }

    fn buy_card(&mut self, seat: SeatIndex, card_id: CardId) -> Result<(), RuleViolation> {
        let idx = self
            .market
            .iter()
            .position(|c| c.card_id == card_id)
            .ok_or(RuleViolation::NotInMarket(card_id))?;
        let cost = self
            .registry
            .get_card_by_id(card_id)
            .map(|d| d.cost)
            .ok_or(RuleViolation::UnknownCard(card_id))?;

        self.players[seat].try_spend(Resource::Influence, cost)?;
        let card = self.market.remove(idx);
        self.players[seat].piles_mut().gain_to_discard(card);
        self.refill_market_slot();
        Ok(())
    }

    /// Devour on its own. A chained devour is only carried out by the
    /// command that finishes its chain.
    fn devour(
        &mut self,
        seat: SeatIndex,
        card_id: CardId,
        hand_idx: u32,
        source_card_id: CardId,
    ) -> Result<(), RuleViolation> {
        let req_idx = self.find_request(TargetKind::DevourHand, source_card_id, false)?;
        let idx = self.find_in_hand(seat, card_id, Some(hand_idx as usize))?;

        self.devour_at(seat, idx);
        self.pending.remove(req_idx);
        Ok(())
    }

    fn promote(&mut self, seat: SeatIndex, card_id: CardId) -> Result<(), RuleViolation> {
        let piles = self.players[seat].piles();
        let candidates: Vec<_> = [Pile::Played, Pile::Discard]
            .into_iter()
            .flat_map(|p| piles.pile(p).iter())
            .filter(|c| c.card_id == card_id)
            .map(|c| c.uid)
            .collect();
        let Some(&first) = candidates.first() else {
            return Err(RuleViolation::CardNotFound {
                card: card_id,
                location: Pile::Played.into(),
            });
        };
        let Some(uid) = candidates
            .into_iter()
            .find(|&uid| self.turn.has_valid_credit_for(uid))
        else {
            return Err(if self.turn.pending_credits() == 0 {
                RuleViolation::NoPromotionCredit(first)
            } else {
                RuleViolation::SelfPromotion(first)
            });
        };

        self.players[seat].piles_mut().promote(uid);
        self.turn.consume_credit_for(uid);
        Ok(())
    }

    // === Board ===

    fn deploy_troop(&mut self, seat: SeatIndex, node: NodeId) -> Result<(), RuleViolation> {
        if self.phase == Phase::Setup {
            self.map.deploy(node, &mut self.players[seat], 0)?;
            self.setup_remaining = self.setup_remaining.saturating_sub(1);
            if self.setup_remaining == 0 {
                self.advance_setup(seat);
            }
            return Ok(());
        }

        let color = self.color(seat);
        // A player with no troops on the board may deploy anywhere.
        if self.map.troop_count(color) > 0 {
            self.check_reach(node, color)?;
        }
        let free = self.turn.free_deploys() > 0;
        let cost = if free { 0 } else { self.config.costs.deploy };

        self.map.deploy(node, &mut self.players[seat], cost)?;
        if free {
            self.turn.take_free_deploy();
        }
        Ok(())
    }

    fn assassinate(
        &mut self,
        seat: SeatIndex,
        node: NodeId,
        card_id: Option<CardId>,
        devour_card_id: Option<CardId>,
    ) -> Result<(), RuleViolation> {
        let color = self.color(seat);
        let (req_idx, cost) = match card_id {
            Some(card) => (
                Some(self.find_request(TargetKind::Assassinate, card, devour_card_id.is_some())?),
                0,
            ),
            None if devour_card_id.is_some() => {
                return Err(RuleViolation::NotPurchasable(TargetKind::DevourHand));
            }
            None => (None, self.config.costs.assassinate),
        };
        self.check_reach(node, color)?;
        let devour_idx = devour_card_id
            .map(|d| self.find_in_hand(seat, d, None))
            .transpose()?;

        self.map.assassinate(node, &mut self.players[seat], cost)?;
        if let Some(idx) = devour_idx {
            self.devour_at(seat, idx);
        }
        if let Some(idx) = req_idx {
            self.pending.remove(idx);
        }
        Ok(())
    }

    fn supplant(
        &mut self,
        seat: SeatIndex,
        node: NodeId,
        card_id: CardId,
        devour_card_id: Option<CardId>,
    ) -> Result<(), RuleViolation> {
        let color = self.color(seat);
        let req_idx = self.find_request(TargetKind::Supplant, card_id, devour_card_id.is_some())?;
        self.check_reach(node, color)?;
        let devour_idx = devour_card_id
            .map(|d| self.find_in_hand(seat, d, None))
            .transpose()?;

        self.map.supplant(node, &mut self.players[seat], 0)?;
        if let Some(idx) = devour_idx {
            self.devour_at(seat, idx);
        }
        self.pending.remove(req_idx);
        Ok(())
    }

    fn return_troop(
        &mut self,
        seat: SeatIndex,
        node: NodeId,
        card_id: CardId,
    ) -> Result<(), RuleViolation> {
        let color = self.color(seat);
        let req_idx = self.find_request(TargetKind::ReturnTroop, card_id, false)?;
        self.check_reach(node, color)?;

        self.map.return_troop(node, &mut self.players[seat])?;
        self.pending.remove(req_idx);
        Ok(())
    }

    fn move_troop(
        &mut self,
        seat: SeatIndex,
        src: NodeId,
        dest: NodeId,
        card_id: CardId,
    ) -> Result<(), RuleViolation> {
        let color = self.color(seat);
        let req_idx = self.find_request(TargetKind::MoveTroop, card_id, false)?;
        self.check_reach(src, color)?;

        self.map.move_troop(src, dest, color)?;
        self.pending.remove(req_idx);
        Ok(())
    }

    fn place_spy(
        &mut self,
        seat: SeatIndex,
        site: SiteId,
        card_id: CardId,
    ) -> Result<(), RuleViolation> {
        let req_idx = self.find_request(TargetKind::PlaceSpy, card_id, false)?;

        self.map.place_spy(site, &mut self.players[seat])?;
        self.pending.remove(req_idx);
        Ok(())
    }

    fn resolve_spy(
        &mut self,
        seat: SeatIndex,
        site: SiteId,
        target: PlayerColor,
        card_id: Option<CardId>,
    ) -> Result<(), RuleViolation> {
        let color = self.color(seat);
        let (req_idx, cost) = match card_id {
            Some(card) => (Some(self.find_request(TargetKind::ReturnSpy, card, false)?), 0),
            None => (None, self.config.costs.return_spy),
        };
        self.map.check_site(site)?;
        if !self.map.site_presence(site, color) {
            return Err(RuleViolation::NoPresence { color, site });
        }

        self.map
            .return_spy(site, &mut self.players[seat], target, cost)?;
        if let Some((_, owner)) = self.players.iter_mut().find(|(_, p)| p.color == target) {
            owner.return_spy();
        }
        if let Some(idx) = req_idx {
            self.pending.remove(idx);
        }
        Ok(())
    }

    // === Turn flow ===

    /// Drop the oldest pending card action.
    fn skip_request(&mut self) {
        if let Some(request) = self.pending.pop_front() {
            tracing::debug!(
                kind = ?request.kind,
                card = %request.card_id,
                "target request skipped"
            );
        }
    }

    fn advance_setup(&mut self, seat: SeatIndex) {
        let next = seat.next(self.players.seat_count());
        if next.index() == 0 {
            self.phase = Phase::Main;
            self.log(None, "setup complete");
            self.start_turn(next);
        } else {
            self.active = next;
            self.setup_remaining = self.config.setup_troops;
            self.turn = self.turn.next_turn(next, self.turn_number);
        }
    }

    fn end_turn(&mut self, seat: SeatIndex) {
        self.pending.clear();
        let hand_size = self.config.hand_size;
        let piles = self.players[seat].piles_mut();
        piles.cleanup();
        piles.draw_many(hand_size, &mut self.rng);

        let supply_exhausted =
            self.market_deck.is_empty() && self.market.len() < self.config.market_size as usize;
        if supply_exhausted || self.players[seat].troops_in_barracks() == 0 {
            self.phase = Phase::GameOver;
            let scores = self.final_scores();
            let summary: Vec<String> = scores
                .iter()
                .map(|(s, score)| format!("{}: {}", s, score))
                .collect();
            self.log(None, format!("game over ({})", summary.join(", ")));
            return;
        }

        let next = seat.next(self.players.seat_count());
        if next.index() == 0 {
            self.turn_number += 1;
        }
        self.start_turn(next);
    }

    /// Hand the turn to `seat` and pay its site rewards.
    fn start_turn(&mut self, seat: SeatIndex) {
        self.active = seat;
        self.turn = self.turn.next_turn(seat, self.turn_number);
        distribute_start_of_turn_rewards(&self.map, &mut self.players[seat]);
        self.log(Some(seat), "turn started");
    }
}

fn describe(kind: &CommandKind) -> String {
    match kind {
        CommandKind::PlayCard { card_id, .. } => format!("played {}", card_id),
        CommandKind::BuyCard { card_id } => format!("bought {}", card_id),
        CommandKind::DeployTroop { node } => format!("deployed to {}", node),
        CommandKind::Devour { card_id, .. } => format!("devoured {}", card_id),
        CommandKind::ResolveSpy { site, color, .. } => {
            format!("returned {}'s spy from {}", color, site)
        }
        CommandKind::Assassinate { node, .. } => format!("assassinated at {}", node),
        CommandKind::Supplant { node, .. } => format!("supplanted at {}", node),
        CommandKind::PlaceSpy { site, .. } => format!("placed a spy at {}", site),
        CommandKind::MoveTroop { src, dest, .. } => format!("moved a troop {} -> {}", src, dest),
        CommandKind::ReturnTroop { node, .. } => format!("returned the troop at {}", node),
        CommandKind::Promote { card_id } => format!("promoted {}", card_id),
        other => other.name().to_string(),
    }
}
