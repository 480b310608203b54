//! The targeting state machine.
//!
//! The action system turns a sequence of clicks into one command. It
//! holds only selection state; every board or resource change goes
//! through `ReplayLog::commit`, which executes and records the command
//! in one step.
//!
//! A failed attempt returns `Err` and leaves the system exactly as it
//! was, pending selections included. The player can pick again or
//! cancel.
//!
//! ## Deferred devour
//!
//! `try_start_devour_hand` with `defer` set buffers the chosen hand card
//! instead of devouring it, then starts the continuation's targeting.
//! The command that finishes the continuation names the buffered card,
//! so executing it performs both steps at once.

use rustc_hash::FxHashMap;

use super::state::{ActionSource, ActionState, Continuation, PreTarget, TargetKind};
use crate::cards::CardId;
use crate::command::{Command, CommandKind, ReplayLog};
use crate::core::{CardUid, GameState, NodeId, PlayerColor, RuleViolation, SiteId};
use crate::zones::Pile;

/// Action system failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no targeting in progress")]
    NotTargeting,

    #[error("already in {0:?}")]
    AlreadyTargeting(ActionState),

    #[error("no legal target for {0:?}")]
    NoLegalTarget(TargetKind),

    #[error("a target must be chosen")]
    MissingTarget,

    #[error("{0:?} does not accept this selection")]
    WrongSelection(ActionState),

    #[error("no card at hand position {0}")]
    InvalidHandIndex(usize),

    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

/// Outcome of a successful step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Waiting for the next selection.
    Awaiting(ActionState),
    /// A command was executed and logged. `next` is the state the
    /// system moved to afterwards.
    Committed { command: Command, next: ActionState },
}

/// A hand card chosen for a deferred devour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferedDevour {
    pub card_id: CardId,
    pub hand_idx: usize,
}

/// Multi-step targeting for the active seat.
#[derive(Clone, Debug, Default)]
pub struct ActionSystem {
    state: ActionState,
    source: Option<ActionSource>,
    move_source: Option<NodeId>,
    pending_site: Option<SiteId>,
    buffered_devour: Option<BufferedDevour>,
    continuation: Option<Continuation>,
    defer: bool,
    pre_targets: FxHashMap<(CardUid, TargetKind), PreTarget>,
}

impl ActionSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ActionState {
        self.state
    }

    #[must_use]
    pub fn source(&self) -> Option<ActionSource> {
        self.source
    }

    #[must_use]
    pub fn move_source(&self) -> Option<NodeId> {
        self.move_source
    }

    #[must_use]
    pub fn pending_site(&self) -> Option<SiteId> {
        self.pending_site
    }

    #[must_use]
    pub fn buffered_devour(&self) -> Option<BufferedDevour> {
        self.buffered_devour
    }

    // === Pre-targets ===

    /// Remember a choice for `card`'s later `kind` targeting phase.
    pub fn set_pre_target(&mut self, card: CardUid, kind: TargetKind, target: PreTarget) {
        self.pre_targets.insert((card, kind), target);
    }

    /// Take a remembered choice. A second call returns `None`.
    pub fn get_and_clear_pre_target(
        &mut self,
        card: CardUid,
        kind: TargetKind,
    ) -> Option<PreTarget> {
        self.pre_targets.remove(&(card, kind))
    }

    // === Entering ===

    /// Begin targeting `kind`, paid for by `source`.
    ///
    /// Refuses when no legal target exists, so the player can never be
    /// stuck in a state they cannot leave by clicking. A stored
    /// pre-target for the source card is applied at once. Devouring for
    /// a card whose devour is chained resumes that chain.
    pub fn start_targeting(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        kind: TargetKind,
        source: ActionSource,
    ) -> Result<Resolution, ActionError> {
        if self.state.is_targeting() {
            return Err(ActionError::AlreadyTargeting(self.state));
        }
        if kind == TargetKind::DevourHand {
            let then = source
                .uid()
                .and_then(|uid| {
                    game.pending_requests()
                        .iter()
                        .find(|r| r.source == uid && r.kind == TargetKind::DevourHand)
                })
                .and_then(|r| r.then);
            let continuation = then.map(Continuation::StartTargeting);
            return self.try_start_devour_hand(game, source, continuation, then.is_some());
        }
        if !game.has_legal_target(game.active_seat(), kind, source) {
            return Err(ActionError::NoLegalTarget(kind));
        }
        self.enter(game, kind, source);
        Ok(self.apply_pre_target(game, log, kind, source))
    }

    /// Begin choosing a hand card to devour.
    ///
    /// With `defer` and a continuation, the choice is buffered and the
    /// continuation's action carries out the devour. Both steps must
    /// have a legal target before anything starts.
    pub fn try_start_devour_hand(
        &mut self,
        game: &GameState,
        source: ActionSource,
        continuation: Option<Continuation>,
        defer: bool,
    ) -> Result<Resolution, ActionError> {
        if self.state.is_targeting() {
            return Err(ActionError::AlreadyTargeting(self.state));
        }
        let seat = game.active_seat();
        if !game.has_legal_target(seat, TargetKind::DevourHand, source) {
            return Err(ActionError::NoLegalTarget(TargetKind::DevourHand));
        }
        if defer {
            if let Some(Continuation::StartTargeting(next)) = continuation {
                if !game.has_legal_target(seat, next, source) {
                    return Err(ActionError::NoLegalTarget(next));
                }
            }
        }

        self.state = ActionState::TargetingDevourHand;
        self.source = Some(source);
        self.continuation = continuation;
        self.defer = defer && continuation.is_some();
        Ok(Resolution::Awaiting(self.state))
    }

    /// Start targeting the oldest pending card action.
    ///
    /// Requests with no legal target are given up (an `ActionCompleted`
    /// is committed for each) and the next one is tried. Returns `None`
    /// when nothing is pending.
    pub fn start_next_request(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
    ) -> Result<Option<Resolution>, ActionError> {
        if self.state.is_targeting() {
            return Err(ActionError::AlreadyTargeting(self.state));
        }
        while let Some(request) = game.pending_requests().front().copied() {
            let source = ActionSource::Card {
                uid: request.source,
                card_id: request.card_id,
            };
            let result = match request.kind {
                TargetKind::DevourHand => {
                    let continuation = request.then.map(Continuation::StartTargeting);
                    let defer = request.then.is_some();
                    self.try_start_devour_hand(game, source, continuation, defer)
                }
                kind => self.start_targeting(game, log, kind, source),
            };
            match result {
                Err(ActionError::NoLegalTarget(kind)) => {
                    tracing::debug!(
                        ?kind,
                        card = %request.card_id,
                        "no legal target, giving up request"
                    );
                    log.commit(game, game.active_seat(), CommandKind::ActionCompleted)?;
                }
                other => return other.map(Some),
            }
        }
        Ok(None)
    }

    fn enter(&mut self, game: &GameState, kind: TargetKind, source: ActionSource) {
        let promotions = if kind == TargetKind::Promote {
            game.turn().pending_credits() as u32
        } else {
            0
        };
        self.state = ActionState::entry(kind, promotions);
        self.source = Some(source);
    }

    fn apply_pre_target(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        kind: TargetKind,
        source: ActionSource,
    ) -> Resolution {
        let awaiting = Resolution::Awaiting(self.state);
        let Some(uid) = source.uid() else {
            return awaiting;
        };
        let Some(pre) = self.get_and_clear_pre_target(uid, kind) else {
            return awaiting;
        };
        let result = match pre {
            PreTarget::Node(node) => self.handle_target_click(game, log, Some(node), None),
            PreTarget::Site(site) => self.handle_target_click(game, log, None, Some(site)),
            PreTarget::Skipped => self.skip(game, log, uid),
        };
        match result {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::debug!(%err, "stored pre-target no longer applies");
                Resolution::Awaiting(self.state)
            }
        }
    }

    /// Give up the current card action.
    fn skip(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        uid: CardUid,
    ) -> Result<Resolution, ActionError> {
        let front_is_ours = game.pending_requests().front().is_some_and(|r| r.source == uid);
        if !front_is_ours {
            self.reset();
            return Ok(Resolution::Awaiting(self.state));
        }
        self.commit_and_finish(game, log, CommandKind::ActionCompleted)
    }

    // === Selections ===

    /// Resolve a board click in the current state.
    pub fn handle_target_click(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        node: Option<NodeId>,
        site: Option<SiteId>,
    ) -> Result<Resolution, ActionError> {
        let source = self.source.ok_or(ActionError::NotTargeting)?;
        let card = |kind| source.card_id().ok_or(RuleViolation::NotPurchasable(kind));
        let color = game.active_player().color;

        match self.state {
            ActionState::Normal => Err(ActionError::NotTargeting),
            ActionState::TargetingAssassinate => {
                let node = node.ok_or(ActionError::MissingTarget)?;
                let kind = CommandKind::Assassinate {
                    node,
                    card_id: source.card_id(),
                    devour_card_id: self.buffered_devour.map(|b| b.card_id),
                };
                self.commit_and_finish(game, log, kind)
            }
            ActionState::TargetingSupplant => {
                let node = node.ok_or(ActionError::MissingTarget)?;
                let kind = CommandKind::Supplant {
                    node,
                    card_id: card(TargetKind::Supplant)?,
                    devour_card_id: self.buffered_devour.map(|b| b.card_id),
                };
                self.commit_and_finish(game, log, kind)
            }
            ActionState::TargetingReturnTroop => {
                let node = node.ok_or(ActionError::MissingTarget)?;
                let kind = CommandKind::ReturnTroop {
                    node,
                    card_id: card(TargetKind::ReturnTroop)?,
                };
                self.commit_and_finish(game, log, kind)
            }
            ActionState::TargetingMoveSource => {
                let node = node.ok_or(ActionError::MissingTarget)?;
                game.map().check_node(node)?;
                if game.map().occupant(node).is_none() {
                    return Err(RuleViolation::NodeEmpty(node).into());
                }
                if !game.is_move_source(node, color) {
                    return Err(RuleViolation::NoReach { color, node }.into());
                }
                self.move_source = Some(node);
                self.state = ActionState::TargetingMoveDestination;
                Ok(Resolution::Awaiting(self.state))
            }
            ActionState::TargetingMoveDestination => {
                let dest = node.ok_or(ActionError::MissingTarget)?;
                let src = self.move_source.ok_or(ActionError::MissingTarget)?;
                let kind = CommandKind::MoveTroop {
                    src,
                    dest,
                    card_id: card(TargetKind::MoveTroop)?,
                };
                self.commit_and_finish(game, log, kind)
            }
            ActionState::TargetingPlaceSpy => {
                let site = clicked_site(game, node, site)?;
                let kind = CommandKind::PlaceSpy {
                    site,
                    card_id: card(TargetKind::PlaceSpy)?,
                };
                self.commit_and_finish(game, log, kind)
            }
            ActionState::TargetingReturnSpy => {
                let site = clicked_site(game, node, site)?;
                game.map().check_site(site)?;
                if !game.map().site_presence(site, color) {
                    return Err(RuleViolation::NoPresence { color, site }.into());
                }
                match game.returnable_spies(site, color).as_slice() {
                    [] => Err(ActionError::NoLegalTarget(TargetKind::ReturnSpy)),
                    [only] => {
                        let kind = CommandKind::ResolveSpy {
                            site,
                            color: *only,
                            card_id: source.card_id(),
                        };
                        self.commit_and_finish(game, log, kind)
                    }
                    _ => {
                        self.pending_site = Some(site);
                        self.state = ActionState::SelectingSpyToReturn;
                        Ok(Resolution::Awaiting(self.state))
                    }
                }
            }
            ActionState::TargetingDevourHand
            | ActionState::SelectingSpyToReturn
            | ActionState::TargetingPromote(_) => Err(ActionError::WrongSelection(self.state)),
        }
    }

    /// Resolve the choice of a hand card in `TargetingDevourHand`.
    pub fn handle_devour_selection(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        hand_idx: usize,
    ) -> Result<Resolution, ActionError> {
        if self.state != ActionState::TargetingDevourHand {
            return Err(ActionError::WrongSelection(self.state));
        }
        let source = self.source.ok_or(ActionError::NotTargeting)?;
        let seat = game.active_seat();
        let card_id = game
            .active_player()
            .piles()
            .pile(Pile::Hand)
            .get(hand_idx)
            .map(|c| c.card_id)
            .ok_or(ActionError::InvalidHandIndex(hand_idx))?;

        if self.defer {
            let Some(Continuation::StartTargeting(next)) = self.continuation else {
                return Err(ActionError::MissingTarget);
            };
            if !game.has_legal_target(seat, next, source) {
                return Err(ActionError::NoLegalTarget(next));
            }
            tracing::debug!(card = %card_id, ?next, "devour buffered");
            self.buffered_devour = Some(BufferedDevour { card_id, hand_idx });
            self.continuation = None;
            self.enter(game, next, source);
            return Ok(self.apply_pre_target(game, log, next, source));
        }

        let source_card_id = source
            .card_id()
            .ok_or(RuleViolation::NotPurchasable(TargetKind::DevourHand))?;
        let command = log.commit(
            game,
            seat,
            CommandKind::Devour {
                card_id,
                hand_idx: hand_idx as u32,
                source_card_id,
            },
        )?;
        match self.continuation.take() {
            Some(Continuation::StartTargeting(next))
                if game.has_legal_target(seat, next, source) =>
            {
                self.reset_selections();
                self.enter(game, next, source);
                Ok(Resolution::Committed {
                    command,
                    next: self.state,
                })
            }
            _ => {
                self.reset();
                Ok(Resolution::Committed {
                    command,
                    next: ActionState::Normal,
                })
            }
        }
    }

    /// Pick which enemy spy to return after `SelectingSpyToReturn`.
    pub fn finalize_spy_return(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        color: PlayerColor,
    ) -> Result<Resolution, ActionError> {
        if self.state != ActionState::SelectingSpyToReturn {
            return Err(ActionError::WrongSelection(self.state));
        }
        let source = self.source.ok_or(ActionError::NotTargeting)?;
        let site = self.pending_site.ok_or(ActionError::MissingTarget)?;
        let kind = CommandKind::ResolveSpy {
            site,
            color,
            card_id: source.card_id(),
        };
        self.commit_and_finish(game, log, kind)
    }

    /// Promote a card from Played or Discard.
    pub fn handle_promote_selection(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        card_id: CardId,
    ) -> Result<Resolution, ActionError> {
        let ActionState::TargetingPromote(remaining) = self.state else {
            return Err(ActionError::WrongSelection(self.state));
        };
        let source = self.source.ok_or(ActionError::NotTargeting)?;
        let seat = game.active_seat();

        let command = log.commit(game, seat, CommandKind::Promote { card_id })?;
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 && game.has_legal_target(seat, TargetKind::Promote, source) {
            self.state = ActionState::TargetingPromote(remaining);
        } else {
            self.reset();
        }
        Ok(Resolution::Committed {
            command,
            next: self.state,
        })
    }

    /// Drop every pending selection and return to `Normal`. Nothing on
    /// the board or in any pile changes.
    pub fn cancel_targeting(&mut self) {
        if self.state.is_targeting() {
            tracing::debug!(state = ?self.state, "targeting cancelled");
        }
        self.reset();
    }

    fn commit_and_finish(
        &mut self,
        game: &mut GameState,
        log: &mut ReplayLog,
        kind: CommandKind,
    ) -> Result<Resolution, ActionError> {
        let command = log.commit(game, game.active_seat(), kind)?;
        self.reset();
        Ok(Resolution::Committed {
            command,
            next: ActionState::Normal,
        })
    }

    fn reset_selections(&mut self) {
        self.move_source = None;
        self.pending_site = None;
        self.buffered_devour = None;
        self.continuation = None;
        self.defer = false;
    }

    fn reset(&mut self) {
        self.reset_selections();
        self.state = ActionState::Normal;
        self.source = None;
    }
}

fn clicked_site(
    game: &GameState,
    node: Option<NodeId>,
    site: Option<SiteId>,
) -> Result<SiteId, ActionError> {
    site.or_else(|| node.and_then(|n| game.map().site_of(n)))
        .ok_or(ActionError::MissingTarget)
}
