//! A running match: game state, targeting and the command log together.

use super::command::{Command, CommandKind};
use super::replay::{ReplayBundle, ReplayError, ReplayLog, StateDigest};
use crate::actions::{ActionError, ActionSource, ActionSystem, PreTarget, Resolution, TargetKind};
use crate::cards::{CardId, CardRegistry};
use crate::core::{
    CardUid, DataError, GameConfig, GameState, LogSink, NodeId, PlayerColor, RuleViolation,
    SeatIndex, SiteId,
};
use crate::map::MapGraph;
use crate::rules::GameResult;

/// Which part of the table the session shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Board,
    Cards,
}

impl ViewMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Board => ViewMode::Cards,
            ViewMode::Cards => ViewMode::Board,
        }
    }
}

/// One match in progress.
///
/// `execute` is the uniform entry point for every command kind. The
/// targeting helpers drive the `ActionSystem`, which commits through
/// the same log.
#[derive(Debug)]
pub struct Match {
    game: GameState,
    actions: ActionSystem,
    log: ReplayLog,
    market_open: bool,
    mode: ViewMode,
}

impl Match {
    pub fn new(
        config: GameConfig,
        registry: CardRegistry,
        map: MapGraph,
        seed: u64,
    ) -> Result<Self, DataError> {
        Ok(Self::from_game(GameState::new(config, registry, map, seed)?))
    }

    #[must_use]
    pub fn from_game(game: GameState) -> Self {
        Self {
            game,
            actions: ActionSystem::new(),
            log: ReplayLog::new(),
            market_open: false,
            mode: ViewMode::default(),
        }
    }

    #[must_use]
    pub fn with_sink(self, sink: Box<dyn LogSink>) -> Self {
        Self {
            game: self.game.with_sink(sink),
            ..self
        }
    }

    #[must_use]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    #[must_use]
    pub fn actions(&self) -> &ActionSystem {
        &self.actions
    }

    #[must_use]
    pub fn log(&self) -> &ReplayLog {
        &self.log
    }

    #[must_use]
    pub fn market_open(&self) -> bool {
        self.market_open
    }

    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    #[must_use]
    pub fn active_seat(&self) -> SeatIndex {
        self.game.active_seat()
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.game.result()
    }

    #[must_use]
    pub fn digest(&self) -> StateDigest {
        self.game.digest()
    }

    /// Everything needed to replay this match so far.
    #[must_use]
    pub fn bundle(&self) -> ReplayBundle {
        ReplayBundle::new(
            self.game.seed(),
            self.game.config().clone(),
            self.log.commands().to_vec(),
        )
    }

    // === Dispatch ===

    /// Execute any command for `seat` and record it.
    pub fn execute(
        &mut self,
        seat: SeatIndex,
        kind: CommandKind,
    ) -> Result<Command, RuleViolation> {
        let skipped = match kind {
            CommandKind::ActionCompleted => self.game.pending_requests().front().map(|r| r.source),
            _ => None,
        };
        let command = self.log.commit(&mut self.game, seat, kind)?;

        match command.kind {
            CommandKind::ToggleMarket => self.market_open = !self.market_open,
            CommandKind::SwitchMode => self.mode = self.mode.toggled(),
            CommandKind::CancelAction | CommandKind::EndTurn => self.actions.cancel_targeting(),
            CommandKind::ActionCompleted => {
                if skipped.is_some() && self.actions.source().and_then(|s| s.uid()) == skipped {
                    self.actions.cancel_targeting();
                }
            }
            _ => {}
        }
        Ok(command)
    }

    /// Execute a recorded command. Its sequence number must be the next
    /// one in this match's log.
    pub fn replay_command(&mut self, command: &Command) -> Result<(), ReplayError> {
        let expected = self.log.next_seq();
        if command.seq != expected {
            return Err(ReplayError::OutOfOrder {
                expected,
                found: command.seq,
            });
        }
        self.execute(command.seat, command.kind.clone())
            .map(|_| ())
            .map_err(|source| ReplayError::Command {
                seq: command.seq,
                source,
            })
    }

    // === Targeting ===

    pub fn start_targeting(
        &mut self,
        kind: TargetKind,
        source: ActionSource,
    ) -> Result<Resolution, ActionError> {
        self.actions
            .start_targeting(&mut self.game, &mut self.log, kind, source)
    }

    /// Start the oldest pending card action, if any.
    pub fn start_next_request(&mut self) -> Result<Option<Resolution>, ActionError> {
        self.actions.start_next_request(&mut self.game, &mut self.log)
    }

    pub fn click_node(&mut self, node: NodeId) -> Result<Resolution, ActionError> {
        self.actions
            .handle_target_click(&mut self.game, &mut self.log, Some(node), None)
    }

    pub fn click_site(&mut self, site: SiteId) -> Result<Resolution, ActionError> {
        self.actions
            .handle_target_click(&mut self.game, &mut self.log, None, Some(site))
    }

    pub fn select_devour(&mut self, hand_idx: usize) -> Result<Resolution, ActionError> {
        self.actions
            .handle_devour_selection(&mut self.game, &mut self.log, hand_idx)
    }

    pub fn select_spy(&mut self, color: PlayerColor) -> Result<Resolution, ActionError> {
        self.actions
            .finalize_spy_return(&mut self.game, &mut self.log, color)
    }

    pub fn select_promote(&mut self, card_id: CardId) -> Result<Resolution, ActionError> {
        self.actions
            .handle_promote_selection(&mut self.game, &mut self.log, card_id)
    }

    pub fn set_pre_target(&mut self, card: CardUid, kind: TargetKind, target: PreTarget) {
        self.actions.set_pre_target(card, kind, target);
    }

    /// Cancel targeting for the active seat through a logged `CancelAction`.
    pub fn cancel(&mut self) -> Result<Command, RuleViolation> {
        self.execute(self.game.active_seat(), CommandKind::CancelAction)
    }
}
