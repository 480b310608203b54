//! Command log and replay.
//!
//! A match is fully described by its seed, its configuration and the
//! ordered commands that were executed. `ReplayLog` records commands as
//! they succeed; `ReplayBundle` stores them; `Replay` and `ReplayStepper`
//! drive a fresh match through the same commands.
//!
//! ## Key Types
//!
//! - `ReplayLog`: Executes and records commands with increasing sequence numbers
//! - `ReplayBundle`: `{seed, config, commands}`, as JSON or bincode
//! - `ReplayStepper`: Step-wise playback for throttled viewers
//! - `StateDigest`: Comparable summary of a match for determinism checks

use serde::{Deserialize, Serialize};

use super::command::{Command, CommandKind};
use super::session::Match;
use crate::cards::{CardId, CardRegistry};
use crate::core::{
    DataError, GameConfig, GameRngState, GameState, Phase, PlayerColor, Resource, RuleViolation,
    SeatIndex,
};
use crate::map::MapGraph;
use crate::zones::Pile;

/// Replay failure.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("command #{found} is out of order, expected #{expected}")]
    OutOfOrder { expected: u64, found: u64 },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("command #{seq} failed: {source}")]
    Command { seq: u64, source: RuleViolation },
}

// =============================================================================
// Log
// =============================================================================

/// Commands executed so far, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayLog {
    commands: Vec<Command>,
}

impl ReplayLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next command will get.
    #[must_use]
    pub fn next_seq(&self) -> u64 {
        self.commands.len() as u64
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Execute `kind` for `seat` and record it.
    ///
    /// A rejected command is not recorded and does not use up a
    /// sequence number.
    pub fn commit(
        &mut self,
        game: &mut GameState,
        seat: SeatIndex,
        kind: CommandKind,
    ) -> Result<Command, RuleViolation> {
        let command = Command::new(self.next_seq(), seat, kind);
        if let Err(err) = game.execute(&command) {
            tracing::debug!(%command, %err, "command rejected");
            return Err(err);
        }
        tracing::debug!(%command, "command committed");
        self.commands.push(command.clone());
        Ok(command)
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// Everything needed to reproduce a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayBundle {
    pub seed: u64,
    #[serde(default)]
    pub config: GameConfig,
    pub commands: Vec<Command>,
}

impl ReplayBundle {
    #[must_use]
    pub fn new(seed: u64, config: GameConfig, commands: Vec<Command>) -> Self {
        Self {
            seed,
            config,
            commands,
        }
    }

    /// Sequence numbers must run 0, 1, 2, ...
    pub fn validate(&self) -> Result<(), ReplayError> {
        for (expected, command) in (0u64..).zip(&self.commands) {
            if command.seq != expected {
                return Err(ReplayError::OutOfOrder {
                    expected,
                    found: command.seq,
                });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let bundle: Self = serde_json::from_str(json).map_err(DataError::from)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DataError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        let bundle: Self = bincode::deserialize(bytes).map_err(DataError::from)?;
        bundle.validate()?;
        Ok(bundle)
    }
}

// =============================================================================
// Playback
// =============================================================================

/// What one playback step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Executed the command with this sequence number.
    Executed(u64),
    /// No commands left.
    Finished,
    /// A command failed earlier; playback stopped there.
    Halted,
}

/// Plays a bundle back one command at a time.
#[derive(Debug)]
pub struct ReplayStepper {
    session: Match,
    commands: Vec<Command>,
    cursor: usize,
    halted: Option<ReplayError>,
}

impl ReplayStepper {
    /// Rebuild the opening of `bundle`'s match.
    pub fn new(
        bundle: &ReplayBundle,
        registry: &CardRegistry,
        map: &MapGraph,
    ) -> Result<Self, ReplayError> {
        bundle.validate()?;
        let session = Match::new(
            bundle.config.clone(),
            registry.clone(),
            map.clone(),
            bundle.seed,
        )?;
        Ok(Self {
            session,
            commands: bundle.commands.clone(),
            cursor: 0,
            halted: None,
        })
    }

    /// Replace the game log sink of the rebuilt match.
    #[must_use]
    pub fn with_sink(self, sink: Box<dyn crate::core::LogSink>) -> Self {
        Self {
            session: self.session.with_sink(sink),
            ..self
        }
    }

    /// Execute the next command.
    pub fn step(&mut self) -> StepOutcome {
        if self.halted.is_some() {
            return StepOutcome::Halted;
        }
        let Some(command) = self.commands.get(self.cursor) else {
            return StepOutcome::Finished;
        };
        match self.session.replay_command(command) {
            Ok(()) => {
                self.cursor += 1;
                StepOutcome::Executed(command.seq)
            }
            Err(err) => {
                tracing::warn!(%err, "replay halted");
                self.halted = Some(err);
                StepOutcome::Halted
            }
        }
    }

    /// Commands executed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.commands.len() - self.cursor
    }

    #[must_use]
    pub fn halted(&self) -> Option<&ReplayError> {
        self.halted.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> &Match {
        &self.session
    }

    #[must_use]
    pub fn into_report(self) -> ReplayReport {
        ReplayReport {
            session: self.session,
            executed: self.cursor,
            halted: self.halted,
        }
    }
}

/// Result of a full playback.
#[derive(Debug)]
pub struct ReplayReport {
    /// The match as it stood when playback stopped.
    pub session: Match,
    pub executed: usize,
    pub halted: Option<ReplayError>,
}

impl ReplayReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }
}

/// Full playback.
pub struct Replay;

impl Replay {
    /// Play every command of `bundle` against a fresh match.
    ///
    /// A bad bundle is an `Err`. A command that fails stops playback;
    /// the report carries the error and the state reached before it.
    pub fn run(
        bundle: &ReplayBundle,
        registry: &CardRegistry,
        map: &MapGraph,
    ) -> Result<ReplayReport, ReplayError> {
        Self::run_with(ReplayStepper::new(bundle, registry, map)?)
    }

    /// Like `run`, with the rebuilt match logging to `sink`.
    pub fn run_with_sink(
        bundle: &ReplayBundle,
        registry: &CardRegistry,
        map: &MapGraph,
        sink: Box<dyn crate::core::LogSink>,
    ) -> Result<ReplayReport, ReplayError> {
        Self::run_with(ReplayStepper::new(bundle, registry, map)?.with_sink(sink))
    }

    fn run_with(mut stepper: ReplayStepper) -> Result<ReplayReport, ReplayError> {
        while let StepOutcome::Executed(_) = stepper.step() {}
        Ok(stepper.into_report())
    }
}

// =============================================================================
// Digest
// =============================================================================

/// Per-seat part of a `StateDigest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeatDigest {
    pub seat: SeatIndex,
    pub color: PlayerColor,
    pub power: u32,
    pub influence: u32,
    pub victory_points: u32,
    pub troops_in_barracks: u32,
    pub spies_in_barracks: u32,
    pub hand: Vec<CardId>,
    pub deck_size: usize,
    pub discard_size: usize,
    pub inner_circle: Vec<CardId>,
    pub trophies: usize,
}

/// Comparable snapshot of everything replay must reproduce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateDigest {
    pub phase: Phase,
    pub turn_number: u32,
    pub active: SeatIndex,
    pub seats: Vec<SeatDigest>,
    /// Occupant per node, in node id order.
    pub occupancy: Vec<Option<PlayerColor>>,
    /// Spies per site, in site id order.
    pub spies: Vec<Vec<PlayerColor>>,
    pub owners: Vec<Option<PlayerColor>>,
    pub market: Vec<CardId>,
    pub rng: GameRngState,
}

impl StateDigest {
    #[must_use]
    pub fn of(game: &GameState) -> Self {
        let ids = |pile: Pile, player: &crate::core::PlayerState| {
            player.piles().pile(pile).iter().map(|c| c.card_id).collect()
        };
        let seats = game
            .players()
            .iter()
            .map(|(seat, p)| SeatDigest {
                seat,
                color: p.color,
                power: p.resource(Resource::Power),
                influence: p.resource(Resource::Influence),
                victory_points: p.resource(Resource::VictoryPoints),
                troops_in_barracks: p.troops_in_barracks(),
                spies_in_barracks: p.spies_in_barracks(),
                hand: ids(Pile::Hand, p),
                deck_size: p.piles().len(Pile::Deck),
                discard_size: p.piles().len(Pile::Discard),
                inner_circle: ids(Pile::InnerCircle, p),
                trophies: p.trophies().len(),
            })
            .collect();
        let map = game.map();

        Self {
            phase: game.phase(),
            turn_number: game.turn_number(),
            active: game.active_seat(),
            seats,
            occupancy: map.nodes().iter().map(|n| n.occupant()).collect(),
            spies: map.sites().iter().map(|s| s.spies().to_vec()).collect(),
            owners: map.sites().iter().map(|s| s.owner()).collect(),
            market: game.market().iter().map(|c| c.card_id).collect(),
            rng: game.rng_state(),
        }
    }
}

impl GameState {
    #[must_use]
    pub fn digest(&self) -> StateDigest {
        StateDigest::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NullSink;

    fn game() -> GameState {
        GameState::new(
            GameConfig::default().with_setup_troops(0),
            CardRegistry::builtin(),
            MapGraph::builtin(),
            5,
        )
        .unwrap()
        .with_sink(Box::new(NullSink))
    }

    #[test]
    fn test_commit_assigns_sequence() {
        let mut game = game();
        let mut log = ReplayLog::new();
        let seat = game.active_seat();

        let first = log.commit(&mut game, seat, CommandKind::ToggleMarket).unwrap();
        let second = log.commit(&mut game, seat, CommandKind::EndTurn).unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_rejected_command_not_recorded() {
        let mut game = game();
        let mut log = ReplayLog::new();
        let other = game.active_seat().next(2);

        let err = log.commit(&mut game, other, CommandKind::EndTurn).unwrap_err();
        assert!(matches!(err, RuleViolation::WrongSeat { .. }));
        assert!(log.is_empty());
        assert_eq!(log.next_seq(), 0);
    }

    #[test]
    fn test_validate_sequence() {
        let seat = SeatIndex::new(0);
        let ok = ReplayBundle::new(
            1,
            GameConfig::default(),
            vec![
                Command::new(0, seat, CommandKind::EndTurn),
                Command::new(1, seat, CommandKind::EndTurn),
            ],
        );
        assert!(ok.validate().is_ok());

        let gap = ReplayBundle::new(
            1,
            GameConfig::default(),
            vec![Command::new(1, seat, CommandKind::EndTurn)],
        );
        assert!(matches!(
            gap.validate(),
            Err(ReplayError::OutOfOrder { expected: 0, found: 1 })
        ));
    }

    #[test]
    fn test_bundle_json_without_config_uses_default() {
        let json = r#"{"seed": 9, "commands": [{"seq": 0, "seat": 0, "kind": "EndTurn"}]}"#;
        let bundle = ReplayBundle::from_json(json).unwrap();
        assert_eq!(bundle.seed, 9);
        assert_eq!(bundle.config, GameConfig::default());
        assert_eq!(bundle.commands[0].kind, CommandKind::EndTurn);
    }

    #[test]
    fn test_bundle_malformed_json() {
        assert!(matches!(
            ReplayBundle::from_json("{not json"),
            Err(ReplayError::Data(DataError::Json(_)))
        ));
    }

    #[test]
    fn test_digest_tracks_board() {
        let game = game();
        let digest = game.digest();
        assert_eq!(digest.seats.len(), 2);
        assert_eq!(digest.occupancy.len(), game.map().nodes().len());
        assert!(digest.occupancy.iter().all(Option::is_none));
        assert_eq!(digest.rng, game.rng_state());
    }
}
