//! Commands, the command log, replay and the match session.
//!
//! ## Key Types
//!
//! - `Command` / `CommandKind`: One player action as plain data
//! - `Match`: Game state plus targeting plus log, behind one `execute`
//! - `ReplayBundle` / `Replay`: Reproduce a match from seed and commands

#[allow(clippy::module_inception)]
pub mod command;
pub mod replay;
pub mod session;

pub use command::{Command, CommandKind};
pub use replay::{
    Replay, ReplayBundle, ReplayError, ReplayLog, ReplayReport, ReplayStepper, SeatDigest,
    StateDigest, StepOutcome,
};
pub use session::{Match, ViewMode};
