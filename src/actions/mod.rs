//! Targeted actions: the targeting state machine and its vocabulary.
//!
//! ## Key Types
//!
//! - `ActionState`: Where a targeting flow stands
//! - `ActionSystem`: Turns selections into committed commands
//! - `PreTarget`: A remembered choice for a later targeting phase

pub mod state;
pub mod system;

pub use state::{ActionSource, ActionState, Continuation, PreTarget, TargetKind};
pub use system::{ActionError, ActionSystem, BufferedDevour, Resolution};
