//! Game rules: command execution, target legality and scoring.
//!
//! Everything here is `impl GameState`:
//! - `execute`: validate then apply one command
//! - `has_legal_target`: whether a targeting flow can finish
//! - `final_scores` / `result`: end-of-match scoring

pub mod engine;
pub mod scoring;
pub mod targets;

pub use scoring::GameResult;
