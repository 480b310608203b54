//! Turn context: aspect counters, promotion ledger and action history.

pub mod context;

pub use context::{ActionRecord, PromotionCredit, TurnContext};
