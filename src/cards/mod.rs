//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (cost, aspect, points, effects)
//! - `CardInstance`: One physical copy and its location tag
//! - `CardRegistry`: Card database lookup and market supply

mod builtin;
pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{Aspect, CardDefinition, CardId};
pub use instance::{CardInstance, CardLocation};
pub use registry::CardRegistry;
