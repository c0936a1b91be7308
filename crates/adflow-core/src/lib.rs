pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod feed;
pub mod ident;
pub mod matching;
pub mod paths;
pub mod placement;
pub mod rules;
pub mod snapshot;
pub mod types;

pub use aggregate::ActionItem;
pub use config::EngineConfig;
pub use engine::{derive_action_items, sort_by_priority, ActionSections, Engine};
pub use error::{AdflowError, Result};
pub use snapshot::Snapshot;
