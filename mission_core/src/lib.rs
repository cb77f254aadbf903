//! # Mission Core
//!
//! Mission NPC objectives. An objective tracks a handful of ships during a
//! mission and decides, from the interactions the simulation reports, whether
//! the player has succeeded or failed.
//!
//! ## Core Components
//!
//! - **objective**: Templates, live records, and success/failure evaluation
//! - **instantiator**: Turns a template into a placed, trackable record
//! - **datafile**: TOML loading of templates and saving of live records
//! - **events**: Notices raised when an objective succeeds or fails
//!
//! ## Lifecycle
//!
//! - The mission framework loads an [`ObjectiveTemplate`]
//! - On activation it calls [`Instantiator::instantiate`] once to get an [`ObjectiveRecord`]
//! - Every [`galaxy_rules::ShipEvent`] goes through [`ObjectiveRecord::handle`] until the mission ends

pub mod datafile;
pub mod error;
pub mod events;
pub mod instantiator;
pub mod objective;

pub use datafile::*;
pub use error::*;
pub use events::*;
pub use instantiator::*;
pub use objective::*;

pub use galaxy_rules::{replace, Conversation, Substitutions, NPC_KEY};
