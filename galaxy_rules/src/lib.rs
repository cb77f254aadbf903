//! # Galaxy Rules
//!
//! Shared simulation data that mission objectives are built from: ships and
//! their handles, the interactions the simulation reports against them, and
//! the galaxy registry of systems, factions, and stock definitions.
//! This crate knows nothing about objectives themselves.

pub mod entities;
pub mod mechanics;
pub mod text;
pub mod world_state;

pub use entities::*;
pub use mechanics::*;
pub use text::*;
pub use world_state::*;
