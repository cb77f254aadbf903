//! Entity definitions for the simulation: ships and the handles that name them.

mod components;
mod ship;

pub use components::*;
pub use ship::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable handle for a ship. Objectives key their progress by this, never by
/// where the ship happens to live in memory, so a copied ship needs a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub Uuid);

impl ShipId {
    /// Handle for a freshly built or copied ship.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero handle. No ship ever carries it, so events addressed to
    /// it are always untracked.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ShipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for a star system in the [`Galaxy`](crate::Galaxy) registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemId(pub Uuid);

impl SystemId {
    /// Handle for a newly registered system.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero handle. The registry never hands it out, so lookups
    /// with it find nothing.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for SystemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
