//! Per-ship progress toward an objective.

use galaxy_rules::{EventKind, EventMask, ShipId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accumulated interactions for each tracked ship. Masks only ever grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Progress {
    actions: HashMap<ShipId, EventMask>,
}

impl Progress {
    /// Create a new empty progress map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `kind` happened to `ship`. Recording it again changes nothing.
    pub fn record(&mut self, ship: ShipId, kind: EventKind) {
        *self.actions.entry(ship).or_default() |= kind;
    }

    /// Merge a whole mask of prior actions into a ship's entry.
    pub fn merge(&mut self, ship: ShipId, mask: EventMask) {
        if mask.is_empty() {
            return;
        }
        *self.actions.entry(ship).or_default() |= mask;
    }

    /// Replace a ship's mask outright. An empty mask drops the entry.
    pub fn set(&mut self, ship: ShipId, mask: EventMask) {
        if mask.is_empty() {
            self.actions.remove(&ship);
        } else {
            self.actions.insert(ship, mask);
        }
    }

    /// The accumulated mask for a ship. Ships never seen have an empty mask.
    pub fn get(&self, ship: ShipId) -> EventMask {
        self.actions.get(&ship).copied().unwrap_or_default()
    }

    /// Whether any ship's mask shares a bit with `mask`.
    pub fn any_intersects(&self, mask: EventMask) -> bool {
        self.actions.values().any(|actions| actions.intersects(mask))
    }

    /// Drop a ship's entry.
    pub fn remove(&mut self, ship: ShipId) -> Option<EventMask> {
        self.actions.remove(&ship)
    }

    /// Keep only entries for ships that satisfy `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(ShipId) -> bool) {
        self.actions.retain(|ship, _| keep(*ship));
    }

    /// Number of ships with an entry.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over all ship masks.
    pub fn iter(&self) -> impl Iterator<Item = (&ShipId, &EventMask)> {
        self.actions.iter()
    }
}
