//! Galaxy registry - the read-only data that objectives are built against.

mod filter;
mod fleet;

pub use filter::*;
pub use fleet::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use thiserror::Error;

use crate::entities::{Ship, SystemId};
use crate::text::Conversation;

/// Errors raised while assembling galaxy data.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("unknown system: {0}")]
    UnknownSystem(SystemId),

    #[error("a system cannot link to itself: {0}")]
    SelfLink(SystemId),
}

/// A star system. Systems with an empty name are placeholders that have been
/// referenced but never defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub faction: Option<String>,
    #[serde(default)]
    pub attributes: BTreeSet<String>,
    /// Hyperspace links to neighbouring systems.
    #[serde(default)]
    pub links: Vec<SystemId>,
}

impl StarSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SystemId::new(),
            name: name.into(),
            faction: None,
            attributes: BTreeSet::new(),
            links: Vec::new(),
        }
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.insert(attribute.into());
        self
    }

    /// Whether the system has been fully defined.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains(attribute)
    }
}

/// A faction (government) that ships can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub name: String,
}

impl Faction {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Everything objectives look up by name: systems, factions, and the stock
/// ships, fleets, and conversations mission data may reference.
#[derive(Debug, Clone)]
pub struct Galaxy {
    systems: HashMap<SystemId, StarSystem>,
    system_names: HashMap<String, SystemId>,
    factions: HashMap<String, Faction>,
    player_faction: Faction,
    stock_ships: HashMap<String, Ship>,
    stock_fleets: HashMap<String, Fleet>,
    stock_conversations: HashMap<String, Conversation>,
}

impl Galaxy {
    /// Create an empty galaxy whose player belongs to `player_faction`.
    pub fn new(player_faction: impl Into<String>) -> Self {
        let player_faction = Faction::new(player_faction);
        let mut factions = HashMap::new();
        factions.insert(player_faction.name.clone(), player_faction.clone());
        Self {
            systems: HashMap::new(),
            system_names: HashMap::new(),
            factions,
            player_faction,
            stock_ships: HashMap::new(),
            stock_fleets: HashMap::new(),
            stock_conversations: HashMap::new(),
        }
    }

    /// Add a system. Returns its ID for reference.
    pub fn add_system(&mut self, system: StarSystem) -> SystemId {
        let id = system.id;
        if system.is_complete() {
            self.system_names.insert(system.name.clone(), id);
        }
        self.systems.insert(id, system);
        id
    }

    /// Connect two systems with a two-way hyperspace link.
    pub fn link(&mut self, a: SystemId, b: SystemId) -> Result<(), RulesError> {
        if a == b {
            return Err(RulesError::SelfLink(a));
        }
        for id in [a, b] {
            if !self.systems.contains_key(&id) {
                return Err(RulesError::UnknownSystem(id));
            }
        }
        for (from, to) in [(a, b), (b, a)] {
            if let Some(system) = self.systems.get_mut(&from) {
                if !system.links.contains(&to) {
                    system.links.push(to);
                }
            }
        }
        Ok(())
    }

    pub fn add_faction(&mut self, faction: Faction) {
        self.factions.insert(faction.name.clone(), faction);
    }

    /// Register a stock ship model under `name`.
    pub fn add_stock_ship(&mut self, name: impl Into<String>, ship: Ship) {
        self.stock_ships.insert(name.into(), ship);
    }

    pub fn add_stock_fleet(&mut self, name: impl Into<String>, fleet: Fleet) {
        self.stock_fleets.insert(name.into(), fleet);
    }

    pub fn add_stock_conversation(&mut self, name: impl Into<String>, conversation: Conversation) {
        self.stock_conversations.insert(name.into(), conversation);
    }

    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(&id)
    }

    pub fn system_by_name(&self, name: &str) -> Option<&StarSystem> {
        self.system_names.get(name).and_then(|id| self.systems.get(id))
    }

    /// All systems, ordered by name so iteration is stable across runs.
    pub fn systems(&self) -> Vec<&StarSystem> {
        let mut systems: Vec<_> = self.systems.values().collect();
        systems.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));
        systems
    }

    pub fn faction(&self, name: &str) -> Option<&Faction> {
        self.factions.get(name)
    }

    /// The faction the player's own ships belong to.
    pub fn player_faction(&self) -> &Faction {
        &self.player_faction
    }

    pub fn stock_ship(&self, name: &str) -> Option<&Ship> {
        self.stock_ships.get(name)
    }

    pub fn stock_fleet(&self, name: &str) -> Option<&Fleet> {
        self.stock_fleets.get(name)
    }

    pub fn stock_conversation(&self, name: &str) -> Option<&Conversation> {
        self.stock_conversations.get(name)
    }

    /// Number of jumps between two systems, or `None` if unreachable.
    pub fn jump_distance(&self, from: SystemId, to: SystemId) -> Option<u32> {
        if !self.systems.contains_key(&from) || !self.systems.contains_key(&to) {
            return None;
        }

        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, 0u32)]);
        while let Some((current, distance)) = queue.pop_front() {
            if current == to {
                return Some(distance);
            }
            let Some(system) = self.systems.get(&current) else {
                continue;
            };
            for next in &system.links {
                if visited.insert(*next) {
                    queue.push_back((*next, distance + 1));
                }
            }
        }
        None
    }
}
