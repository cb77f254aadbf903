//! Fleets - weighted groups of stock ships that spawn together.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::Galaxy;
use crate::entities::{Angle, Ship, SystemId};

/// How far from the system center a fleet's formation may be anchored.
pub const FLEET_SPAWN_RADIUS: f64 = 800.0;

/// How far each ship may stray from the formation anchor.
pub const FORMATION_SPREAD: f64 = 100.0;

fn default_weight() -> u32 {
    1
}

/// One possible composition of a fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetVariant {
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Stock ship model names.
    pub ships: Vec<String>,
    /// Display names, matched to `ships` by position. Missing entries keep
    /// the model name.
    #[serde(default)]
    pub names: Vec<String>,
}

impl FleetVariant {
    pub fn new(ships: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            weight: 1,
            ships: ships.into_iter().map(Into::into).collect(),
            names: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

/// A fleet definition. Placing it picks one variant and spawns its ships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Fleet {
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub variants: Vec<FleetVariant>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variant(mut self, variant: FleetVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Weighted random variant, or `None` if nothing can be chosen.
    fn choose_variant(&self, rng: &mut dyn RngCore) -> Option<&FleetVariant> {
        // Weights are summed in u64 so authored u32 weights cannot overflow.
        let weights = self.variants.iter().map(|v| u64::from(v.weight));
        let index = WeightedIndex::new(weights).ok()?;
        self.variants.get(index.sample(rng))
    }

    /// Spawn one variant of this fleet into `system`, appending the new ships
    /// to `ships`. Returns how many ships were added.
    pub fn place(
        &self,
        system: Option<SystemId>,
        galaxy: &Galaxy,
        ships: &mut Vec<Ship>,
        rng: &mut dyn RngCore,
    ) -> usize {
        let Some(variant) = self.choose_variant(rng) else {
            return 0;
        };

        let anchor = Angle::random(rng).unit() * (rng.gen::<f64>() * FLEET_SPAWN_RADIUS);
        let facing = Angle::random(rng);
        let before = ships.len();

        for (i, model) in variant.ships.iter().enumerate() {
            let Some(stock) = galaxy.stock_ship(model) else {
                tracing::warn!(model = %model, "Skipping unknown ship model in fleet");
                continue;
            };

            let mut ship = stock.instantiate();
            if let Some(name) = variant.names.get(i) {
                ship.name = name.clone();
            }
            if let Some(faction) = &self.faction {
                ship.set_faction(faction.clone());
            }
            ship.system = system;

            let offset = Angle::random(rng).unit() * (rng.gen::<f64>() * FORMATION_SPREAD);
            let speed = rng.gen::<f64>() * ship.max_velocity;
            ship.place(anchor + offset, facing.unit() * speed, facing);
            ships.push(ship);
        }

        let added = ships.len() - before;
        tracing::debug!(ships = added, "Placed fleet");
        added
    }
}
