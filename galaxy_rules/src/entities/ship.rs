//! Ship definitions.

use serde::{Deserialize, Serialize};

use super::{Angle, Point, ShipId, SystemId};

/// A single ship: the actor an objective tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub name: String,
    /// Name of the stock model this ship was built from.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemId>,

    pub position: Point,
    pub velocity: Point,
    pub facing: Angle,
    pub max_velocity: f64,

    /// Mission-relevant ships are exempt from generic despawning.
    #[serde(default)]
    pub is_special: bool,
}

impl Ship {
    /// Create a new, unplaced ship of the given model.
    pub fn new(model: impl Into<String>, max_velocity: f64) -> Self {
        let model = model.into();
        Self {
            id: ShipId::new(),
            name: model.clone(),
            model,
            faction: None,
            system: None,
            position: Point::default(),
            velocity: Point::default(),
            facing: Angle::default(),
            max_velocity: max_velocity.max(0.0),
            is_special: false,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make an independent copy of this ship with its own identity.
    pub fn instantiate(&self) -> Ship {
        Ship {
            id: ShipId::new(),
            ..self.clone()
        }
    }

    /// Put the ship at a position with the given velocity and heading.
    pub fn place(&mut self, position: Point, velocity: Point, facing: Angle) {
        self.position = position;
        self.velocity = velocity;
        self.facing = facing;
    }

    pub fn set_system(&mut self, system: SystemId) {
        self.system = Some(system);
    }

    pub fn set_faction(&mut self, faction: impl Into<String>) {
        self.faction = Some(faction.into());
    }

    pub fn set_special(&mut self) {
        self.is_special = true;
    }

    /// Current speed along the velocity vector.
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}
