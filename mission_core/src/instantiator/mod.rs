//! Instantiator - turns an objective template into a live record.
//!
//! Instantiation runs once per mission activation:
//! 1. **Conditions**: Copy the succeed/fail masks
//! 2. **Faction**: Use the template's, or the player's
//! 3. **Location**: Concrete system, else a random filter match, else the origin
//! 4. **Ships**: Copy inline ships and build stock ones
//! 5. **Placement**: Scatter those ships around the system center
//! 6. **Fleets**: Let each fleet place its own ships
//! 7. **Ownership**: Hand every ship to the faction and protect it
//! 8. **Text**: Fill in `<npc>` and the caller's substitutions

use galaxy_rules::{
    replace, Angle, Galaxy, Ship, Substitutions, SystemId, NPC_KEY,
};
use rand::{Rng, RngCore};

use crate::objective::{
    ActorSource, ConversationSource, FleetSource, LocationSpec, ObjectiveRecord,
    ObjectiveTemplate, Progress,
};

/// Radius of the disk individual ships are placed in.
pub const DEFAULT_PLACEMENT_RADIUS: f64 = 400.0;

/// Configuration for placing freshly created ships.
#[derive(Debug, Clone)]
pub struct PlacementConfig {
    /// Maximum distance from the system center.
    pub radius: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_PLACEMENT_RADIUS,
        }
    }
}

/// Result of instantiating a template.
#[derive(Debug, Clone)]
pub struct Instantiated {
    pub record: ObjectiveRecord,
    /// Display name of the first ship, bound to `<npc>` in the record's text.
    pub npc_name: Option<String>,
}

impl Instantiated {
    /// Bind `<npc>` in the caller's table so later mission text can use it.
    pub fn merge_into(&self, subs: &mut Substitutions) {
        if let Some(name) = &self.npc_name {
            subs.insert(NPC_KEY.to_string(), name.clone());
        }
    }
}

/// Builds objective records from templates.
pub struct Instantiator {
    config: PlacementConfig,
}

impl Instantiator {
    /// Create an instantiator with the given configuration.
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Create an instantiator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacementConfig::default())
    }

    /// Create a live record from `template`.
    ///
    /// `subs` is read, never written; the `<npc>` binding comes back in
    /// [`Instantiated::npc_name`]. All randomness is drawn from `rng`, so a
    /// seeded source gives a reproducible result.
    pub fn instantiate(
        &self,
        template: &ObjectiveTemplate,
        subs: &Substitutions,
        origin: Option<SystemId>,
        galaxy: &Galaxy,
        rng: &mut dyn RngCore,
    ) -> Instantiated {
        let faction = template
            .faction
            .clone()
            .unwrap_or_else(|| galaxy.player_faction().name.clone());
        let system = self.resolve_system(&template.location, origin, galaxy, rng);

        let mut ships = Vec::new();
        let mut progress = Progress::new();

        for actor in &template.actors {
            if let ActorSource::Inline { ship, actions } = actor {
                let copy = ship.instantiate();
                progress.merge(copy.id, *actions);
                ships.push(copy);
            }
        }
        for actor in &template.actors {
            if let ActorSource::Stock { model, name } = actor {
                let Some(stock) = galaxy.stock_ship(model) else {
                    tracing::warn!(model = %model, "Skipping unknown stock ship");
                    continue;
                };
                let mut ship = stock.instantiate();
                ship.name = name.clone().unwrap_or_else(|| model.clone());
                ships.push(ship);
            }
        }

        for ship in &mut ships {
            self.place(ship, system, rng);
        }

        for actor in &template.actors {
            if let ActorSource::Fleet(FleetSource::Inline(fleet)) = actor {
                fleet.place(system, galaxy, &mut ships, rng);
            }
        }
        for actor in &template.actors {
            if let ActorSource::Fleet(FleetSource::Stock(name)) = actor {
                match galaxy.stock_fleet(name) {
                    Some(fleet) => {
                        fleet.place(system, galaxy, &mut ships, rng);
                    }
                    None => tracing::warn!(fleet = %name, "Skipping unknown stock fleet"),
                }
            }
        }

        for ship in &mut ships {
            ship.set_faction(faction.clone());
            ship.set_special();
        }

        let npc_name = ships.first().map(|ship| ship.name.clone());
        let mut local_subs = subs.clone();
        if let Some(name) = &npc_name {
            local_subs.insert(NPC_KEY.to_string(), name.clone());
        }

        let dialog = template
            .dialog
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(|text| replace(text, &local_subs));

        let conversation = match &template.conversation {
            ConversationSource::Stock(name) => match galaxy.stock_conversation(name) {
                Some(conversation) => conversation.substitute(&local_subs),
                None => {
                    tracing::warn!(conversation = %name, "Skipping unknown stock conversation");
                    Default::default()
                }
            },
            ConversationSource::Inline(conversation) => conversation.substitute(&local_subs),
            ConversationSource::None => Default::default(),
        };

        tracing::debug!(
            system = ?system,
            faction = %faction,
            ships = ships.len(),
            "Instantiated objective"
        );

        Instantiated {
            record: ObjectiveRecord {
                succeed_if: template.succeed_if,
                fail_if: template.fail_if,
                faction: Some(faction),
                system,
                dialog,
                conversation,
                ships,
                progress,
            },
            npc_name,
        }
    }

    /// Pick the system the objective takes place in.
    fn resolve_system(
        &self,
        location: &LocationSpec,
        origin: Option<SystemId>,
        galaxy: &Galaxy,
        rng: &mut dyn RngCore,
    ) -> Option<SystemId> {
        match location {
            LocationSpec::System(id) => Some(*id),
            LocationSpec::Filter(filter) if !filter.is_empty() => {
                let origin_system = origin.and_then(|id| galaxy.system(id));
                let options: Vec<SystemId> = galaxy
                    .systems()
                    .into_iter()
                    .filter(|system| system.is_complete())
                    .filter(|system| filter.matches(system, origin_system, galaxy))
                    .map(|system| system.id)
                    .collect();

                if options.is_empty() {
                    tracing::debug!("No system matches the location filter; using origin");
                    origin
                } else {
                    Some(options[rng.gen_range(0..options.len())])
                }
            }
            _ => origin,
        }
    }

    /// Drop a ship at a random point within the placement radius, heading a
    /// random way at a random fraction of its top speed.
    fn place(&self, ship: &mut Ship, system: Option<SystemId>, rng: &mut dyn RngCore) {
        let facing = Angle::random(rng);
        let position = Angle::random(rng).unit() * (rng.gen::<f64>() * self.config.radius);
        let speed = rng.gen::<f64>() * ship.max_velocity;

        ship.system = system;
        ship.place(position, facing.unit() * speed, facing);
    }
}
