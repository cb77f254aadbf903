//! Objective data files.
//!
//! Templates are authored in TOML:
//!
//! ```toml
//! conditions = ["save", "board"]
//! enter = "Sol"                 # or `remain` / `wait`, or a filter table
//! government = "Merchant"
//! dialog = ["You board <npc>.", "The crew surrenders."]
//!
//! [[ship]]
//! model = "Falcon"
//! name = "Kestrel"
//! actions = 4
//!
//! [[ship]]
//! stock = "Sparrow"
//! name = "Wren"
//!
//! [[fleet]]
//! stock = "Pirate Raid"
//! ```
//!
//! Instantiated records are written back with [`ObjectiveRecord::save`] and
//! restored with [`ObjectiveRecord::load`]. Fleets never appear in a saved
//! record; by then they are ordinary ships.

use galaxy_rules::{
    Conversation, EventKind, EventMask, Fleet, FleetVariant, Galaxy, LocationFilter, Ship,
    SystemId,
};
use serde::{Deserialize, Serialize};

use crate::error::MissionError;
use crate::objective::{
    ActorSource, ConversationSource, FleetSource, LocationSpec, ObjectiveRecord,
    ObjectiveTemplate, Progress,
};

/// Paragraph separator inside dialog text.
const PARAGRAPH_BREAK: &str = "\n\t";

/// A location entry: a system name or a filter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationEntry {
    System(String),
    Filter(LocationFilter),
}

/// A conversation entry: a stock name or an inline graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationEntry {
    Stock(String),
    Inline(Conversation),
}

/// A `[[ship]]` entry. `stock` names a stock ship; otherwise `model` builds
/// an inline ship, starting from the stock model of that name if one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShipEntry {
    #[serde(default)]
    pub stock: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub max_velocity: Option<f64>,
    /// Progress already made against this ship, as raw mask bits.
    #[serde(default)]
    pub actions: Option<u32>,
}

/// A `[[fleet]]` entry: `stock` names a stock fleet, otherwise the variants
/// define one inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FleetEntry {
    #[serde(default)]
    pub stock: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub variants: Vec<FleetVariant>,
}

/// The on-disk shape of an objective template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ObjectiveFile {
    /// Shorthand conditions: "save", "kill", "board", "disable",
    /// "scan cargo", "scan outfits".
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Raw succeed mask; replaces whatever the shorthands set.
    #[serde(default)]
    pub succeed: Option<u32>,
    /// Raw fail mask; replaces whatever the shorthands set.
    #[serde(default)]
    pub fail: Option<u32>,
    #[serde(default, alias = "remain", alias = "wait")]
    pub enter: Option<LocationEntry>,
    #[serde(default)]
    pub government: Option<String>,
    #[serde(default)]
    pub dialog: Vec<String>,
    #[serde(default)]
    pub conversation: Option<ConversationEntry>,
    #[serde(default)]
    pub ship: Vec<ShipEntry>,
    #[serde(default)]
    pub fleet: Vec<FleetEntry>,
}

/// Apply one shorthand condition to the succeed/fail masks.
fn apply_condition(
    condition: &str,
    succeed_if: &mut EventMask,
    fail_if: &mut EventMask,
) -> Result<(), MissionError> {
    match condition {
        "save" => *fail_if |= EventKind::Destroy,
        "kill" => *succeed_if |= EventKind::Destroy,
        "board" => *succeed_if |= EventKind::Board,
        "disable" => *succeed_if |= EventKind::Disable,
        "scan cargo" => *succeed_if |= EventKind::ScanCargo,
        "scan outfits" => *succeed_if |= EventKind::ScanOutfits,
        other => return Err(MissionError::UnknownCondition(other.to_string())),
    }
    Ok(())
}

impl ObjectiveFile {
    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, MissionError> {
        Ok(toml::from_str(text)?)
    }

    /// Resolve names against the galaxy and build a template.
    ///
    /// Names that cannot be resolved are dropped with a warning: an unknown
    /// system leaves the location unspecified, an unknown government leaves
    /// the faction unset, and ship or fleet entries with nothing to build
    /// from are skipped.
    pub fn resolve(&self, galaxy: &Galaxy) -> Result<ObjectiveTemplate, MissionError> {
        let mut template = ObjectiveTemplate::new();
        for condition in &self.conditions {
            apply_condition(condition, &mut template.succeed_if, &mut template.fail_if)?;
        }
        if let Some(bits) = self.succeed {
            template.succeed_if = EventMask::from_bits(bits);
        }
        if let Some(bits) = self.fail {
            template.fail_if = EventMask::from_bits(bits);
        }

        template.location = match &self.enter {
            Some(LocationEntry::System(name)) => match galaxy.system_by_name(name) {
                Some(system) => LocationSpec::System(system.id),
                None => {
                    tracing::warn!(system = %name, "Unknown system in objective location");
                    LocationSpec::Unspecified
                }
            },
            Some(LocationEntry::Filter(filter)) => LocationSpec::Filter(filter.clone()),
            None => LocationSpec::Unspecified,
        };

        if let Some(name) = &self.government {
            if galaxy.faction(name).is_some() {
                template.faction = Some(name.clone());
            } else {
                tracing::warn!(government = %name, "Unknown government in objective");
            }
        }

        if !self.dialog.is_empty() {
            template.dialog = Some(self.dialog.join(PARAGRAPH_BREAK));
        }

        template.conversation = match &self.conversation {
            Some(ConversationEntry::Stock(name)) => ConversationSource::Stock(name.clone()),
            Some(ConversationEntry::Inline(conversation)) => {
                ConversationSource::Inline(conversation.clone())
            }
            None => ConversationSource::None,
        };

        for entry in &self.ship {
            match resolve_ship(entry, galaxy) {
                Some(actor) => template.actors.push(actor),
                None => tracing::warn!(?entry, "Skipping ship entry with no model"),
            }
        }

        for entry in &self.fleet {
            if let Some(name) = &entry.stock {
                template.actors.push(ActorSource::Fleet(FleetSource::Stock(name.clone())));
            } else if !entry.variants.is_empty() {
                template.actors.push(ActorSource::Fleet(FleetSource::Inline(Fleet {
                    faction: entry.faction.clone(),
                    variants: entry.variants.clone(),
                })));
            } else {
                tracing::warn!("Skipping fleet entry with no variants");
            }
        }

        Ok(template)
    }
}

fn resolve_ship(entry: &ShipEntry, galaxy: &Galaxy) -> Option<ActorSource> {
    if let Some(model) = &entry.stock {
        return Some(ActorSource::Stock {
            model: model.clone(),
            name: entry.name.clone(),
        });
    }

    let model = entry.model.as_ref()?;
    let mut ship = match galaxy.stock_ship(model) {
        Some(stock) => stock.instantiate(),
        None => Ship::new(model.clone(), 0.0),
    };
    if let Some(max_velocity) = entry.max_velocity {
        ship.max_velocity = max_velocity.max(0.0);
    }
    if let Some(name) = &entry.name {
        ship.name = name.clone();
    }
    Some(ActorSource::Inline {
        ship,
        actions: EventMask::from_bits(entry.actions.unwrap_or(0)),
    })
}

impl ObjectiveTemplate {
    /// Parse and resolve a template in one step.
    pub fn load(text: &str, galaxy: &Galaxy) -> Result<Self, MissionError> {
        ObjectiveFile::parse(text)?.resolve(galaxy)
    }
}

fn is_empty_mask(mask: &EventMask) -> bool {
    mask.is_empty()
}

/// A ship as written in a saved record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedShip {
    #[serde(flatten)]
    ship: Ship,
    #[serde(default, skip_serializing_if = "is_empty_mask")]
    actions: EventMask,
}

/// The on-disk shape of an instantiated record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SavedObjective {
    #[serde(default, skip_serializing_if = "is_empty_mask")]
    succeed: EventMask,
    #[serde(default, skip_serializing_if = "is_empty_mask")]
    fail: EventMask,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    government: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system: Option<SystemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dialog: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conversation: Option<Conversation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ship: Vec<SavedShip>,
}

impl ObjectiveRecord {
    /// Write this record as TOML, including each ship's progress.
    pub fn save(&self) -> Result<String, MissionError> {
        let saved = SavedObjective {
            succeed: self.succeed_if,
            fail: self.fail_if,
            government: self.faction.clone(),
            system: self.system,
            dialog: self
                .dialog
                .as_deref()
                .map(|text| text.split(PARAGRAPH_BREAK).map(str::to_string).collect())
                .unwrap_or_default(),
            conversation: (!self.conversation.is_empty()).then(|| self.conversation.clone()),
            ship: self
                .ships
                .iter()
                .map(|ship| SavedShip {
                    ship: ship.clone(),
                    actions: self.progress.get(ship.id),
                })
                .collect(),
        };
        Ok(toml::to_string(&saved)?)
    }

    /// Restore a record written by [`ObjectiveRecord::save`].
    pub fn load(text: &str) -> Result<Self, MissionError> {
        let saved: SavedObjective = toml::from_str(text)?;

        let mut progress = Progress::new();
        let mut ships = Vec::with_capacity(saved.ship.len());
        for entry in saved.ship {
            progress.set(entry.ship.id, entry.actions);
            ships.push(entry.ship);
        }

        Ok(ObjectiveRecord {
            succeed_if: saved.succeed,
            fail_if: saved.fail,
            faction: saved.government,
            system: saved.system,
            dialog: (!saved.dialog.is_empty()).then(|| saved.dialog.join(PARAGRAPH_BREAK)),
            conversation: saved.conversation.unwrap_or_default(),
            ships,
            progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instantiator::Instantiator;
    use galaxy_rules::{ConversationNode, StarSystem, Substitutions};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn galaxy() -> Galaxy {
        let mut galaxy = Galaxy::new("Escort");
        galaxy.add_system(StarSystem::new("Sol"));
        galaxy.add_system(StarSystem::new("Vega").with_attribute("mining"));
        galaxy.add_faction(galaxy_rules::Faction::new("Merchant"));
        galaxy.add_stock_ship("Falcon", Ship::new("Falcon", 3.0));
        galaxy.add_stock_ship("Sparrow", Ship::new("Sparrow", 6.0));
        galaxy.add_stock_fleet(
            "Pirate Raid",
            Fleet::new().with_variant(FleetVariant::new(["Sparrow"])),
        );
        galaxy
    }

    const TEMPLATE: &str = r#"
conditions = ["save", "board"]
enter = "Sol"
government = "Merchant"
dialog = ["You board <npc>.", "The crew surrenders."]
conversation = "Thanks"

[[ship]]
model = "Falcon"
name = "Kestrel"
actions = 4

[[ship]]
stock = "Sparrow"
name = "Wren"

[[ship]]
name = "Nameless"

[[fleet]]
stock = "Pirate Raid"

[[fleet]]
faction = "Pirate"
[[fleet.variants]]
ships = ["Falcon", "Falcon"]
weight = 2
"#;

    #[test]
    fn test_load_template() {
        let galaxy = galaxy();
        let template = ObjectiveTemplate::load(TEMPLATE, &galaxy).unwrap();

        assert_eq!(template.succeed_if, EventKind::Board.into());
        assert_eq!(template.fail_if, EventKind::Destroy.into());
        assert_eq!(
            template.location,
            LocationSpec::System(galaxy.system_by_name("Sol").unwrap().id)
        );
        assert_eq!(template.faction.as_deref(), Some("Merchant"));
        assert_eq!(
            template.dialog.as_deref(),
            Some("You board <npc>.\n\tThe crew surrenders.")
        );
        assert_eq!(template.conversation, ConversationSource::Stock("Thanks".into()));

        // The entry with neither model nor stock is skipped.
        assert_eq!(template.actors.len(), 4);
        match &template.actors[0] {
            ActorSource::Inline { ship, actions } => {
                assert_eq!(ship.name, "Kestrel");
                assert_eq!(ship.max_velocity, 3.0);
                assert_eq!(*actions, EventKind::Disable.into());
            }
            other => panic!("unexpected actor: {:?}", other),
        }
        assert_eq!(
            template.actors[1],
            ActorSource::Stock {
                model: "Sparrow".into(),
                name: Some("Wren".into())
            }
        );
        assert_eq!(
            template.actors[2],
            ActorSource::Fleet(FleetSource::Stock("Pirate Raid".into()))
        );
        match &template.actors[3] {
            ActorSource::Fleet(FleetSource::Inline(fleet)) => {
                assert_eq!(fleet.faction.as_deref(), Some("Pirate"));
                assert_eq!(fleet.variants[0].weight, 2);
            }
            other => panic!("unexpected actor: {:?}", other),
        }
    }

    #[test]
    fn test_all_shorthands() {
        let galaxy = galaxy();
        let text = r#"conditions = ["kill", "board", "disable", "scan cargo", "scan outfits"]"#;
        let template = ObjectiveTemplate::load(text, &galaxy).unwrap();
        assert_eq!(template.succeed_if.bits(), 31);
        assert!(template.fail_if.is_empty());
    }

    #[test]
    fn test_raw_masks_replace_shorthands() {
        let galaxy = galaxy();
        let text = r#"
conditions = ["board", "save"]
succeed = 12
fail = 0
"#;
        let template = ObjectiveTemplate::load(text, &galaxy).unwrap();
        assert_eq!(template.succeed_if.bits(), 12);
        assert!(template.fail_if.is_empty());
    }

    #[test]
    fn test_unknown_condition() {
        let galaxy = galaxy();
        let result = ObjectiveTemplate::load(r#"conditions = ["befriend"]"#, &galaxy);
        assert!(matches!(result, Err(MissionError::UnknownCondition(c)) if c == "befriend"));
    }

    #[test]
    fn test_malformed_toml() {
        let galaxy = galaxy();
        let result = ObjectiveTemplate::load("conditions = [", &galaxy);
        assert!(matches!(result, Err(MissionError::Parse(_))));
    }

    #[test]
    fn test_location_keywords() {
        let galaxy = galaxy();
        let vega = galaxy.system_by_name("Vega").unwrap().id;

        for keyword in ["enter", "remain", "wait"] {
            let text = format!("{} = \"Vega\"", keyword);
            let template = ObjectiveTemplate::load(&text, &galaxy).unwrap();
            assert_eq!(template.location, LocationSpec::System(vega));
        }

        let text = r#"
[wait]
attributes = ["mining"]
distance = { min = 1, max = 3 }
"#;
        let template = ObjectiveTemplate::load(text, &galaxy).unwrap();
        match template.location {
            LocationSpec::Filter(filter) => {
                assert_eq!(filter.attributes, vec!["mining".to_string()]);
                assert_eq!(filter.distance.map(|d| (d.min, d.max)), Some((1, 3)));
            }
            other => panic!("unexpected location: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_names_degrade() {
        let galaxy = galaxy();
        let text = r#"
enter = "Atlantis"
government = "Nobody"
"#;
        let template = ObjectiveTemplate::load(text, &galaxy).unwrap();
        assert_eq!(template.location, LocationSpec::Unspecified);
        assert!(template.faction.is_none());
    }

    #[test]
    fn test_inline_conversation() {
        let galaxy = galaxy();
        let text = r#"
[[conversation.nodes]]
paragraphs = ["Hello, <npc>."]
[[conversation.nodes.choices]]
text = "Goodbye."
"#;
        let template = ObjectiveTemplate::load(text, &galaxy).unwrap();
        match template.conversation {
            ConversationSource::Inline(conversation) => {
                assert_eq!(conversation.nodes[0].paragraphs[0], "Hello, <npc>.");
                assert_eq!(conversation.nodes[0].choices[0].next, None);
            }
            other => panic!("unexpected conversation: {:?}", other),
        }
    }

    #[test]
    fn test_save_and_load_record() {
        let galaxy = galaxy();
        let mut template = ObjectiveTemplate::load(TEMPLATE, &galaxy).unwrap();
        let mut conversation = Conversation::new();
        conversation.add_node(ConversationNode::new("Thanks, <npc>.").with_choice("Sure.", None));
        template.conversation = ConversationSource::Inline(conversation);

        let mut rng = StdRng::seed_from_u64(42);
        let mut record = Instantiator::with_defaults()
            .instantiate(&template, &Substitutions::new(), None, &galaxy, &mut rng)
            .record;
        let first = record.ships()[0].id;
        record.record_event(first, EventKind::Board);

        let text = record.save().unwrap();
        assert!(!text.contains("fleet"));

        let restored = ObjectiveRecord::load(&text).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.actions(first).bits(), 4 | 2);
        assert_eq!(restored.dialog(), Some("You board Kestrel.\n\tThe crew surrenders."));
        assert_eq!(restored.status(), record.status());
    }

    #[test]
    fn test_instantiate_fleet_with_maximum_weights() {
        let galaxy = galaxy();
        let text = r#"
[[fleet]]
[[fleet.variants]]
ships = ["Falcon"]
weight = 4294967295
[[fleet.variants]]
ships = ["Sparrow"]
weight = 1
"#;
        let template = ObjectiveTemplate::load(text, &galaxy).unwrap();

        let mut rng = StdRng::seed_from_u64(21);
        let record = Instantiator::with_defaults()
            .instantiate(&template, &Substitutions::new(), None, &galaxy, &mut rng)
            .record;
        assert_eq!(record.ships().len(), 1);
    }

    #[test]
    fn test_save_empty_record() {
        let record = ObjectiveRecord::new(EventMask::EMPTY, EventMask::EMPTY);
        let text = record.save().unwrap();
        let restored = ObjectiveRecord::load(&text).unwrap();
        assert_eq!(restored, record);
        assert!(restored.ships().is_empty());
    }
}
