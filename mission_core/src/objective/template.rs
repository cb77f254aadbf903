//! Objective templates - the declarative form an objective takes before a
//! mission starts.

use galaxy_rules::{Conversation, EventKind, EventMask, Fleet, LocationFilter, Ship, SystemId};
use serde::{Deserialize, Serialize};

/// Where the objective's ships should appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum LocationSpec {
    /// Use the mission's origin system.
    #[default]
    Unspecified,
    /// A specific system.
    System(SystemId),
    /// Any system matching the filter, measured from the origin.
    Filter(LocationFilter),
}

/// The dialog graph to show when the objective succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum ConversationSource {
    #[default]
    None,
    /// Name of a stock conversation in the galaxy registry.
    Stock(String),
    Inline(Conversation),
}

/// A fleet request, resolved into ships when the objective is instantiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FleetSource {
    Inline(Fleet),
    /// Name of a stock fleet in the galaxy registry.
    Stock(String),
}

/// Where an objective's ships come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorSource {
    /// A fully specified ship. `actions` carries progress made before the
    /// objective was saved.
    Inline { ship: Ship, actions: EventMask },

    /// A stock ship model, optionally renamed.
    Stock { model: String, name: Option<String> },

    Fleet(FleetSource),
}

/// A template objective. Instantiating it never modifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ObjectiveTemplate {
    pub succeed_if: EventMask,
    pub fail_if: EventMask,
    /// Owning faction; the player's faction if unset.
    pub faction: Option<String>,
    pub location: LocationSpec,
    pub dialog: Option<String>,
    pub conversation: ConversationSource,
    pub actors: Vec<ActorSource>,
}

impl ObjectiveTemplate {
    /// Create an empty template with no conditions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every ship to undergo `kind`.
    pub fn succeed_on(mut self, kind: EventKind) -> Self {
        self.succeed_if |= kind;
        self
    }

    /// Fail if any ship undergoes `kind`.
    pub fn fail_on(mut self, kind: EventKind) -> Self {
        self.fail_if |= kind;
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_location(mut self, location: LocationSpec) -> Self {
        self.location = location;
        self
    }

    pub fn with_dialog(mut self, dialog: impl Into<String>) -> Self {
        self.dialog = Some(dialog.into());
        self
    }

    pub fn with_conversation(mut self, conversation: ConversationSource) -> Self {
        self.conversation = conversation;
        self
    }

    /// Add an inline ship with no prior progress.
    pub fn with_ship(self, ship: Ship) -> Self {
        self.with_actor(ActorSource::Inline {
            ship,
            actions: EventMask::EMPTY,
        })
    }

    /// Add a stock ship, optionally renamed.
    pub fn with_stock_ship(self, model: impl Into<String>, name: Option<String>) -> Self {
        self.with_actor(ActorSource::Stock {
            model: model.into(),
            name,
        })
    }

    pub fn with_fleet(self, fleet: FleetSource) -> Self {
        self.with_actor(ActorSource::Fleet(fleet))
    }

    pub fn with_actor(mut self, actor: ActorSource) -> Self {
        self.actors.push(actor);
        self
    }
}
