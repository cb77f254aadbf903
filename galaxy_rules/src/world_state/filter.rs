//! Declarative system filters used to pick where mission ships appear.

use serde::{Deserialize, Serialize};

use super::{Galaxy, StarSystem};

/// An inclusive range of hyperspace jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpRange {
    #[serde(default)]
    pub min: u32,
    pub max: u32,
}

impl JumpRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, jumps: u32) -> bool {
        (self.min..=self.max).contains(&jumps)
    }
}

/// Jump range measured from a named system instead of the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearFilter {
    pub system: String,
    #[serde(flatten)]
    pub range: JumpRange,
}

/// A predicate over systems. Every constraint that is set must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocationFilter {
    /// Allowed system names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub systems: Vec<String>,
    /// Allowed owning factions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factions: Vec<String>,
    /// Attributes the system must all have.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near: Option<NearFilter>,
    /// Jumps from the origin system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<JumpRange>,
}

impl LocationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the filter places no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
            && self.factions.is_empty()
            && self.attributes.is_empty()
            && self.near.is_none()
            && self.distance.is_none()
    }

    /// Check `candidate` against this filter, measuring relative distances
    /// from `origin`. Distance constraints fail when there is no origin or no
    /// route.
    pub fn matches(
        &self,
        candidate: &StarSystem,
        origin: Option<&StarSystem>,
        galaxy: &Galaxy,
    ) -> bool {
        if !self.systems.is_empty() && !self.systems.iter().any(|s| *s == candidate.name) {
            return false;
        }

        if !self.factions.is_empty() {
            match &candidate.faction {
                Some(faction) if self.factions.contains(faction) => {}
                _ => return false,
            }
        }

        if !self.attributes.iter().all(|a| candidate.has_attribute(a)) {
            return false;
        }

        if let Some(near) = &self.near {
            let reachable = galaxy
                .system_by_name(&near.system)
                .and_then(|center| galaxy.jump_distance(center.id, candidate.id))
                .is_some_and(|jumps| near.range.contains(jumps));
            if !reachable {
                return false;
            }
        }

        if let Some(range) = &self.distance {
            let reachable = origin
                .and_then(|origin| galaxy.jump_distance(origin.id, candidate.id))
                .is_some_and(|jumps| range.contains(jumps));
            if !reachable {
                return false;
            }
        }

        true
    }
}
