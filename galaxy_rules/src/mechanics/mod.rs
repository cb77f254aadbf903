//! Game mechanics: the interactions a ship can undergo and masks over them.

use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::entities::ShipId;

/// Discrete interactions the simulation reports against a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Destroy,
    Board,
    Disable,
    ScanCargo,
    ScanOutfits,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Destroy,
        EventKind::Board,
        EventKind::Disable,
        EventKind::ScanCargo,
        EventKind::ScanOutfits,
    ];

    /// The bit this kind occupies in an [`EventMask`].
    pub fn bit(self) -> u32 {
        match self {
            EventKind::Destroy => 1 << 0,
            EventKind::Board => 1 << 1,
            EventKind::Disable => 1 << 2,
            EventKind::ScanCargo => 1 << 3,
            EventKind::ScanOutfits => 1 << 4,
        }
    }
}

/// A set of [`EventKind`]s stored as bits.
///
/// Serializes as the raw integer so saved masks stay readable by older data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventMask(u32);

impl EventMask {
    pub const EMPTY: EventMask = EventMask(0);

    /// Build a mask from raw bits. Unknown bits are kept as-is.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, kind: EventKind) {
        self.0 |= kind.bit();
    }

    pub fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// True if every bit of `other` is also set here.
    pub fn contains_all(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if at least one bit is shared with `other`.
    pub fn intersects(self, other: EventMask) -> bool {
        self.0 & other.0 != 0
    }

    /// The kinds present in this mask.
    pub fn kinds(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl From<EventKind> for EventMask {
    fn from(kind: EventKind) -> Self {
        EventMask(kind.bit())
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl BitOr<EventKind> for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventKind) -> EventMask {
        EventMask(self.0 | rhs.bit())
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: EventMask) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<EventKind> for EventMask {
    fn bitor_assign(&mut self, rhs: EventKind) {
        self.0 |= rhs.bit();
    }
}

impl BitAnd for EventMask {
    type Output = EventMask;

    fn bitand(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 & rhs.0)
    }
}

/// An interaction reported by the simulation. Only the target and the kind
/// matter to objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipEvent {
    pub target: ShipId,
    pub kind: EventKind,
}

impl ShipEvent {
    pub fn new(target: ShipId, kind: EventKind) -> Self {
        Self { target, kind }
    }
}
