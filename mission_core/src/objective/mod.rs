//! Objective records and their success/failure evaluation.
//!
//! A record is what an [`ObjectiveTemplate`] becomes once a mission starts:
//! concrete ships in a concrete system, plus the interactions observed so
//! far for each ship. Evaluation follows three rules:
//!
//! - **Fail dominates**: once any ship's mask intersects the fail condition
//!   the objective has failed, whatever else happened.
//! - **Every ship counts**: success needs each tracked ship to have seen
//!   every interaction in the succeed condition.
//! - **No condition, no wait**: an empty succeed condition is satisfied as
//!   long as the objective has not failed.

mod progress;
mod template;

pub use progress::*;
pub use template::*;

use galaxy_rules::{Conversation, EventKind, EventMask, Ship, ShipEvent, ShipId, SystemId};
use serde::{Deserialize, Serialize};

use crate::events::ObjectiveNotice;

/// Where an objective stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObjectiveStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

/// A live objective: concrete ships and the progress made against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ObjectiveRecord {
    pub(crate) succeed_if: EventMask,
    pub(crate) fail_if: EventMask,
    pub(crate) faction: Option<String>,
    pub(crate) system: Option<SystemId>,
    pub(crate) dialog: Option<String>,
    pub(crate) conversation: Conversation,
    pub(crate) ships: Vec<Ship>,
    pub(crate) progress: Progress,
}

impl ObjectiveRecord {
    /// Create a record with the given conditions and no ships.
    pub fn new(succeed_if: EventMask, fail_if: EventMask) -> Self {
        Self {
            succeed_if,
            fail_if,
            ..Default::default()
        }
    }

    pub fn succeed_if(&self) -> EventMask {
        self.succeed_if
    }

    pub fn fail_if(&self) -> EventMask {
        self.fail_if
    }

    pub fn faction(&self) -> Option<&str> {
        self.faction.as_deref()
    }

    pub fn system(&self) -> Option<SystemId> {
        self.system
    }

    pub fn dialog(&self) -> Option<&str> {
        self.dialog.as_deref()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The ships this objective tracks.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|ship| ship.id == id)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|ship| ship.id == id)
    }

    pub fn is_tracking(&self, id: ShipId) -> bool {
        self.ship(id).is_some()
    }

    /// Accumulated interactions for one ship.
    pub fn actions(&self, id: ShipId) -> EventMask {
        self.progress.get(id)
    }

    /// Start tracking a ship, optionally with progress already made.
    pub fn add_ship(&mut self, ship: Ship, actions: EventMask) {
        self.progress.merge(ship.id, actions);
        self.ships.push(ship);
    }

    /// Stop tracking a ship. Its progress goes with it.
    pub fn remove_ship(&mut self, id: ShipId) -> Option<Ship> {
        let index = self.ships.iter().position(|ship| ship.id == id)?;
        self.progress.remove(id);
        Some(self.ships.remove(index))
    }

    /// Keep only the ships that satisfy `keep`, dropping the progress of
    /// every ship let go. Returns how many ships were removed.
    pub fn retain_ships(&mut self, mut keep: impl FnMut(&Ship) -> bool) -> usize {
        let before = self.ships.len();
        self.ships.retain(|ship| keep(ship));

        let ships = &self.ships;
        self.progress.retain(|id| ships.iter().any(|ship| ship.id == id));
        before - self.ships.len()
    }

    /// Record that `kind` happened to `ship`. Events for ships this record
    /// does not track are ignored.
    pub fn record_event(&mut self, ship: ShipId, kind: EventKind) {
        if !self.is_tracking(ship) {
            tracing::debug!(ship = %ship, ?kind, "Ignoring event for untracked ship");
            return;
        }
        self.progress.record(ship, kind);
    }

    /// True once any tracked ship has undergone a fail interaction.
    pub fn has_failed(&self) -> bool {
        self.progress.any_intersects(self.fail_if)
    }

    /// True if not failed and every tracked ship has undergone every succeed
    /// interaction. With no ships this holds vacuously.
    pub fn has_succeeded(&self) -> bool {
        if self.has_failed() {
            return false;
        }
        if self.succeed_if.is_empty() {
            return true;
        }
        self.ships
            .iter()
            .all(|ship| self.progress.get(ship.id).contains_all(self.succeed_if))
    }

    pub fn status(&self) -> ObjectiveStatus {
        if self.has_failed() {
            ObjectiveStatus::Failed
        } else if self.has_succeeded() {
            ObjectiveStatus::Succeeded
        } else {
            ObjectiveStatus::Pending
        }
    }

    /// Apply an event and report what the player should be shown, if this
    /// event is the one that tipped the objective into failure or success.
    pub fn handle(&mut self, event: &ShipEvent) -> Option<ObjectiveNotice> {
        let had_succeeded = self.has_succeeded();
        let had_failed = self.has_failed();

        self.record_event(event.target, event.kind);

        if self.has_failed() && !had_failed {
            tracing::debug!(ship = %event.target, kind = ?event.kind, "Objective failed");
            return Some(ObjectiveNotice::Failed);
        }
        if self.has_succeeded() && !had_succeeded {
            tracing::debug!(ship = %event.target, kind = ?event.kind, "Objective succeeded");
            return Some(self.success_notice());
        }
        None
    }

    fn success_notice(&self) -> ObjectiveNotice {
        if !self.conversation.is_empty() {
            return ObjectiveNotice::Conversation(self.conversation.clone());
        }
        match &self.dialog {
            Some(text) if !text.is_empty() => ObjectiveNotice::Dialog(text.clone()),
            _ => ObjectiveNotice::Succeeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_rules::ConversationNode;

    fn record_with(succeed: EventMask, fail: EventMask, count: usize) -> (ObjectiveRecord, Vec<ShipId>) {
        let mut record = ObjectiveRecord::new(succeed, fail);
        let ids = (0..count)
            .map(|i| {
                let ship = Ship::new("Sparrow", 5.0).with_name(format!("Ship {}", i));
                let id = ship.id;
                record.add_ship(ship, EventMask::EMPTY);
                id
            })
            .collect();
        (record, ids)
    }

    #[test]
    fn test_board_succeeds() {
        let (mut record, ids) = record_with(EventKind::Board.into(), EventMask::EMPTY, 1);
        assert!(!record.has_succeeded());

        record.record_event(ids[0], EventKind::Board);
        assert!(record.has_succeeded());
        assert!(!record.has_failed());
        assert_eq!(record.status(), ObjectiveStatus::Succeeded);
    }

    #[test]
    fn test_fail_dominates() {
        let (mut record, ids) =
            record_with(EventKind::Disable.into(), EventKind::Destroy.into(), 1);

        record.record_event(ids[0], EventKind::Disable);
        assert!(record.has_succeeded());

        record.record_event(ids[0], EventKind::Destroy);
        assert!(record.has_failed());
        assert!(!record.has_succeeded());
        assert_eq!(record.status(), ObjectiveStatus::Failed);

        // Nothing afterward undoes the failure.
        record.record_event(ids[0], EventKind::Board);
        assert!(record.has_failed());
        assert!(!record.has_succeeded());
    }

    #[test]
    fn test_fail_on_any_ship() {
        let (mut record, ids) =
            record_with(EventKind::Board.into(), EventKind::Destroy.into(), 2);
        record.record_event(ids[0], EventKind::Board);
        record.record_event(ids[1], EventKind::Board);
        assert!(record.has_succeeded());

        record.record_event(ids[1], EventKind::Destroy);
        assert!(!record.has_succeeded());
        assert!(record.has_failed());
    }

    #[test]
    fn test_empty_succeed_condition() {
        let (record, _) = record_with(EventMask::EMPTY, EventKind::Destroy.into(), 2);
        assert!(record.has_succeeded());
        assert_eq!(record.status(), ObjectiveStatus::Succeeded);
    }

    #[test]
    fn test_no_ships_is_vacuous_success() {
        let record = ObjectiveRecord::new(EventKind::Board.into(), EventKind::Destroy.into());
        assert!(record.ships().is_empty());
        assert!(record.has_succeeded());
        assert!(!record.has_failed());
    }

    #[test]
    fn test_every_ship_must_qualify() {
        let succeed = EventMask::from(EventKind::Disable) | EventKind::ScanCargo;
        let (mut record, ids) = record_with(succeed, EventMask::EMPTY, 2);

        record.record_event(ids[0], EventKind::Disable);
        record.record_event(ids[0], EventKind::ScanCargo);
        assert!(!record.has_succeeded());

        record.record_event(ids[1], EventKind::ScanCargo);
        assert!(!record.has_succeeded());
        record.record_event(ids[1], EventKind::Disable);
        assert!(record.has_succeeded());

        // A new ship that has not met the condition flips success back off.
        record.add_ship(Ship::new("Falcon", 3.0), EventMask::EMPTY);
        assert!(!record.has_succeeded());
    }

    #[test]
    fn test_record_event_idempotent() {
        let (mut once, ids) = record_with(EventKind::Board.into(), EventMask::EMPTY, 1);
        let mut twice = once.clone();

        once.record_event(ids[0], EventKind::ScanOutfits);
        twice.record_event(ids[0], EventKind::ScanOutfits);
        twice.record_event(ids[0], EventKind::ScanOutfits);

        assert_eq!(once, twice);
        assert_eq!(once.actions(ids[0]), EventKind::ScanOutfits.into());
    }

    #[test]
    fn test_untracked_ship_ignored() {
        let (mut record, _) = record_with(EventKind::Board.into(), EventKind::Destroy.into(), 1);
        let before = record.clone();

        record.record_event(ShipId::new(), EventKind::Destroy);
        record.record_event(ShipId::nil(), EventKind::Destroy);
        assert_eq!(record, before);
        assert!(!record.has_failed());
    }

    #[test]
    fn test_prior_actions_count() {
        let mut record = ObjectiveRecord::new(EventKind::Board.into(), EventMask::EMPTY);
        record.add_ship(Ship::new("Sparrow", 5.0), EventKind::Board.into());
        assert!(record.has_succeeded());
    }

    #[test]
    fn test_remove_ship_drops_progress() {
        let (mut record, ids) =
            record_with(EventKind::Board.into(), EventKind::Destroy.into(), 2);
        record.record_event(ids[0], EventKind::Destroy);
        assert!(record.has_failed());

        let removed = record.remove_ship(ids[0]).unwrap();
        assert_eq!(removed.id, ids[0]);
        assert!(!record.has_failed());
        assert!(record.actions(ids[0]).is_empty());
        assert!(record.remove_ship(ids[0]).is_none());
    }

    #[test]
    fn test_retain_ships_prunes_progress() {
        let (mut record, ids) =
            record_with(EventKind::Board.into(), EventKind::Destroy.into(), 3);
        record.record_event(ids[0], EventKind::Destroy);
        record.record_event(ids[1], EventKind::Board);
        assert!(record.has_failed());

        let removed = record.retain_ships(|ship| ship.id != ids[0] && ship.id != ids[2]);
        assert_eq!(removed, 2);
        assert_eq!(record.ships().len(), 1);
        assert!(!record.has_failed());
        assert!(record.actions(ids[0]).is_empty());
        assert_eq!(record.progress.len(), 1);
        assert!(record.has_succeeded());
    }

    #[test]
    fn test_handle_fires_on_edges_only() {
        let (mut record, ids) =
            record_with(EventKind::Board.into(), EventKind::Destroy.into(), 2);
        record.dialog = Some("Well done, <npc>.".to_string());

        assert_eq!(record.handle(&ShipEvent::new(ids[0], EventKind::Board)), None);
        assert_eq!(
            record.handle(&ShipEvent::new(ids[1], EventKind::Board)),
            Some(ObjectiveNotice::Dialog("Well done, <npc>.".to_string()))
        );
        // Already succeeded: no repeat.
        assert_eq!(record.handle(&ShipEvent::new(ids[1], EventKind::Board)), None);
        assert_eq!(record.handle(&ShipEvent::new(ids[0], EventKind::Disable)), None);

        assert_eq!(
            record.handle(&ShipEvent::new(ids[0], EventKind::Destroy)),
            Some(ObjectiveNotice::Failed)
        );
        assert_eq!(record.handle(&ShipEvent::new(ids[1], EventKind::Destroy)), None);
    }

    #[test]
    fn test_conversation_preferred_over_dialog() {
        let (mut record, ids) = record_with(EventKind::ScanCargo.into(), EventMask::EMPTY, 1);
        record.dialog = Some("Dialog".to_string());
        record.conversation.add_node(ConversationNode::new("Conversation"));

        match record.handle(&ShipEvent::new(ids[0], EventKind::ScanCargo)) {
            Some(ObjectiveNotice::Conversation(c)) => {
                assert_eq!(c.nodes[0].paragraphs[0], "Conversation")
            }
            other => panic!("unexpected notice: {:?}", other),
        }
    }

    #[test]
    fn test_plain_success_notice() {
        let (mut record, ids) = record_with(EventKind::Disable.into(), EventMask::EMPTY, 1);
        assert_eq!(
            record.handle(&ShipEvent::new(ids[0], EventKind::Disable)),
            Some(ObjectiveNotice::Succeeded)
        );
    }
}
