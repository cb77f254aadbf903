//! Notices an objective raises for the surrounding mission framework.

use galaxy_rules::Conversation;
use serde::{Deserialize, Serialize};

/// Raised by [`crate::ObjectiveRecord::handle`] when an event moves the
/// objective into failure or success. Each transition raises one notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveNotice {
    /// The objective failed; show a message.
    Failed,
    /// The objective succeeded and has nothing to present.
    Succeeded,
    /// The objective succeeded; show this dialog text.
    Dialog(String),
    /// The objective succeeded; run this conversation.
    Conversation(Conversation),
}

impl ObjectiveNotice {
    /// Message-log text for this notice, if it has one.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ObjectiveNotice::Failed => Some("Mission failed."),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ObjectiveNotice::Failed)
    }
}
