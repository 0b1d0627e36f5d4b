// ── UI-facing command status ──

use serde::{Deserialize, Serialize};

/// Display-only projection of a device's raw status.
///
/// Recomputed on every fetch; never sent to the backend. How each variant is
/// labelled, and which raw status it stands for, depends on the active
/// [`Vocabulary`](crate::status::Vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    Unblock,
    Block,
    /// Device is in use; no command available.
    NoCommand,
    /// Device is alarming.
    Mute,
    Offline,
}

impl CommandStatus {
    pub const ALL: [Self; 5] = [
        Self::Unblock,
        Self::Block,
        Self::NoCommand,
        Self::Mute,
        Self::Offline,
    ];

    /// Only the two lock states can be flipped by the user.
    pub fn is_toggleable(self) -> bool {
        matches!(self, Self::Unblock | Self::Block)
    }

    /// The status shown after a successful toggle, or `None` when this
    /// status cannot be toggled.
    pub fn toggled(self) -> Option<Self> {
        match self {
            Self::Unblock => Some(Self::Block),
            Self::Block => Some(Self::Unblock),
            Self::NoCommand | Self::Mute | Self::Offline => None,
        }
    }
}
