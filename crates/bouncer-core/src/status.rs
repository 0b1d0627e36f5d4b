// ── Status mapping ──
//
// Translates the backend's raw device status into the command vocabulary a
// front end displays. Two vocabularies exist and are selected per deployment;
// they are never mixed within one gateway.
//
// `action` labels name what pressing the button will do:
//   BLOCKED -> UNBLOCK, UNBLOCKED -> BLOCK, IN_USE -> NO_COMMAND,
//   ALARM -> MUTE, OFFLINE/unrecognized -> OFFLINE
//
// `parking` labels name the state the barrier is in:
//   BLOCKED -> BLOCK, UNBLOCKED -> UNBLOCK, IN_USE -> ONGOING_PARKING,
//   ALARM -> ALARM, OFFLINE/unrecognized -> OFFLINE

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{CommandStatus, RawStatus};

/// Named mapping policy from raw status to command status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    #[default]
    Action,
    Parking,
}

impl Vocabulary {
    /// Map a raw status to its command status. Total: never fails.
    pub fn map(self, raw: &RawStatus) -> CommandStatus {
        match (self, raw) {
            (Self::Action, RawStatus::Blocked) | (Self::Parking, RawStatus::Unblocked) => {
                CommandStatus::Unblock
            }
            (Self::Action, RawStatus::Unblocked) | (Self::Parking, RawStatus::Blocked) => {
                CommandStatus::Block
            }
            (_, RawStatus::InUse) => CommandStatus::NoCommand,
            (_, RawStatus::Alarm) => CommandStatus::Mute,
            (_, RawStatus::Offline | RawStatus::Unknown(_)) => CommandStatus::Offline,
        }
    }

    /// Map a raw backend string. Unrecognized input maps to `Offline`.
    pub fn map_str(self, raw: &str) -> CommandStatus {
        self.map(&RawStatus::parse(raw))
    }

    /// The raw status a command status was derived from.
    pub fn raw_for(self, command: CommandStatus) -> RawStatus {
        match (self, command) {
            (Self::Action, CommandStatus::Unblock) | (Self::Parking, CommandStatus::Block) => {
                RawStatus::Blocked
            }
            (Self::Action, CommandStatus::Block) | (Self::Parking, CommandStatus::Unblock) => {
                RawStatus::Unblocked
            }
            (_, CommandStatus::NoCommand) => RawStatus::InUse,
            (_, CommandStatus::Mute) => RawStatus::Alarm,
            (_, CommandStatus::Offline) => RawStatus::Offline,
        }
    }

    /// Display label for a command status.
    pub fn label(self, command: CommandStatus) -> &'static str {
        match (self, command) {
            (_, CommandStatus::Unblock) => "UNBLOCK",
            (_, CommandStatus::Block) => "BLOCK",
            (Self::Action, CommandStatus::NoCommand) => "NO_COMMAND",
            (Self::Parking, CommandStatus::NoCommand) => "ONGOING_PARKING",
            (Self::Action, CommandStatus::Mute) => "MUTE",
            (Self::Parking, CommandStatus::Mute) => "ALARM",
            (_, CommandStatus::Offline) => "OFFLINE",
        }
    }

    /// Parse a display label back into a command status.
    pub fn parse_label(self, label: &str) -> Option<CommandStatus> {
        let label = label.trim();
        CommandStatus::ALL
            .into_iter()
            .find(|c| self.label(*c).eq_ignore_ascii_case(label))
    }

    /// One-line explanation of a command status, for legends and tooltips.
    pub fn describe(self, command: CommandStatus) -> &'static str {
        match (self, command) {
            (Self::Action, CommandStatus::Unblock) => "Device is blocked; press to unblock it",
            (Self::Action, CommandStatus::Block) => "Device is unblocked; press to block it",
            (Self::Parking, CommandStatus::Block) => "Device is blocked (BLOCKED)",
            (Self::Parking, CommandStatus::Unblock) => "Device is unblocked (UNBLOCKED)",
            (Self::Action, CommandStatus::NoCommand) => "Device is in use; no command available",
            (Self::Parking, CommandStatus::NoCommand) => "Parking operation in progress",
            (Self::Action, CommandStatus::Mute) => "Device is alarming; mute it on site",
            (Self::Parking, CommandStatus::Mute) => "Device is in alarm state",
            (_, CommandStatus::Offline) => "Device is offline or reporting an unknown state",
        }
    }

    /// Operational status guide: every command status with label and description.
    pub fn legend(self) -> Vec<(CommandStatus, &'static str, &'static str)> {
        CommandStatus::ALL
            .into_iter()
            .map(|c| (c, self.label(c), self.describe(c)))
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Parking => "parking",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "action" => Ok(Self::Action),
            "parking" => Ok(Self::Parking),
            other => Err(format!("expected 'action' or 'parking', got '{other}'")),
        }
    }
}

/// Map a raw status under the default `action` vocabulary.
pub fn map_raw_to_command(raw: &RawStatus) -> CommandStatus {
    Vocabulary::Action.map(raw)
}
