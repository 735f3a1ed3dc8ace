//! Error types for the battle loop.

use std::error::Error;
use std::fmt;

use hexfleet_core::EventError;
use hexfleet_vessel::VesselError;

use crate::config::ConfigError;
use crate::team::MemberId;

/// Errors that abort a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleError {
    /// A part operation failed.
    Vessel(VesselError),
    /// Lifecycle channel misuse.
    Event(EventError),
    /// Invalid [`BattleConfig`](crate::BattleConfig).
    Config(ConfigError),
    /// Every acknowledger of a lifecycle event was dropped unconsumed.
    AcknowledgementDropped {
        /// Name of the lifecycle event.
        event: &'static str,
    },
    /// An attack refers to a roster slot that does not exist.
    UnknownMember {
        /// The missing member.
        member: MemberId,
    },
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vessel(e) => write!(f, "vessel error: {e}"),
            Self::Event(e) => write!(f, "lifecycle error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::AcknowledgementDropped { event } => {
                write!(f, "'{event}' was dropped without being acknowledged")
            }
            Self::UnknownMember { member } => write!(f, "no roster member {member}"),
        }
    }
}

impl Error for BattleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Vessel(e) => Some(e),
            Self::Event(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VesselError> for BattleError {
    fn from(e: VesselError) -> Self {
        Self::Vessel(e)
    }
}

impl From<EventError> for BattleError {
    fn from(e: EventError) -> Self {
        Self::Event(e)
    }
}

impl From<ConfigError> for BattleError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
