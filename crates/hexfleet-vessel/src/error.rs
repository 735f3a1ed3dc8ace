//! Error types for parts, vessels and descriptors.

use std::error::Error;
use std::fmt;

use hexfleet_core::{EventError, PartId};
use hexfleet_hex::HexError;

use crate::part::{KindTag, Operation};

/// Errors from part operations, behavior installation and descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VesselError {
    /// `damage` or `repair` was called with a negative amount.
    NegativeAmount {
        /// The rejected operation.
        operation: Operation,
        /// The rejected amount.
        amount: i32,
    },
    /// A descriptor names a part the library does not know.
    UnknownPart {
        /// The unknown part name.
        name: String,
    },
    /// No part occupies this arena slot (never added, or removed).
    MissingPart {
        /// The stale id.
        id: PartId,
    },
    /// The part exists but has the wrong kind for the operation.
    WrongKind {
        /// The part.
        id: PartId,
        /// Kind required by the operation.
        expected: KindTag,
    },
    /// A descriptor is structurally invalid.
    InvalidDescriptor {
        /// What is wrong.
        reason: String,
    },
    /// Event channel misuse.
    Event(EventError),
    /// Bad hex hash in a descriptor.
    Hex(HexError),
}

impl fmt::Display for VesselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount { operation, amount } => {
                write!(f, "{operation} amount must not be negative, got {amount}")
            }
            Self::UnknownPart { name } => write!(f, "unknown part '{name}'"),
            Self::MissingPart { id } => write!(f, "no part in slot {id}"),
            Self::WrongKind { id, expected } => {
                write!(f, "part {id} is not a {expected} part")
            }
            Self::InvalidDescriptor { reason } => write!(f, "invalid descriptor: {reason}"),
            Self::Event(e) => write!(f, "event error: {e}"),
            Self::Hex(e) => write!(f, "hex error: {e}"),
        }
    }
}

impl Error for VesselError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Event(e) => Some(e),
            Self::Hex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EventError> for VesselError {
    fn from(e: EventError) -> Self {
        Self::Event(e)
    }
}

impl From<HexError> for VesselError {
    fn from(e: HexError) -> Self {
        Self::Hex(e)
    }
}
