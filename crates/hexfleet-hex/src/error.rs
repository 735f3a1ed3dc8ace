//! Error types for hex coordinates.

use std::error::Error;
use std::fmt;

/// Errors from constructing or parsing hex coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HexError {
    /// A hash string could not be parsed.
    InvalidHash {
        /// The offending input.
        input: String,
        /// What went wrong.
        reason: String,
    },
    /// Cube components do not sum to zero.
    OffPlane {
        /// Cube x.
        x: i32,
        /// Cube y.
        y: i32,
        /// Cube z.
        z: i32,
    },
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHash { input, reason } => {
                write!(f, "invalid hex hash '{input}': {reason}")
            }
            Self::OffPlane { x, y, z } => {
                write!(f, "cube ({x}, {y}, {z}) is off the x + y + z = 0 plane")
            }
        }
    }
}

impl Error for HexError {}
