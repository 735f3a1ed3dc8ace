//! Error types for event channels.

use std::error::Error;
use std::fmt;

/// Errors from subscribing to, triggering, or forwarding channel events.
///
/// Both variants are programmer faults: a channel's event names are fixed
/// at construction, and a stopped event must not be forwarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventError {
    /// The name is not one of the channel's registered event names.
    UnknownEvent {
        /// The name that was requested.
        name: String,
        /// The names the channel was built with.
        expected: Vec<&'static str>,
    },
    /// Attempted to forward an event that a listener already stopped.
    ForwardStopped {
        /// Name of the stopped event.
        name: &'static str,
    },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEvent { name, expected } => {
                write!(
                    f,
                    "invalid event type '{name}', expected one of [{}]",
                    expected.join(", ")
                )
            }
            Self::ForwardStopped { name } => {
                write!(f, "cannot forward stopped event '{name}'")
            }
        }
    }
}

impl Error for EventError {}
