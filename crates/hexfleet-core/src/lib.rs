//! Core types for the hexfleet combat simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the strongly-typed identifiers shared by every layer and the
//! cancellable, cascading [`EventChannel`] that parts use to publish
//! their state transitions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod error;
pub mod event;
pub mod id;

pub use channel::{EventChannel, Listener, Listeners};
pub use error::EventError;
pub use event::{Event, Flow};
pub use id::{PartId, VesselId};
