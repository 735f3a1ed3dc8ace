//! Ship parts, vessels and behaviors for hexfleet.
//!
//! A [`Vessel`] owns an arena of [`Part`]s laid out on a hex grid. Every
//! mutation of a part (`damage`, `repair`, `define`) runs through a
//! two-phase pipeline: a cancellable *before* event that listeners may
//! veto or rewrite, then a commit and an informational *after* event.
//! [`Behavior`]s are named installers that subscribe such listeners on a
//! part and its neighbours; [`BehaviorRegistry`] maps names to them.
//!
//! [`PartDesc`] and [`VesselClassDesc`] are the serde descriptor shapes
//! exchanged with storage; [`PartLibrary`] turns them into vessels.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod behaviors;
pub mod error;
pub mod library;
pub mod part;
pub mod vessel;

pub use behaviors::{Behavior, BehaviorRegistry};
pub use error::VesselError;
pub use library::{CellDesc, PartDesc, PartLibrary, VesselClassDesc};
pub use part::{
    FireChannel, KindTag, Operation, Part, PartChannel, PartKind, PartSpec, PartState, Purpose,
    Transition, Volley,
};
pub use vessel::{EnergyBalance, Rect, Vessel, VesselInfo};
