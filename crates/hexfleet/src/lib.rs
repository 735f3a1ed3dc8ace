//! Hexfleet: a turn-based starship combat simulation on a hexagonal grid.
//!
//! This is the facade crate re-exporting the public API of the hexfleet
//! sub-crates. Depending on `hexfleet` alone is enough for most users.
//!
//! # Quick start
//!
//! ```rust
//! use hexfleet::prelude::*;
//!
//! fn warship(name: &str) -> Vessel {
//!     let mut v = Vessel::new(VesselInfo {
//!         name: name.into(),
//!         designation: "NCC-1".into(),
//!         class: "Frigate".into(),
//!         faction: "none".into(),
//!     });
//!     v.add_cell(&Cube::ORIGIN, &PartSpec::new("Bridge", PartKind::Command, 3));
//!     v.add_cell(
//!         &Cube::from_xz(1, 0),
//!         &PartSpec::new("Phaser", PartKind::defense(Purpose::Atk), 2),
//!     );
//!     v
//! }
//!
//! let crew = Crew {
//!     pilot: Roll::new(2, 10),
//!     engineer: Roll::new(2, 10),
//!     tactical: Roll::new(2, 10),
//! };
//! let config = BattleConfig { seed: 42, ..BattleConfig::default() };
//! let mut battle = BattleManager::new(config, BehaviorRegistry::with_builtins()).unwrap();
//! battle.create_and_add_team("red", [Recruit::new(warship("Ares"), crew, RandomExecutor::new(1))]);
//! battle.create_and_add_team("blue", [Recruit::new(warship("Nike"), crew, RandomExecutor::new(2))]);
//!
//! let summary = futures::executor::block_on(battle.run()).unwrap();
//! assert_eq!(summary.teams.len(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`events`] | `hexfleet-core` | Ids, events and event channels |
//! | [`hex`] | `hexfleet-hex` | Coordinates, rings, distances and walks |
//! | [`vessel`] | `hexfleet-vessel` | Parts, vessels, behaviors and descriptors |
//! | [`battle`] | `hexfleet-battle` | Teams, rolls, executors and the battle loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ids, events and event channels (`hexfleet-core`).
///
/// [`events::EventChannel`] is the subscription mechanism parts and the
/// battle lifecycle are built on.
pub use hexfleet_core as events;

/// Hex coordinates and grid algorithms (`hexfleet-hex`).
pub use hexfleet_hex as hex;

/// Parts, vessels and their behaviors (`hexfleet-vessel`).
///
/// [`vessel::Vessel`] owns its parts and runs the damage, repair and
/// define pipeline; [`vessel::BehaviorRegistry`] resolves behavior names.
pub use hexfleet_vessel as vessel;

/// The battle loop (`hexfleet-battle`).
pub use hexfleet_battle as battle;

/// Common imports for typical hexfleet usage.
///
/// ```rust
/// use hexfleet::prelude::*;
/// ```
pub mod prelude {
    // Events
    pub use hexfleet_core::{Event, Flow, PartId, VesselId};

    // Grid
    pub use hexfleet_hex::{Cube, Diag, Grid, HexCoord};

    // Vessels
    pub use hexfleet_vessel::{
        BehaviorRegistry, PartKind, PartLibrary, PartSpec, PartState, Purpose, Vessel,
        VesselClassDesc, VesselError, VesselInfo,
    };

    // Battle
    pub use hexfleet_battle::{
        Attack, BattleConfig, BattleError, BattleManager, BattleSummary, Crew, Executor, Hit,
        Outcome, RandomExecutor, Recruit, Roll,
    };
}
