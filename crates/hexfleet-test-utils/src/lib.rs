//! Fixtures and test doubles for hexfleet development.
//!
//! Provides a standard part library, quick vessel builders, a
//! [`TransitionLog`] recorder for part events, and executors with fixed
//! behavior for driving the battle loop deterministically.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use hexfleet_battle::{Attack, Crew, Executor, Member, Roll, Team};
use hexfleet_core::{Flow, PartId};
use hexfleet_hex::{Cube, HexCoord};
use hexfleet_vessel::{
    CellDesc, KindTag, PartDesc, PartKind, PartLibrary, PartSpec, Purpose, Transition, Vessel,
    VesselClassDesc, VesselInfo,
};

// ── Part blueprints ─────────────────────────────────────────────

pub fn bridge(max: i32) -> PartSpec {
    PartSpec::new("Bridge", PartKind::Command, max)
}

pub fn phaser(max: i32) -> PartSpec {
    PartSpec::new("Phaser", PartKind::defense(Purpose::Atk), max)
}

pub fn shield(max: i32) -> PartSpec {
    PartSpec::new("Shield", PartKind::defense(Purpose::Def), max)
}

pub fn hull(max: i32) -> PartSpec {
    PartSpec::new("Hull", PartKind::Engineering, max)
}

pub fn core(max: i32, energy: i32, stock: i32) -> PartSpec {
    PartSpec::new("Warp core", PartKind::energy(energy, stock), max)
}

fn desc(name: &str, kind: KindTag, max_value: i32, behaviors: &[&str]) -> PartDesc {
    PartDesc {
        name: name.to_string(),
        kind,
        max_value,
        behaviors: behaviors.iter().map(|b| b.to_string()).collect(),
        energy: None,
        stock: None,
        purpose: None,
    }
}

/// Descriptors of a small but complete part catalogue.
pub fn standard_parts() -> Vec<PartDesc> {
    vec![
        desc("Bridge", KindTag::Command, 3, &[]),
        PartDesc {
            purpose: Some(Purpose::Atk),
            ..desc("Phaser", KindTag::Defense, 2, &[])
        },
        PartDesc {
            purpose: Some(Purpose::Both),
            ..desc("Torpedo bay", KindTag::Defense, 4, &["dammage-after-fire"])
        },
        desc("Deflector", KindTag::Defense, 5, &["absorb-direct-neighbors-damage"]),
        desc("Hull plating", KindTag::Engineering, 3, &["ignore-1-damage"]),
        desc("Nacelle", KindTag::Engineering, 2, &["on-destroy-damage-neighbors"]),
        PartDesc {
            energy: Some(6),
            stock: Some(4),
            ..desc("Warp core", KindTag::Energy, 4, &["energy-depleted"])
        },
        desc("Quarters", KindTag::Life, 2, &[]),
        desc("Sensors", KindTag::Science, 2, &[]),
    ]
}

pub fn standard_library() -> PartLibrary {
    match PartLibrary::from_descs(&standard_parts()) {
        Ok(lib) => lib,
        Err(e) => panic!("standard parts are valid: {e}"),
    }
}

fn cell(hex: Cube, part: &str) -> CellDesc {
    CellDesc {
        hex_hash: hex.hash(),
        part_name: part.to_string(),
    }
}

/// A seven-cell cruiser: bridge in the middle, weapons and shield around.
pub fn cruiser_class(designation: &str) -> VesselClassDesc {
    VesselClassDesc {
        info: VesselInfo {
            name: String::new(),
            designation: designation.to_string(),
            class: "Cruiser".to_string(),
            faction: "test".to_string(),
        },
        cells: vec![
            cell(Cube::ORIGIN, "Bridge"),
            cell(Cube::from_xz(0, -1), "Phaser"),
            cell(Cube::from_xz(1, -1), "Torpedo bay"),
            cell(Cube::from_xz(1, 0), "Deflector"),
            cell(Cube::from_xz(0, 1), "Warp core"),
            cell(Cube::from_xz(-1, 1), "Nacelle"),
            cell(Cube::from_xz(-1, 0), "Hull plating"),
        ],
    }
}

// ── Vessels ─────────────────────────────────────────────────────

pub struct VesselBuilder {
    vessel: Vessel,
}

impl VesselBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            vessel: Vessel::new(VesselInfo {
                name: name.to_string(),
                designation: "T-1".to_string(),
                class: "Test".to_string(),
                faction: "test".to_string(),
            }),
        }
    }

    pub fn part(mut self, at: impl HexCoord, spec: PartSpec) -> Self {
        self.vessel.add_cell(&at, &spec);
        self
    }

    pub fn build(self) -> Vessel {
        self.vessel
    }
}

/// Bridge at the origin and one phaser next to it.
pub fn minimal_warship(name: &str) -> Vessel {
    VesselBuilder::new(name)
        .part(Cube::ORIGIN, bridge(3))
        .part(Cube::from_xz(1, 0), phaser(2))
        .build()
}

pub fn id_at(vessel: &Vessel, at: impl HexCoord) -> PartId {
    match vessel.get_id(&at) {
        Some(id) => id,
        None => panic!("no part at {}", at.hash()),
    }
}

// ── Recorders ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recorded {
    pub event: &'static str,
    pub transition: Transition,
    pub stopped: bool,
}

/// Shared log of part events, filled by listeners from [`TransitionLog::watch`].
#[derive(Clone, Default)]
pub struct TransitionLog {
    entries: Rc<RefCell<Vec<Recorded>>>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every listed event of `part`. Listeners registered after
    /// this one may still change the event.
    pub fn watch(&self, vessel: &mut Vessel, part: PartId, events: &[&str]) {
        for event in events {
            let entries = Rc::clone(&self.entries);
            let subscribed = vessel.on(part, event, move |e, _| {
                entries.borrow_mut().push(Recorded {
                    event: e.name(),
                    transition: e.data,
                    stopped: e.is_stopped(),
                });
                Ok(Flow::Continue)
            });
            if let Err(err) = subscribed {
                panic!("cannot watch '{event}': {err}");
            }
        }
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.entries.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.borrow().iter().map(|r| r.event).collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

// ── Crews and executors ─────────────────────────────────────────

pub fn crew(attribute: u32, skill: u32) -> Crew {
    Crew::uniform(Roll::new(attribute, skill))
}

/// Never dodges, never attacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleExecutor;

#[async_trait(?Send)]
impl Executor for IdleExecutor {
    async fn escape_maneuver(&self, _teams: &[Team], _me: &Member) -> bool {
        false
    }

    async fn plan_attacks(&self, _teams: &[Team], _me: &Member) -> Vec<Attack> {
        Vec::new()
    }
}

/// Replays the same decisions every turn.
#[derive(Clone, Debug, Default)]
pub struct ScriptedExecutor {
    pub escape: bool,
    pub attacks: Vec<Attack>,
}

impl ScriptedExecutor {
    pub fn new(escape: bool, attacks: Vec<Attack>) -> Self {
        Self { escape, attacks }
    }
}

#[async_trait(?Send)]
impl Executor for ScriptedExecutor {
    async fn escape_maneuver(&self, _teams: &[Team], _me: &Member) -> bool {
        self.escape
    }

    async fn plan_attacks(&self, _teams: &[Team], _me: &Member) -> Vec<Attack> {
        self.attacks.clone()
    }
}
