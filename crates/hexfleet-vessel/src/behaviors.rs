//! Named behaviors and the registry that resolves them.
//!
//! A behavior is installed once per part when a battle starts. It
//! subscribes listeners on the part itself or on its neighbours; those
//! listeners get the owning [`Vessel`] and may reenter the pipeline.

use indexmap::IndexMap;
use tracing::debug;

use hexfleet_core::{Event, Flow, PartId};
use hexfleet_hex::{disk, neighbors, propagate, Walk, WalkMode};

use crate::error::VesselError;
use crate::part::{PartKind, PartState, Transition, AFTER_STATE_CHANGE, BEFORE_DAMAGE};
use crate::vessel::Vessel;

/// Destroyed parts deal 1 damage to each adjacent cell.
pub const ON_DESTROY_DAMAGE_NEIGHBORS: &str = "on-destroy-damage-neighbors";
/// Historical spelling of [`ON_DESTROY_DAMAGE_NEIGHBORS`] found in stored descriptors.
pub const ON_DESTROY_KILL_DAMAGE_NEIGHTBORS: &str = "on-destroy-kill-damage-neightbors";
/// Absorbs damage dealt to adjacent cells.
pub const ABSORB_DIRECT_NEIGHBORS_DAMAGE: &str = "absorb-direct-neighbors-damage";
/// Absorbs damage dealt to cells up to two rings away.
pub const ABSORB_2_NEIGHBORS_DAMAGE: &str = "absorb-2-neighbors-damage";
/// Defense parts wear by their own fire value each time they fire.
pub const DAMMAGE_AFTER_FIRE: &str = "dammage-after-fire";
/// Energy parts going down release their energy onto nearby cells.
pub const ENERGY_DEPLETED: &str = "energy-depleted";
/// Adjacent cells shrug off one point of every hit.
pub const IGNORE_1_DAMAGE: &str = "ignore-1-damage";

/// Number of pulses an [`EnergyDepleted`] part releases at most.
const DEPLETION_PULSES: i32 = 3;

/// An installer wiring event subscriptions for one part.
pub trait Behavior {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Subscribe this behavior's listeners for `part`.
    fn install(&self, vessel: &mut Vessel, part: PartId) -> Result<(), VesselError>;
}

/// Name-to-behavior lookup, built once and passed around by reference.
pub struct BehaviorRegistry {
    behaviors: IndexMap<String, Box<dyn Behavior>>,
}

impl BehaviorRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            behaviors: IndexMap::new(),
        }
    }

    /// A registry with every built-in behavior.
    pub fn with_builtins() -> Self {
        let mut r = Self::empty();
        r.register(OnDestroyDamageNeighbors);
        r.register_as(ON_DESTROY_KILL_DAMAGE_NEIGHTBORS, OnDestroyDamageNeighbors);
        r.register(Absorb::direct());
        r.register(Absorb::two_rings());
        r.register(DamageAfterFire);
        r.register(EnergyDepleted);
        r.register(Ignore1Damage);
        r
    }

    /// Register `behavior` under its own name, replacing any previous one.
    pub fn register(&mut self, behavior: impl Behavior + 'static) {
        self.register_as(behavior.name(), behavior);
    }

    /// Register `behavior` under `name`.
    pub fn register_as(&mut self, name: &str, behavior: impl Behavior + 'static) {
        self.behaviors.insert(name.to_string(), Box::new(behavior));
    }

    /// The behavior registered under `name`.
    pub fn get(&self, name: &str) -> Option<&dyn Behavior> {
        self.behaviors.get(name).map(|b| b.as_ref())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.behaviors.keys().map(String::as_str)
    }

    /// Resolve `names`, dropping the ones nobody registered.
    pub fn resolve(&self, names: &[String]) -> Vec<&dyn Behavior> {
        names
            .iter()
            .filter_map(|name| {
                let found = self.get(name);
                if found.is_none() {
                    debug!(behavior = %name, "unknown behavior ignored");
                }
                found
            })
            .collect()
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn is_running(vessel: &Vessel, part: PartId) -> Result<bool, VesselError> {
    Ok(vessel.part(part)?.is_running())
}

// ── on-destroy-damage-neighbors ─────────────────────────────────

/// On DESTROYED, deal 1 damage to each of the six adjacent cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct OnDestroyDamageNeighbors;

impl Behavior for OnDestroyDamageNeighbors {
    fn name(&self) -> &'static str {
        ON_DESTROY_DAMAGE_NEIGHBORS
    }

    fn install(&self, vessel: &mut Vessel, part: PartId) -> Result<(), VesselError> {
        vessel.on(part, AFTER_STATE_CHANGE, |e, v| {
            if e.data.new_state != PartState::Destroyed {
                return Ok(Flow::Continue);
            }
            let center = v.part(e.data.part)?.position();
            for cell in neighbors(&center) {
                if let Some(id) = v.get_id(&cell) {
                    v.damage(id, 1)?;
                }
            }
            Ok(Flow::Continue)
        })
    }
}

// ── absorb-*-damage ─────────────────────────────────────────────

/// Takes damage in place of the cells within `radius` while running.
///
/// If the hit fits in the absorber's current value the target is spared
/// and the absorber loses the hit. Otherwise the absorber is drained to
/// zero and the target takes what is left.
#[derive(Clone, Copy, Debug)]
pub struct Absorb {
    name: &'static str,
    radius: u32,
}

impl Absorb {
    /// Covers the six adjacent cells.
    pub fn direct() -> Self {
        Self {
            name: ABSORB_DIRECT_NEIGHBORS_DAMAGE,
            radius: 1,
        }
    }

    /// Covers rings 1 and 2.
    pub fn two_rings() -> Self {
        Self {
            name: ABSORB_2_NEIGHBORS_DAMAGE,
            radius: 2,
        }
    }

    fn absorb(
        absorber: PartId,
        e: &mut Event<Transition>,
        v: &mut Vessel,
    ) -> Result<Flow, VesselError> {
        if !is_running(v, absorber)? {
            return Ok(Flow::Continue);
        }
        let capacity = v.part(absorber)?.current_value();
        let incoming = e.data.incoming();
        if incoming == 0 {
            return Ok(Flow::Continue);
        }
        if incoming <= capacity {
            e.data.new_value = e.data.old_value;
            v.define(absorber, capacity - incoming)?;
            Ok(Flow::Stop)
        } else {
            e.data.new_value += capacity;
            v.define(absorber, 0)?;
            Ok(Flow::Continue)
        }
    }
}

impl Behavior for Absorb {
    fn name(&self) -> &'static str {
        self.name
    }

    fn install(&self, vessel: &mut Vessel, part: PartId) -> Result<(), VesselError> {
        let center = vessel.part(part)?.position();
        for cell in disk(&center, self.radius).into_iter().skip(1) {
            if let Some(target) = vessel.get_id(&cell) {
                vessel.on(target, BEFORE_DAMAGE, move |e, v| Self::absorb(part, e, v))?;
            }
        }
        Ok(())
    }
}

// ── dammage-after-fire ──────────────────────────────────────────

/// Defense parts take their own fire value as damage after firing.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageAfterFire;

impl Behavior for DamageAfterFire {
    fn name(&self) -> &'static str {
        DAMMAGE_AFTER_FIRE
    }

    fn install(&self, vessel: &mut Vessel, part: PartId) -> Result<(), VesselError> {
        if vessel.part(part)?.purpose().is_none() {
            return Ok(());
        }
        vessel.on_fire(part, |e, v| {
            v.damage(e.data.part, e.data.value)?;
            Ok(Flow::Continue)
        })
    }
}

// ── energy-depleted ─────────────────────────────────────────────

/// When an energy part goes OFFLINE or DESTROYED it spends up to three
/// pulses of its `energy`, each dealing 1 damage to the nearest cell
/// that still has value.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnergyDepleted;

impl Behavior for EnergyDepleted {
    fn name(&self) -> &'static str {
        ENERGY_DEPLETED
    }

    fn install(&self, vessel: &mut Vessel, part: PartId) -> Result<(), VesselError> {
        if !matches!(vessel.part(part)?.kind(), PartKind::Energy { .. }) {
            return Ok(());
        }
        vessel.on(part, AFTER_STATE_CHANGE, |e, v| {
            if !matches!(e.data.new_state, PartState::Offline | PartState::Destroyed) {
                return Ok(Flow::Continue);
            }
            let source = v.part(e.data.part)?;
            let center = source.position();
            let mut stock = match source.kind() {
                PartKind::Energy { energy, .. } => *energy,
                _ => 0,
            };
            for _ in 0..DEPLETION_PULSES {
                if stock <= 0 {
                    break;
                }
                let mut hit = None;
                propagate(&center, WalkMode::Auto, |cell, _, _| {
                    match v.get(&cell).filter(|p| p.current_value() > 0) {
                        Some(p) => {
                            hit = Some(p.id());
                            Walk::Stop
                        }
                        None => Walk::Next,
                    }
                });
                let Some(target) = hit else { break };
                v.damage(target, 1)?;
                stock -= 1;
            }
            Ok(Flow::Continue)
        })
    }
}

// ── ignore-1-damage ─────────────────────────────────────────────

/// Adjacent cells take one point less from every hit while this part runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ignore1Damage;

impl Behavior for Ignore1Damage {
    fn name(&self) -> &'static str {
        IGNORE_1_DAMAGE
    }

    fn install(&self, vessel: &mut Vessel, part: PartId) -> Result<(), VesselError> {
        let center = vessel.part(part)?.position();
        for cell in neighbors(&center) {
            if let Some(target) = vessel.get_id(&cell) {
                vessel.on(target, BEFORE_DAMAGE, move |e, v| {
                    if is_running(v, part)? && e.data.incoming() > 0 {
                        e.data.new_value = (e.data.new_value + 1).min(e.data.old_value);
                    }
                    Ok(Flow::Continue)
                })?;
            }
        }
        Ok(())
    }
}
