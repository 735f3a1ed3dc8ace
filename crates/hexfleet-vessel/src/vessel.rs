//! The vessel container and the part mutation pipeline.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hexfleet_core::{Event, Flow, PartId, VesselId};
use hexfleet_hex::{Cube, Grid, HexCoord};

use crate::behaviors::BehaviorRegistry;
use crate::error::VesselError;
use crate::part::{
    KindTag, Operation, Part, PartKind, PartSpec, PartState, Transition, Volley,
    BEFORE_STATE_CHANGE, AFTER_STATE_CHANGE, FIRE,
};

/// Identity of a vessel class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselInfo {
    /// Individual name. May be empty.
    #[serde(default)]
    pub name: String,
    /// Hull designation, e.g. `NX-01`.
    pub designation: String,
    /// Class name.
    pub class: String,
    /// Owning faction.
    pub faction: String,
}

/// Grid-space bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left cell.
    pub origin: Grid,
    /// Columns covered.
    pub width: u32,
    /// Rows covered.
    pub height: u32,
}

/// Energy aggregates over running parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyBalance {
    /// Sum of capacities of running parts.
    pub consumed: i32,
    /// Sum of `energy` of running energy parts.
    pub produced: i32,
    /// `produced - consumed`.
    pub balance: i32,
    /// Sum of `stock` of running energy parts.
    pub stock: i32,
    /// Sum of `current_stock` of running energy parts.
    pub current_stock: i32,
}

/// A ship: an arena of parts indexed by hex position.
///
/// Part ids are arena slots and are never reused. The cell index keeps
/// insertion order; re-adding at an occupied position keeps the slot in
/// that order and hands back the displaced part.
#[derive(Debug)]
pub struct Vessel {
    id: VesselId,
    /// Class identity and name.
    pub info: VesselInfo,
    slots: Vec<Option<Part>>,
    cells: IndexMap<Cube, PartId>,
    behaviors_installed: bool,
}

impl Vessel {
    /// An empty vessel.
    pub fn new(info: VesselInfo) -> Self {
        Self {
            id: VesselId::next(),
            info,
            slots: Vec::new(),
            cells: IndexMap::new(),
            behaviors_installed: false,
        }
    }

    /// Unique instance id.
    pub fn id(&self) -> VesselId {
        self.id
    }

    /// Individual name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    // ── Grid ────────────────────────────────────────────────────

    /// Place a part built from `spec` at `position`.
    ///
    /// Returns the new part's id and the part it displaced, if any.
    pub fn add_cell(&mut self, position: &impl HexCoord, spec: &PartSpec) -> (PartId, Option<Part>) {
        let position = position.cube();
        let id = PartId(self.slots.len() as u32);
        self.slots
            .push(Some(Part::place(spec, id, self.id, position)));
        let displaced = self
            .cells
            .insert(position, id)
            .and_then(|old| self.take_slot(old));
        (id, displaced)
    }

    /// Remove the part at `position`.
    pub fn remove_cell(&mut self, position: &impl HexCoord) -> Option<Part> {
        let id = self.cells.shift_remove(&position.cube())?;
        self.take_slot(id)
    }

    fn take_slot(&mut self, id: PartId) -> Option<Part> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    /// The part at `position`.
    pub fn get(&self, position: &impl HexCoord) -> Option<&Part> {
        self.get_id(position).and_then(|id| self.part(id).ok())
    }

    /// Id of the part at `position`.
    pub fn get_id(&self, position: &impl HexCoord) -> Option<PartId> {
        self.cells.get(&position.cube()).copied()
    }

    /// The part in slot `id`.
    pub fn part(&self, id: PartId) -> Result<&Part, VesselError> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(VesselError::MissingPart { id })
    }

    fn part_mut(&mut self, id: PartId) -> Result<&mut Part, VesselError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(VesselError::MissingPart { id })
    }

    /// Parts in cell order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> + '_ {
        self.cells.values().filter_map(|&id| self.part(id).ok())
    }

    /// Ids in cell order.
    pub fn part_ids(&self) -> Vec<PartId> {
        self.cells.values().copied().collect()
    }

    /// Parts that are ONLINE or DAMAGED.
    pub fn running_parts(&self) -> impl Iterator<Item = &Part> + '_ {
        self.parts().filter(|p| p.is_running())
    }

    /// Parts of one kind.
    pub fn parts_of_kind(&self, tag: KindTag) -> impl Iterator<Item = &Part> + '_ {
        self.parts().filter(move |p| p.kind().tag() == tag)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the vessel has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grid-space bounding box of all cells (zero-sized when empty).
    pub fn rect(&self) -> Rect {
        let mut grids = self.cells.keys().map(|c| c.grid());
        let Some(first) = grids.next() else {
            return Rect::default();
        };
        let (min, max) = grids.fold((first, first), |(lo, hi), g| {
            (
                Grid::new(lo.x.min(g.x), lo.y.min(g.y)),
                Grid::new(hi.x.max(g.x), hi.y.max(g.y)),
            )
        });
        Rect {
            origin: min,
            width: (max.x - min.x) as u32 + 1,
            height: (max.y - min.y) as u32 + 1,
        }
    }

    // ── Aggregates ──────────────────────────────────────────────

    /// Energy production, consumption and storage of running parts.
    pub fn energy_balance(&self) -> EnergyBalance {
        let mut eb = EnergyBalance::default();
        for part in self.running_parts() {
            eb.consumed += part.max_value();
            if let PartKind::Energy {
                energy,
                stock,
                current_stock,
            } = part.kind()
            {
                eb.produced += energy;
                eb.stock += stock;
                eb.current_stock += current_stock;
            }
        }
        eb.balance = eb.produced - eb.consumed;
        eb
    }

    /// Whether the vessel is out of the fight.
    ///
    /// A vessel stays in unless it lacks a running part named like a
    /// bridge (case-insensitive) or lacks any offense-capable defense
    /// part, operable or not.
    pub fn is_ko(&self) -> bool {
        let bridge = self
            .parts()
            .any(|p| p.is_running() && p.name().to_lowercase().contains("bridge"));
        let armed = self.parts().any(Part::is_weapon);
        !(bridge && armed)
    }

    // ── Maintenance ─────────────────────────────────────────────

    /// Install the behaviors every part names. Runs once per vessel.
    pub fn install_all_behaviors(&mut self, registry: &BehaviorRegistry) -> Result<(), VesselError> {
        if self.behaviors_installed {
            return Ok(());
        }
        self.behaviors_installed = true;
        for id in self.part_ids() {
            let names = self.part(id)?.behaviors.clone();
            for behavior in registry.resolve(&names) {
                behavior.install(self, id)?;
            }
        }
        Ok(())
    }

    /// Whether [`install_all_behaviors`](Self::install_all_behaviors) ran.
    pub fn behaviors_installed(&self) -> bool {
        self.behaviors_installed
    }

    /// Restore every part to full value and ONLINE without firing events.
    /// Banked energy is emptied.
    pub fn repair_all(&mut self) {
        for part in self.slots.iter_mut().flatten() {
            part.current_value = part.max_value;
            part.state = PartState::Online;
            if let PartKind::Energy { current_stock, .. } = &mut part.kind {
                *current_stock = 0;
            }
        }
    }

    /// Bank up to `amount` energy in an energy part. Returns what was stored.
    pub fn store_energy(&mut self, id: PartId, amount: i32) -> Result<i32, VesselError> {
        if amount < 0 {
            return Err(VesselError::InvalidDescriptor {
                reason: format!("cannot store negative energy {amount}"),
            });
        }
        let part = self.part_mut(id)?;
        match &mut part.kind {
            PartKind::Energy {
                stock,
                current_stock,
                ..
            } => {
                let stored = amount.min(*stock - *current_stock).max(0);
                *current_stock += stored;
                Ok(stored)
            }
            _ => Err(VesselError::WrongKind {
                id,
                expected: KindTag::Energy,
            }),
        }
    }

    // ── Listeners ───────────────────────────────────────────────

    /// Subscribe to one of a part's transition events.
    pub fn on<F>(&mut self, part: PartId, event: &str, listener: F) -> Result<(), VesselError>
    where
        F: Fn(&mut Event<Transition>, &mut Vessel) -> Result<Flow, VesselError> + 'static,
    {
        self.part_mut(part)?.channel.on(event, listener)?;
        Ok(())
    }

    /// Subscribe to a defense part's `fire` event.
    pub fn on_fire<F>(&mut self, part: PartId, listener: F) -> Result<(), VesselError>
    where
        F: Fn(&mut Event<Volley>, &mut Vessel) -> Result<Flow, VesselError> + 'static,
    {
        let channel = self
            .part_mut(part)?
            .fire
            .as_mut()
            .ok_or(VesselError::WrongKind {
                id: part,
                expected: KindTag::Defense,
            })?;
        channel.on(FIRE, listener)?;
        Ok(())
    }

    // ── Pipeline ────────────────────────────────────────────────

    /// Lower a part's value by `amount`.
    pub fn damage(&mut self, part: PartId, amount: i32) -> Result<Option<Transition>, VesselError> {
        self.mutate(part, Operation::Damage, amount)
    }

    /// Raise a part's value by `amount`, up to its capacity.
    pub fn repair(&mut self, part: PartId, amount: i32) -> Result<Option<Transition>, VesselError> {
        self.mutate(part, Operation::Repair, amount)
    }

    /// Set a part's value to `target`.
    pub fn define(&mut self, part: PartId, target: i32) -> Result<Option<Transition>, VesselError> {
        self.mutate(part, Operation::Define, target)
    }

    /// Fire a defense part and return its damage value.
    ///
    /// A dry run only reports the value; otherwise `fire` listeners run.
    pub fn fire(&mut self, part: PartId, dry_run: bool) -> Result<i32, VesselError> {
        let p = self.part(part)?;
        let channel = p.fire.as_ref().ok_or(VesselError::WrongKind {
            id: part,
            expected: KindTag::Defense,
        })?;
        let value = p.max_value;
        if !dry_run {
            let listeners = channel.listeners(FIRE)?;
            let mut event = channel.event(FIRE, Volley { part, value })?;
            listeners.dispatch(&mut event, self)?;
        }
        Ok(value)
    }

    fn mutate(
        &mut self,
        id: PartId,
        operation: Operation,
        amount: i32,
    ) -> Result<Option<Transition>, VesselError> {
        if amount < 0 && operation != Operation::Define {
            return Err(VesselError::NegativeAmount { operation, amount });
        }
        let part = self.part(id)?;
        let (old_value, old_state, max) = (part.current_value, part.state, part.max_value);
        if operation == Operation::Repair && old_value >= max {
            return Ok(None);
        }
        let raw = match operation {
            Operation::Damage => old_value.saturating_sub(amount),
            Operation::Repair => old_value.saturating_add(amount),
            Operation::Define => amount,
        };
        let candidate = part.settle(operation, old_value, raw);
        if raw.clamp(0, max) == old_value && candidate == old_state {
            return Ok(None);
        }

        // Value sub-event.
        let proposal = Transition {
            part: id,
            operation,
            old_value,
            new_value: raw,
            old_state,
            new_state: candidate,
        };
        let mut value_event = part.channel.event(operation.before(), proposal)?;
        part.channel
            .listeners(operation.before())?
            .dispatch(&mut value_event, self)?;
        let value_vetoed = value_event.is_stopped();

        // Nested pipelines may have committed to this part already. Damage
        // and repair apply the listener-adjusted delta on top of them.
        let (base_value, base_state) = {
            let part = self.part(id)?;
            (part.current_value, part.state)
        };
        let proposed = value_event.data.new_value;
        let effective = if value_vetoed {
            base_value
        } else if base_value == old_value || operation == Operation::Define {
            proposed
        } else {
            base_value.saturating_add(proposed.saturating_sub(old_value))
        };
        let (old_value, old_state) = (base_value, base_state);
        let proposal = Transition {
            old_value,
            old_state,
            ..proposal
        };
        let new_value = effective.clamp(0, max);
        let new_state = if value_event.data.new_state != candidate {
            value_event.data.new_state
        } else if value_vetoed {
            old_state
        } else {
            self.part(id)?.settle(operation, old_value, effective)
        };

        // State sub-event.
        let mut state_event = None;
        let mut committed_state = old_state;
        if new_state != old_state {
            let part = self.part(id)?;
            let mut event = part.channel.event(
                BEFORE_STATE_CHANGE,
                Transition {
                    new_value,
                    new_state,
                    ..proposal
                },
            )?;
            part.channel
                .listeners(BEFORE_STATE_CHANGE)?
                .dispatch(&mut event, self)?;
            if !event.is_stopped() {
                committed_state = event.data.new_state;
                state_event = Some(event);
            }
        }

        // Commit.
        let part = self.part_mut(id)?;
        if !value_vetoed {
            part.current_value = new_value;
        }
        if state_event.is_some() {
            part.state = committed_state;
        }
        let committed = Transition {
            part: id,
            operation,
            old_value,
            new_value: part.current_value,
            old_state,
            new_state: part.state,
        };
        if committed.new_value == old_value && committed.new_state == old_state {
            return Ok(None);
        }
        debug!(
            vessel = %self.id,
            part = %id,
            %operation,
            from = %old_state,
            to = %committed.new_state,
            old_value,
            new_value = committed.new_value,
            "part transition"
        );

        if let Some(mut before) = state_event.filter(|_| committed.new_state != old_state) {
            let part = self.part(id)?;
            let mut after = part
                .channel
                .fork(&mut before, AFTER_STATE_CHANGE, committed, false)?;
            part.channel
                .listeners(AFTER_STATE_CHANGE)?
                .dispatch(&mut after, self)?;
        }
        if !value_vetoed && committed.new_value != old_value {
            let part = self.part(id)?;
            let mut after = part
                .channel
                .fork(&mut value_event, operation.after(), committed, false)?;
            part.channel
                .listeners(operation.after())?
                .dispatch(&mut after, self)?;
        }
        Ok(Some(committed))
    }
}
