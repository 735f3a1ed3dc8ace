//! A single ship cell: kind, state machine and owned event channels.

use std::fmt;

use serde::{Deserialize, Serialize};

use hexfleet_core::{EventChannel, PartId, VesselId};
use hexfleet_hex::Cube;

use crate::error::VesselError;
use crate::vessel::Vessel;

// ── Event names ─────────────────────────────────────────────────

/// Candidate state change, cancellable.
pub const BEFORE_STATE_CHANGE: &str = "beforeStateChange";
/// Committed state change.
pub const AFTER_STATE_CHANGE: &str = "afterStateChange";
/// Candidate damage, cancellable.
pub const BEFORE_DAMAGE: &str = "beforeDamage";
/// Committed damage.
pub const AFTER_DAMAGE: &str = "afterDamage";
/// Candidate repair, cancellable.
pub const BEFORE_REPAIR: &str = "beforeRepair";
/// Committed repair.
pub const AFTER_REPAIR: &str = "afterRepair";
/// Candidate define, cancellable.
pub const BEFORE_DEFINE: &str = "beforeDefine";
/// Committed define.
pub const AFTER_DEFINE: &str = "afterDefine";
/// A defense part fired.
pub const FIRE: &str = "fire";

/// Every event a part channel accepts.
pub const PART_EVENTS: [&str; 8] = [
    BEFORE_STATE_CHANGE,
    AFTER_STATE_CHANGE,
    BEFORE_DAMAGE,
    AFTER_DAMAGE,
    BEFORE_REPAIR,
    AFTER_REPAIR,
    BEFORE_DEFINE,
    AFTER_DEFINE,
];

/// Channel carrying a part's transitions. Listeners get the owning vessel.
pub type PartChannel = EventChannel<Transition, Vessel, VesselError>;

/// Channel carrying a defense part's shots.
pub type FireChannel = EventChannel<Volley, Vessel, VesselError>;

// ── State ───────────────────────────────────────────────────────

/// Operational state, ordered from healthy to gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartState {
    /// At full value.
    Online,
    /// Between zero and full value.
    Damaged,
    /// Switched off, either at zero value or explicitly.
    Offline,
    /// Damaged past zero.
    Destroyed,
}

impl PartState {
    /// Whether the part still works (ONLINE or DAMAGED).
    pub fn is_running(self) -> bool {
        matches!(self, Self::Online | Self::Damaged)
    }
}

impl fmt::Display for PartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Online => "ONLINE",
            Self::Damaged => "DAMAGED",
            Self::Offline => "OFFLINE",
            Self::Destroyed => "DESTROYED",
        };
        f.write_str(s)
    }
}

/// What a defense part is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Purpose {
    /// Weapon.
    Atk,
    /// Shielding only.
    #[default]
    Def,
    /// Both.
    Both,
}

impl Purpose {
    /// Whether the part can be used to attack.
    pub fn is_offensive(self) -> bool {
        self != Self::Def
    }
}

// ── Kind ────────────────────────────────────────────────────────

/// Part kind tag, as written in descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    /// Power generation and storage.
    Energy,
    /// Weapons and shields.
    Defense,
    /// Bridge and command.
    Command,
    /// Sensors and labs.
    Science,
    /// Life support and quarters.
    Life,
    /// Hull, engines, structure.
    Engineering,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Energy => "energy",
            Self::Defense => "defense",
            Self::Command => "command",
            Self::Science => "science",
            Self::Life => "life",
            Self::Engineering => "engineering",
        };
        f.write_str(s)
    }
}

/// Part kind with its kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartKind {
    /// Produces `energy` per turn and can bank up to `stock`.
    Energy {
        /// Energy produced while running.
        energy: i32,
        /// Storage capacity.
        stock: i32,
        /// Currently banked energy.
        current_stock: i32,
    },
    /// Weapon or shield.
    Defense {
        /// What it is for.
        purpose: Purpose,
    },
    /// Bridge and command.
    Command,
    /// Sensors and labs.
    Science,
    /// Life support.
    Life,
    /// Structure and propulsion.
    Engineering,
}

impl PartKind {
    /// An energy kind with an empty bank.
    pub fn energy(energy: i32, stock: i32) -> Self {
        Self::Energy {
            energy,
            stock,
            current_stock: 0,
        }
    }

    /// A defense kind.
    pub fn defense(purpose: Purpose) -> Self {
        Self::Defense { purpose }
    }

    /// The descriptor tag.
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Energy { .. } => KindTag::Energy,
            Self::Defense { .. } => KindTag::Defense,
            Self::Command => KindTag::Command,
            Self::Science => KindTag::Science,
            Self::Life => KindTag::Life,
            Self::Engineering => KindTag::Engineering,
        }
    }
}

// ── Event payloads ──────────────────────────────────────────────

/// The mutation a transition comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Value lowered by an amount.
    Damage,
    /// Value raised by an amount.
    Repair,
    /// Value set to a target.
    Define,
}

impl Operation {
    /// Name of the cancellable value event for this operation.
    pub fn before(self) -> &'static str {
        match self {
            Self::Damage => BEFORE_DAMAGE,
            Self::Repair => BEFORE_REPAIR,
            Self::Define => BEFORE_DEFINE,
        }
    }

    /// Name of the informational value event for this operation.
    pub fn after(self) -> &'static str {
        match self {
            Self::Damage => AFTER_DAMAGE,
            Self::Repair => AFTER_REPAIR,
            Self::Define => AFTER_DEFINE,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Damage => "damage",
            Self::Repair => "repair",
            Self::Define => "define",
        };
        f.write_str(s)
    }
}

/// Payload of every part event.
///
/// In *before* events `new_value` / `new_state` are the candidate and may
/// be rewritten by listeners. A damage candidate is not clamped yet: a
/// negative `new_value` means the part is being driven past zero. In
/// *after* events they hold what was committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The part being changed.
    pub part: PartId,
    /// Which operation produced the transition.
    pub operation: Operation,
    /// Value before the operation.
    pub old_value: i32,
    /// Candidate or committed value.
    pub new_value: i32,
    /// State before the operation.
    pub old_state: PartState,
    /// Candidate or committed state.
    pub new_state: PartState,
}

impl Transition {
    /// Damage carried by this transition (0 when the value goes up).
    pub fn incoming(&self) -> i32 {
        (self.old_value - self.new_value).max(0)
    }
}

/// Payload of a defense part's `fire` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Volley {
    /// The firing part.
    pub part: PartId,
    /// Damage dealt by the shot.
    pub value: i32,
}

// ── Part ────────────────────────────────────────────────────────

/// Blueprint of a part, before it is placed in a vessel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartSpec {
    /// Display name, also used for the bridge lookup.
    pub name: String,
    /// Kind and payload.
    pub kind: PartKind,
    /// Capacity.
    pub max_value: i32,
    /// Behavior names, resolved at install time.
    pub behaviors: Vec<String>,
}

impl PartSpec {
    /// A blueprint without behaviors.
    pub fn new(name: impl Into<String>, kind: PartKind, max_value: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            max_value,
            behaviors: Vec::new(),
        }
    }

    /// Add behavior names.
    pub fn with_behaviors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.behaviors.extend(names.into_iter().map(Into::into));
        self
    }
}

/// A placed ship cell.
///
/// State and value change only through the vessel's pipeline
/// ([`Vessel::damage`], [`Vessel::repair`], [`Vessel::define`]).
#[derive(Debug)]
pub struct Part {
    pub(crate) id: PartId,
    pub(crate) owner: VesselId,
    pub(crate) position: Cube,
    pub(crate) name: String,
    pub(crate) kind: PartKind,
    pub(crate) max_value: i32,
    pub(crate) current_value: i32,
    pub(crate) state: PartState,
    pub(crate) behaviors: Vec<String>,
    pub(crate) channel: PartChannel,
    pub(crate) fire: Option<FireChannel>,
}

impl Part {
    pub(crate) fn place(spec: &PartSpec, id: PartId, owner: VesselId, position: Cube) -> Self {
        let fire = matches!(spec.kind, PartKind::Defense { .. })
            .then(|| FireChannel::new(&[FIRE]));
        Self {
            id,
            owner,
            position,
            name: spec.name.clone(),
            kind: spec.kind.clone(),
            max_value: spec.max_value.max(0),
            current_value: spec.max_value.max(0),
            state: PartState::Online,
            behaviors: spec.behaviors.clone(),
            channel: PartChannel::new(&PART_EVENTS),
            fire,
        }
    }

    /// Arena slot of this part.
    pub fn id(&self) -> PartId {
        self.id
    }

    /// The vessel that owns this part.
    pub fn owner(&self) -> VesselId {
        self.owner
    }

    /// Fixed position.
    pub fn position(&self) -> Cube {
        self.position
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind and payload.
    pub fn kind(&self) -> &PartKind {
        &self.kind
    }

    /// Capacity.
    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    /// Current value, always within `0..=max_value`.
    pub fn current_value(&self) -> i32 {
        self.current_value
    }

    /// Current state.
    pub fn state(&self) -> PartState {
        self.state
    }

    /// Whether the part still works.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Behavior names attached to this part.
    pub fn behaviors(&self) -> &[String] {
        &self.behaviors
    }

    /// Purpose, for defense parts.
    pub fn purpose(&self) -> Option<Purpose> {
        match self.kind {
            PartKind::Defense { purpose } => Some(purpose),
            _ => None,
        }
    }

    /// Whether this is a defense part able to attack.
    pub fn is_weapon(&self) -> bool {
        self.purpose().is_some_and(Purpose::is_offensive)
    }

    /// Number of listeners on one of this part's events.
    pub fn listener_count(&self, event: &str) -> usize {
        if event == FIRE {
            return self.fire.as_ref().map_or(0, |c| c.listener_count(FIRE));
        }
        self.channel.listener_count(event)
    }

    /// Candidate state for `operation` moving the value from `old_value`
    /// to the raw (unclamped) `target`.
    pub(crate) fn settle(&self, operation: Operation, old_value: i32, target: i32) -> PartState {
        let old = self.state;
        match operation {
            Operation::Damage if target == old_value => old,
            Operation::Damage if target < 0 => PartState::Destroyed,
            Operation::Damage if target == 0 => PartState::Offline,
            Operation::Damage if target < old_value => PartState::Damaged,
            Operation::Damage => old,
            Operation::Repair => {
                let v = target.min(self.max_value);
                if v == old_value {
                    old
                } else if v >= self.max_value {
                    PartState::Online
                } else if v > 0 {
                    PartState::Damaged
                } else {
                    old
                }
            }
            Operation::Define if target < 0 => PartState::Destroyed,
            Operation::Define if target == 0 => match old {
                PartState::Destroyed => PartState::Destroyed,
                _ => PartState::Offline,
            },
            Operation::Define if target >= self.max_value => match old {
                PartState::Offline | PartState::Destroyed => old,
                _ => PartState::Online,
            },
            Operation::Define => PartState::Damaged,
        }
    }
}
