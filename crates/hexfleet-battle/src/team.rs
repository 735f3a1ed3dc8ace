//! Teams, crews and roster members.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use serde::{Deserialize, Serialize};

use hexfleet_vessel::Vessel;

use crate::executor::Executor;
use crate::roll::Roll;

/// The three crew skills a vessel rolls with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crew {
    /// Escape maneuvers.
    pub pilot: Roll,
    /// Repairs and power.
    pub engineer: Roll,
    /// Weapons.
    pub tactical: Roll,
}

impl Crew {
    /// A crew rolling `roll` for every skill.
    pub fn uniform(roll: Roll) -> Self {
        Self {
            pilot: roll,
            engineer: roll,
            tactical: roll,
        }
    }
}

/// Roster slot: team index and member index within the team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId {
    /// Team index in the manager.
    pub team: usize,
    /// Member index in the team.
    pub index: usize,
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.team, self.index)
    }
}

/// A vessel about to join a team.
pub struct Recruit {
    /// The vessel.
    pub vessel: Vessel,
    /// Its crew.
    pub crew: Crew,
    /// Its strategy.
    pub executor: Box<dyn Executor>,
}

impl Recruit {
    /// Bundle a vessel with its crew and strategy.
    pub fn new(vessel: Vessel, crew: Crew, executor: impl Executor + 'static) -> Self {
        Self {
            vessel,
            crew,
            executor: Box::new(executor),
        }
    }
}

/// A crewed vessel on a team.
///
/// The vessel sits behind a `RefCell`: executors of every member read the
/// whole roster concurrently, and only the loop or the target's executor
/// mutates a vessel, one attack at a time.
pub struct Member {
    id: MemberId,
    vessel: RefCell<Vessel>,
    /// Crew skills.
    pub crew: Crew,
    executor: Box<dyn Executor>,
}

impl Member {
    pub(crate) fn new(id: MemberId, recruit: Recruit) -> Self {
        Self {
            id,
            vessel: RefCell::new(recruit.vessel),
            crew: recruit.crew,
            executor: recruit.executor,
        }
    }

    /// Roster slot.
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Borrow the vessel.
    pub fn vessel(&self) -> Ref<'_, Vessel> {
        self.vessel.borrow()
    }

    /// Borrow the vessel mutably. Do not hold across an `.await`.
    pub fn vessel_mut(&self) -> RefMut<'_, Vessel> {
        self.vessel.borrow_mut()
    }

    /// The member's strategy.
    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }

    /// Whether the vessel is out of the fight.
    pub fn is_ko(&self) -> bool {
        self.vessel.borrow().is_ko()
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("vessel", &self.vessel.borrow().name())
            .field("crew", &self.crew)
            .finish_non_exhaustive()
    }
}

/// A named group of members.
#[derive(Debug)]
pub struct Team {
    /// Team name.
    pub name: String,
    members: Vec<Member>,
}

impl Team {
    pub(crate) fn new(name: String, members: Vec<Member>) -> Self {
        Self { name, members }
    }

    /// Members in roster order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Member at `index`.
    pub fn member(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    /// Defeated iff every member is out of the fight.
    pub fn is_ko(&self) -> bool {
        self.members.iter().all(Member::is_ko)
    }
}

/// Look up a member across `teams`.
pub fn find_member(teams: &[Team], id: MemberId) -> Option<&Member> {
    teams.get(id.team).and_then(|t| t.member(id.index))
}
