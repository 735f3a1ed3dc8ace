//! Per-vessel strategies.

use std::cell::RefCell;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use hexfleet_core::PartId;
use hexfleet_vessel::KindTag;

use crate::attack::{Attack, Damage, Hit, TargetRef, WeaponRef};
use crate::error::BattleError;
use crate::team::{Member, Team};

/// Decisions a vessel makes each turn.
///
/// Every phase of a turn calls one method on every member's executor
/// concurrently, so implementations must not hold a vessel borrow across
/// an `.await`.
#[async_trait(?Send)]
pub trait Executor {
    /// Phase 1: whether `me` tries to dodge this turn.
    async fn escape_maneuver(&self, teams: &[Team], me: &Member) -> bool;

    /// Phase 2: the strikes `me` attempts this turn.
    async fn plan_attacks(&self, teams: &[Team], me: &Member) -> Vec<Attack>;

    /// Phase 3: apply a resolved strike to `target`, which this executor
    /// drives. Applies TOUCH damage to the aimed part and ignores misses.
    async fn apply_damage(&self, damage: &Damage, target: &Member) -> Result<(), BattleError> {
        if let Hit::Touch(value) = damage.hit {
            target
                .vessel_mut()
                .damage(damage.attack.target.part, value)?;
        }
        Ok(())
    }

    /// Phase 4: rebalance power. Does nothing by default.
    async fn redispatch_energy(&self, _teams: &[Team], _me: &Member) -> Result<(), BattleError> {
        Ok(())
    }
}

/// Placeholder AI picking everything at random.
///
/// Dodges on a coin flip, picks a random rival team that is still in the
/// fight and a random standing vessel on it, then fires every running
/// weapon at random running parts. Surplus energy is banked in phase 4.
#[derive(Debug)]
pub struct RandomExecutor {
    rng: RefCell<ChaCha8Rng>,
}

impl RandomExecutor {
    /// A strategy seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

#[async_trait(?Send)]
impl Executor for RandomExecutor {
    async fn escape_maneuver(&self, _teams: &[Team], _me: &Member) -> bool {
        self.rng.borrow_mut().random_bool(0.5)
    }

    async fn plan_attacks(&self, teams: &[Team], me: &Member) -> Vec<Attack> {
        let mut rng = self.rng.borrow_mut();
        let rivals: Vec<&Team> = teams
            .iter()
            .enumerate()
            .filter(|&(i, t)| i != me.id().team && !t.is_ko())
            .map(|(_, t)| t)
            .collect();
        let Some(team) = rivals.choose(&mut *rng) else {
            return Vec::new();
        };
        let standing: Vec<&Member> = team.members().iter().filter(|m| !m.is_ko()).collect();
        let Some(target) = standing.choose(&mut *rng) else {
            return Vec::new();
        };

        let aim: Vec<PartId> = target.vessel().running_parts().map(|p| p.id()).collect();
        let weapons: Vec<PartId> = me
            .vessel()
            .running_parts()
            .filter(|p| p.is_weapon())
            .map(|p| p.id())
            .collect();

        weapons
            .into_iter()
            .filter_map(|weapon| {
                aim.choose(&mut *rng).map(|&part| Attack {
                    attacker: me.crew.tactical,
                    source: WeaponRef {
                        member: me.id(),
                        weapon,
                    },
                    target: TargetRef {
                        member: target.id(),
                        part,
                    },
                })
            })
            .collect()
    }

    async fn redispatch_energy(&self, _teams: &[Team], me: &Member) -> Result<(), BattleError> {
        let (surplus, banks) = {
            let vessel = me.vessel();
            let banks: Vec<PartId> = vessel
                .parts_of_kind(KindTag::Energy)
                .filter(|p| p.is_running())
                .map(|p| p.id())
                .collect();
            (vessel.energy_balance().balance, banks)
        };
        if surplus <= 0 {
            return Ok(());
        }
        let mut left = surplus;
        let mut vessel = me.vessel_mut();
        for bank in banks {
            if left == 0 {
                break;
            }
            left -= vessel.store_energy(bank, left)?;
        }
        debug!(vessel = %vessel.name(), banked = surplus - left, "energy banked");
        Ok(())
    }
}
