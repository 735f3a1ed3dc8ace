//! The battle loop.

use std::cell::RefCell;
use std::collections::HashMap;

use futures::channel::oneshot;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use hexfleet_core::{Event, Flow};
use hexfleet_vessel::BehaviorRegistry;

use crate::attack::{classify, Attack, Damage, Hit};
use crate::config::BattleConfig;
use crate::error::BattleError;
use crate::lifecycle::{
    Acknowledger, LifecycleChannel, LifecycleEvent, ATTACK, END, LIFECYCLE_EVENTS, TURN,
};
use crate::roll::{roll, DiceSource, Roll, SeededDice};
use crate::stop::{FewerThanTwoTeams, StopCondition};
use crate::team::{find_member, Member, MemberId, Recruit, Team};

// ── Summary ─────────────────────────────────────────────────────

/// Final result of a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// At least one vessel is still in the fight.
    Victory,
    /// Every vessel is out.
    Defeat,
}

/// Final state of one vessel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VesselReport {
    /// Vessel name.
    pub name: String,
    /// Whether it ended out of the fight.
    pub defeated: bool,
}

/// Final state of one team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeamReport {
    /// Team name.
    pub name: String,
    /// Outcome.
    pub result: Outcome,
    /// Its vessels, in roster order.
    pub vessels: Vec<VesselReport>,
}

/// What [`BattleManager::run`] returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BattleSummary {
    /// Turns played.
    pub turns: u32,
    /// Per-team results, in roster order.
    pub teams: Vec<TeamReport>,
}

impl BattleSummary {
    /// Outcome of the team named `team`.
    pub fn result(&self, team: &str) -> Option<Outcome> {
        self.teams.iter().find(|t| t.name == team).map(|t| t.result)
    }
}

// ── Manager ─────────────────────────────────────────────────────

/// Runs battles between teams.
///
/// Each turn: broadcast `turn`, then
/// 1. gather escape intents from every executor and roll pilots for
///    those who dodge,
/// 2. gather attack plans from every executor,
/// 3. resolve the attacks one by one (roll, classify, fire, broadcast
///    `attack`, apply through the target's executor, wait for the ack),
/// 4. let every executor redispatch energy.
///
/// Phases 1, 2 and 4 fan out over every member and are joined before
/// the next phase starts.
pub struct BattleManager {
    config: BattleConfig,
    registry: BehaviorRegistry,
    teams: Vec<Team>,
    lifecycle: LifecycleChannel,
    dice: RefCell<Box<dyn DiceSource>>,
    hulls: u32,
}

impl BattleManager {
    /// A manager with no teams, rolling ChaCha8 dice seeded from `config`.
    pub fn new(config: BattleConfig, registry: BehaviorRegistry) -> Result<Self, BattleError> {
        config.validate()?;
        let dice: Box<dyn DiceSource> = Box::new(SeededDice::new(config.seed));
        Ok(Self {
            config,
            registry,
            teams: Vec::new(),
            lifecycle: LifecycleChannel::new(&LIFECYCLE_EVENTS),
            dice: RefCell::new(dice),
            hulls: 0,
        })
    }

    /// Replace the dice source.
    pub fn with_dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = RefCell::new(Box::new(dice));
        self
    }

    /// The validated configuration.
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Teams in roster order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Team named `name`.
    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Member at `id`.
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        find_member(&self.teams, id)
    }

    /// Add a team. Unnamed vessels are named `{class}-{designation}#{n}`.
    ///
    /// Returns the team index.
    pub fn create_and_add_team(
        &mut self,
        name: impl Into<String>,
        recruits: impl IntoIterator<Item = Recruit>,
    ) -> usize {
        let team = self.teams.len();
        let mut members = Vec::new();
        for (index, mut recruit) in recruits.into_iter().enumerate() {
            let info = &mut recruit.vessel.info;
            if info.name.is_empty() {
                info.name = format!("{}-{}#{}", info.class, info.designation, self.hulls);
                self.hulls += 1;
            }
            members.push(Member::new(MemberId { team, index }, recruit));
        }
        self.teams.push(Team::new(name.into(), members));
        team
    }

    /// Subscribe to a lifecycle event (`turn`, `attack` or `end`).
    ///
    /// The loop waits after each such event until a listener consumes
    /// the acknowledger it was handed.
    pub fn on<F>(&mut self, event: &str, listener: F) -> Result<(), BattleError>
    where
        F: Fn(&mut Event<LifecycleEvent>, &mut Acknowledger) -> Result<Flow, BattleError> + 'static,
    {
        self.lifecycle.on(event, listener)?;
        Ok(())
    }

    /// Roll `spec` with the manager's dice.
    pub fn roll(&self, spec: &Roll) -> u32 {
        roll(spec, &mut **self.dice.borrow_mut())
    }

    /// Roll the configured default spec.
    pub fn roll_default(&self) -> u32 {
        self.roll(&self.config.default_roll)
    }

    /// Restore every vessel, e.g. between two runs.
    pub fn repair_all(&self) {
        for member in self.members() {
            member.vessel_mut().repair_all();
        }
    }

    fn members(&self) -> impl Iterator<Item = &Member> + '_ {
        self.teams.iter().flat_map(|t| t.members().iter())
    }

    /// Run until fewer than two teams are still in the fight.
    pub async fn run(&self) -> Result<BattleSummary, BattleError> {
        self.run_until(&FewerThanTwoTeams).await
    }

    /// Run until `stop` says so or the turn cap is reached.
    ///
    /// [`BattleConfig::max_turns`] bounds every run, custom stop conditions
    /// included; the default config stops after 500 turns with a warning.
    /// Set it to `None` to let `stop` alone decide.
    pub async fn run_until(&self, stop: &dyn StopCondition) -> Result<BattleSummary, BattleError> {
        for member in self.members() {
            member
                .vessel_mut()
                .install_all_behaviors(&self.registry)?;
        }

        let mut turn = 0;
        loop {
            if stop.should_stop(turn, &self.teams).await {
                break;
            }
            if let Some(cap) = self.config.max_turns {
                if turn >= cap {
                    warn!(turn, "turn cap reached, ending battle");
                    break;
                }
            }
            info!(turn, "turn");
            self.announce(TURN, LifecycleEvent::Turn { turn }).await?;

            let maneuvers = self.escape_phase().await;
            let attacks = self.plan_phase().await;
            for attack in attacks {
                self.resolve(turn, attack, &maneuvers).await?;
            }
            self.redispatch_phase().await?;
            turn += 1;
        }

        let summary = self.summary(turn);
        for team in &summary.teams {
            info!(team = %team.name, result = ?team.result, "battle over");
            for vessel in &team.vessels {
                info!(vessel = %vessel.name, defeated = vessel.defeated, "vessel");
            }
        }
        self.announce(END, LifecycleEvent::End(summary.clone()))
            .await?;
        Ok(summary)
    }

    // ── Phases ──────────────────────────────────────────────────

    async fn escape_phase(&self) -> HashMap<MemberId, u32> {
        let members: Vec<&Member> = self.members().collect();
        let intents = join_all(
            members
                .iter()
                .map(|m| m.executor().escape_maneuver(&self.teams, m)),
        )
        .await;
        // Pilots roll in roster order so a seed replays the same battle.
        members
            .iter()
            .zip(intents)
            .map(|(m, escape)| {
                let maneuver = if escape { self.roll(&m.crew.pilot) } else { 0 };
                (m.id(), maneuver)
            })
            .collect()
    }

    async fn plan_phase(&self) -> Vec<Attack> {
        join_all(
            self.members()
                .map(|m| m.executor().plan_attacks(&self.teams, m)),
        )
        .await
        .into_iter()
        .flatten()
        .collect()
    }

    async fn resolve(
        &self,
        turn: u32,
        attack: Attack,
        maneuvers: &HashMap<MemberId, u32>,
    ) -> Result<(), BattleError> {
        let source = self.find(attack.source.member)?;
        let target = self.find(attack.target.member)?;
        let power = self.roll(&attack.attacker);
        let maneuver = maneuvers.get(&target.id()).copied().unwrap_or(0);
        let hit = match classify(power, maneuver) {
            Some(hit) => hit,
            None => Hit::Touch(
                source
                    .vessel_mut()
                    .fire(attack.source.weapon, false)?,
            ),
        };
        let damage = Damage { attack, power, hit };
        info!(
            turn,
            attacker = %source.vessel().name(),
            target = %target.vessel().name(),
            power,
            maneuver,
            %hit,
            "attack"
        );

        let pending = self.broadcast(ATTACK, LifecycleEvent::Attack { turn, damage })?;
        target.executor().apply_damage(&damage, target).await?;
        Self::acknowledged(ATTACK, pending).await
    }

    async fn redispatch_phase(&self) -> Result<(), BattleError> {
        join_all(
            self.members()
                .map(|m| m.executor().redispatch_energy(&self.teams, m)),
        )
        .await
        .into_iter()
        .collect()
    }

    fn find(&self, member: MemberId) -> Result<&Member, BattleError> {
        self.member(member)
            .ok_or(BattleError::UnknownMember { member })
    }

    fn summary(&self, turns: u32) -> BattleSummary {
        let teams = self
            .teams
            .iter()
            .map(|team| TeamReport {
                name: team.name.clone(),
                result: if team.is_ko() {
                    Outcome::Defeat
                } else {
                    Outcome::Victory
                },
                vessels: team
                    .members()
                    .iter()
                    .map(|m| VesselReport {
                        name: m.vessel().name().to_string(),
                        defeated: m.is_ko(),
                    })
                    .collect(),
            })
            .collect();
        BattleSummary { turns, teams }
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Deliver `event` and return the receiver to wait on, if anyone listens.
    fn broadcast(
        &self,
        name: &'static str,
        event: LifecycleEvent,
    ) -> Result<Option<oneshot::Receiver<()>>, BattleError> {
        let listeners = self.lifecycle.listeners(name)?;
        if listeners.is_empty() {
            return Ok(None);
        }
        let (mut ack, rx) = Acknowledger::pair();
        let mut event = self.lifecycle.event(name, event)?;
        listeners.dispatch(&mut event, &mut ack)?;
        Ok(Some(rx))
    }

    async fn acknowledged(
        name: &'static str,
        pending: Option<oneshot::Receiver<()>>,
    ) -> Result<(), BattleError> {
        match pending {
            Some(rx) => rx
                .await
                .map_err(|_| BattleError::AcknowledgementDropped { event: name }),
            None => Ok(()),
        }
    }

    async fn announce(&self, name: &'static str, event: LifecycleEvent) -> Result<(), BattleError> {
        let pending = self.broadcast(name, event)?;
        Self::acknowledged(name, pending).await
    }
}

impl std::fmt::Debug for BattleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleManager")
            .field("config", &self.config)
            .field("teams", &self.teams)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
