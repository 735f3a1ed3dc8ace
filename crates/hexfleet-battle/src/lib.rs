//! Turn-based battle orchestration for hexfleet.
//!
//! A [`BattleManager`] holds [`Team`]s of crewed vessels, each driven by
//! an [`Executor`] strategy. Every turn runs four phases (escape
//! maneuvers, attack planning, attack resolution, energy redispatch);
//! each phase fans out over every vessel and is joined before the next.
//!
//! The loop is paced from outside: `turn`, `attack` and `end` lifecycle
//! events suspend the loop until a listener consumes their
//! [`Acknowledger`].
//!
//! Dice come from an injected [`DiceSource`], so a battle is fully
//! reproducible from its [`BattleConfig::seed`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attack;
pub mod config;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod manager;
pub mod roll;
pub mod stop;
pub mod team;

pub use attack::{classify, Attack, Damage, Hit, TargetRef, WeaponRef};
pub use config::{BattleConfig, ConfigError};
pub use error::BattleError;
pub use executor::{Executor, RandomExecutor};
pub use lifecycle::{
    Acknowledger, LifecycleChannel, LifecycleEvent, ATTACK, END, LIFECYCLE_EVENTS, TURN,
};
pub use manager::{BattleManager, BattleSummary, Outcome, TeamReport, VesselReport};
pub use roll::{roll, DiceSource, Roll, ScriptedDice, SeededDice};
pub use stop::{FewerThanTwoTeams, StopCondition, StopWhen};
pub use team::{find_member, Crew, Member, MemberId, Recruit, Team};
