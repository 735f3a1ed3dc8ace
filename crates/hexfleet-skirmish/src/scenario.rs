//! Scenario files: a part catalogue, the teams to field and how often
//! to make them fight.

use std::error::Error;
use std::fmt;
use std::io;

use serde::Deserialize;

use hexfleet_battle::{BattleConfig, BattleError, Crew, Roll};
use hexfleet_vessel::{PartDesc, VesselClassDesc, VesselError};

/// Scenario bundled with the binary.
pub const DEFAULT_SCENARIO: &str = include_str!("../scenarios/default.json");

/// Overrides [`Scenario::seed`].
pub const SEED_VAR: &str = "HEXFLEET_SEED";
/// Overrides [`Scenario::runs`].
pub const RUNS_VAR: &str = "HEXFLEET_RUNS";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub parts: Vec<PartDesc>,
    pub teams: Vec<TeamEntry>,
    #[serde(default = "one")]
    pub runs: u32,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub max_turns: Option<u32>,
    /// Roll for crews left out of the file.
    #[serde(default)]
    pub default_roll: Option<Roll>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub vessels: Vec<VesselEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VesselEntry {
    pub class: VesselClassDesc,
    #[serde(default)]
    pub crew: Option<Crew>,
}

fn one() -> u32 {
    1
}

impl Scenario {
    /// Battle settings: the file's values over the defaults.
    pub fn config(&self) -> BattleConfig {
        let defaults = BattleConfig::default();
        BattleConfig {
            seed: self.seed,
            max_turns: self.max_turns.or(defaults.max_turns),
            default_roll: self.default_roll.unwrap_or(defaults.default_roll),
        }
    }

    pub fn parse(json: &str) -> Result<Self, SkirmishError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `HEXFLEET_SEED` / `HEXFLEET_RUNS` through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SkirmishError> {
        if let Some(value) = lookup(SEED_VAR) {
            self.seed = parse_var(SEED_VAR, &value)?;
        }
        if let Some(value) = lookup(RUNS_VAR) {
            self.runs = parse_var(RUNS_VAR, &value)?;
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, SkirmishError> {
    value.trim().parse().map_err(|_| SkirmishError::BadOverride {
        var,
        value: value.to_string(),
    })
}

// ── Errors ──────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SkirmishError {
    /// The scenario file could not be read.
    Io { path: String, source: io::Error },
    /// The scenario is not valid JSON for [`Scenario`].
    Parse(serde_json::Error),
    /// An environment override does not parse.
    BadOverride { var: &'static str, value: String },
    /// A part or class descriptor is unusable.
    Vessel(VesselError),
    /// The battle aborted.
    Battle(BattleError),
}

impl fmt::Display for SkirmishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read '{path}': {source}"),
            Self::Parse(e) => write!(f, "invalid scenario: {e}"),
            Self::BadOverride { var, value } => write!(f, "{var}={value} is not a number"),
            Self::Vessel(e) => write!(f, "{e}"),
            Self::Battle(e) => write!(f, "{e}"),
        }
    }
}

impl Error for SkirmishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Vessel(e) => Some(e),
            Self::Battle(e) => Some(e),
            Self::BadOverride { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SkirmishError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<VesselError> for SkirmishError {
    fn from(e: VesselError) -> Self {
        Self::Vessel(e)
    }
}

impl From<BattleError> for SkirmishError {
    fn from(e: BattleError) -> Self {
        Self::Battle(e)
    }
}
