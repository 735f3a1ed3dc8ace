//! Battle configuration and validation.

use std::error::Error;
use std::fmt;

use crate::roll::Roll;

/// Highest face of the die; a skill above it always succeeds.
pub const DIE_FACES: u32 = 20;

/// Settings for a [`BattleManager`](crate::BattleManager).
///
/// Checked by [`validate()`](BattleConfig::validate) when the manager is
/// built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleConfig {
    /// Seed of the dice source. Default: 0.
    pub seed: u64,
    /// Turns after which the loop gives up. `None` = no cap.
    /// Default: `Some(500)`.
    pub max_turns: Option<u32>,
    /// Roll used when none is given. Default: 2 dice, skill 10.
    pub default_roll: Roll,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_turns: Some(500),
            default_roll: Roll::new(2, 10),
        }
    }
}

impl BattleConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == Some(0) {
            return Err(ConfigError::ZeroTurnCap);
        }
        if self.default_roll.skill > DIE_FACES {
            return Err(ConfigError::SkillOutOfRange {
                skill: self.default_roll.skill,
            });
        }
        Ok(())
    }
}

/// Invalid [`BattleConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_turns` is `Some(0)`.
    ZeroTurnCap,
    /// The default roll's skill is above the die's faces.
    SkillOutOfRange {
        /// The offending skill.
        skill: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTurnCap => write!(f, "max_turns must be at least 1 when set"),
            Self::SkillOutOfRange { skill } => {
                write!(f, "default roll skill {skill} exceeds {DIE_FACES}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(BattleConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_turn_cap_rejected() {
        let cfg = BattleConfig {
            max_turns: Some(0),
            ..BattleConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTurnCap));
    }

    #[test]
    fn uncapped_is_valid() {
        let cfg = BattleConfig {
            max_turns: None,
            ..BattleConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn skill_above_die_rejected() {
        let cfg = BattleConfig {
            default_roll: Roll::new(2, 21),
            ..BattleConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SkillOutOfRange { skill: 21 })
        );
    }
}
