//! Dice-pool skill checks.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::DIE_FACES;

/// A crew skill: roll `attribute` d20 against `skill`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roll {
    /// Number of dice.
    pub attribute: u32,
    /// Success threshold.
    pub skill: u32,
}

impl Roll {
    /// Build a roll spec.
    pub fn new(attribute: u32, skill: u32) -> Self {
        Self { attribute, skill }
    }
}

/// Source of d20 draws.
pub trait DiceSource {
    /// One draw in `1..=20`.
    fn d20(&mut self) -> u32;
}

/// ChaCha8-backed dice, reproducible from a seed.
#[derive(Clone, Debug)]
pub struct SeededDice(ChaCha8Rng);

impl SeededDice {
    /// Dice seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl DiceSource for SeededDice {
    fn d20(&mut self) -> u32 {
        self.0.random_range(1..=DIE_FACES)
    }
}

/// Dice replaying a fixed sequence, cycling when it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    script: VecDeque<u32>,
}

impl ScriptedDice {
    /// Dice replaying `draws`. An empty script always rolls 20.
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: draws.into_iter().collect(),
        }
    }
}

impl DiceSource for ScriptedDice {
    fn d20(&mut self) -> u32 {
        match self.script.pop_front() {
            Some(draw) => {
                self.script.push_back(draw);
                draw
            }
            None => DIE_FACES,
        }
    }
}

/// Count successes of `spec`.
///
/// A 1 counts two successes, a 20 takes two away, any other draw at or
/// under the skill counts one. The total never goes below zero.
pub fn roll(spec: &Roll, dice: &mut dyn DiceSource) -> u32 {
    let mut successes: i64 = 0;
    for _ in 0..spec.attribute {
        successes += match dice.d20() {
            1 => 2,
            DIE_FACES => -2,
            draw if draw <= spec.skill => 1,
            _ => 0,
        };
    }
    successes.max(0) as u32
}
