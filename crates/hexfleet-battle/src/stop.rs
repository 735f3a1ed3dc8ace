//! When a battle ends.

use async_trait::async_trait;

use crate::team::Team;

/// Decides, before each turn, whether the battle is over.
#[async_trait(?Send)]
pub trait StopCondition {
    /// `true` ends the battle before turn `turn` starts.
    async fn should_stop(&self, turn: u32, teams: &[Team]) -> bool;
}

/// Ends the battle once fewer than two teams are still in the fight.
#[derive(Clone, Copy, Debug, Default)]
pub struct FewerThanTwoTeams;

#[async_trait(?Send)]
impl StopCondition for FewerThanTwoTeams {
    async fn should_stop(&self, _turn: u32, teams: &[Team]) -> bool {
        teams.iter().filter(|t| !t.is_ko()).count() < 2
    }
}

/// Adapts a plain predicate into a [`StopCondition`].
pub struct StopWhen<F>(pub F);

#[async_trait(?Send)]
impl<F> StopCondition for StopWhen<F>
where
    F: Fn(u32, &[Team]) -> bool,
{
    async fn should_stop(&self, turn: u32, teams: &[Team]) -> bool {
        (self.0)(turn, teams)
    }
}
