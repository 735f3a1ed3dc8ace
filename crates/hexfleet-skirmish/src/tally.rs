//! Aggregated results over several runs.

use serde::Serialize;

use hexfleet_battle::{BattleSummary, Outcome};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TeamTally {
    pub name: String,
    pub victories: u32,
    pub defeats: u32,
}

/// Wins and losses per team plus turn statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub seed: u64,
    pub runs: u32,
    /// Runs where every team was out at the end.
    pub stalemates: u32,
    /// Runs stopped by the turn cap with several teams still standing.
    pub unfinished: u32,
    pub min_turns: u32,
    pub max_turns: u32,
    pub mean_turns: f64,
    pub teams: Vec<TeamTally>,
}

impl Tally {
    pub fn new(seed: u64, teams: impl IntoIterator<Item = String>) -> Self {
        Self {
            seed,
            teams: teams
                .into_iter()
                .map(|name| TeamTally {
                    name,
                    ..TeamTally::default()
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, summary: &BattleSummary) {
        let total = self.mean_turns * f64::from(self.runs) + f64::from(summary.turns);
        self.min_turns = if self.runs == 0 {
            summary.turns
        } else {
            self.min_turns.min(summary.turns)
        };
        self.max_turns = self.max_turns.max(summary.turns);
        self.runs += 1;
        self.mean_turns = total / f64::from(self.runs);

        let standing = summary
            .teams
            .iter()
            .filter(|t| t.result == Outcome::Victory)
            .count();
        match standing {
            0 => self.stalemates += 1,
            1 => {}
            _ => self.unfinished += 1,
        }
        for report in &summary.teams {
            if let Some(team) = self.teams.iter_mut().find(|t| t.name == report.name) {
                match report.result {
                    Outcome::Victory => team.victories += 1,
                    Outcome::Defeat => team.defeats += 1,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfleet_battle::TeamReport;

    fn summary(turns: u32, results: [Outcome; 2]) -> BattleSummary {
        BattleSummary {
            turns,
            teams: ["red", "blue"]
                .into_iter()
                .zip(results)
                .map(|(name, result)| TeamReport {
                    name: name.to_string(),
                    result,
                    vessels: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn counts_outcomes_and_turns() {
        let mut t = Tally::new(5, ["red".to_string(), "blue".to_string()]);
        t.record(&summary(4, [Outcome::Victory, Outcome::Defeat]));
        t.record(&summary(8, [Outcome::Defeat, Outcome::Defeat]));
        t.record(&summary(6, [Outcome::Victory, Outcome::Victory]));

        assert_eq!(t.runs, 3);
        assert_eq!((t.min_turns, t.max_turns), (4, 8));
        assert!((t.mean_turns - 6.0).abs() < 1e-9);
        assert_eq!((t.stalemates, t.unfinished), (1, 1));
        assert_eq!((t.teams[0].victories, t.teams[0].defeats), (2, 1));
        assert_eq!((t.teams[1].victories, t.teams[1].defeats), (1, 2));
    }
}
