use crate::algos::model_free::q_learning::QLearningParams;
use crate::common::defs::*;
use crate::envs::{grid_maze::GridMazeEnvironment, state::*};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub seed: u64,
    pub maze: MazeConfig,
    pub q_learning: QLearningParams,
    pub value_iteration: ValueIterationConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 2718,
            maze: Default::default(),
            q_learning: Default::default(),
            value_iteration: Default::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    pub gamma: Continous,
    pub iterations_max: usize,
    pub stop_on_convergence: bool,
    pub stop_on_percent_diff: Continous,
    pub debug: bool,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            iterations_max: 1000,
            stop_on_convergence: false,
            stop_on_percent_diff: 0.,
            debug: false,
        }
    }
}

/// A maze of `rows x cols` spaces, with some cells replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    pub reward_spaces: Continous,
    pub reward_bounce_back: Continous,
    pub cells: Vec<CellConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellConfig {
    pub row: usize,
    pub col: usize,
    pub kind: StateKind,
    /// Defaults to the preset reward of `kind`, or `reward_spaces` for spaces.
    #[serde(default)]
    pub reward: Option<Continous>,
    /// Replaces the preset jump list when non-empty.
    #[serde(default)]
    pub jumps: Vec<JumpProbability>,
}

impl CellConfig {
    pub fn new(row: usize, col: usize, kind: StateKind) -> Self {
        Self {
            row,
            col,
            kind,
            reward: None,
            jumps: vec![],
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        let slippery = vec![
            JumpProbability::new(JumpSpecification::Relative(1, 0), 0.5),
            JumpProbability::new(JumpSpecification::Welcome, 0.5),
        ];

        let mut cells = vec![
            CellConfig::new(5, 0, StateKind::Start),
            CellConfig {
                reward: Some(0.),
                ..CellConfig::new(5, 5, StateKind::End)
            },
        ];
        for col in 1..5 {
            cells.push(CellConfig {
                jumps: slippery.clone(),
                ..CellConfig::new(4, col, StateKind::Space)
            });
            cells.push(CellConfig::new(5, col, StateKind::Hole));
        }

        Self {
            rows: 6,
            cols: 6,
            reward_spaces: -1.,
            reward_bounce_back: -1.,
            cells,
        }
    }
}

impl MazeConfig {
    /// Replacement cells are placed first, jump lists are applied after, so
    /// the order of `cells` does not matter.
    pub fn build(&self) -> GridMazeEnvironment {
        let mut env = GridMazeEnvironment::new(
            self.rows,
            self.cols,
            self.reward_spaces,
            self.reward_bounce_back,
        );

        for cell in self.cells.iter() {
            let state = match cell.kind {
                StateKind::Space => State::space(self.reward_spaces),
                kind => State::of_kind(kind),
            };
            let state = match cell.reward {
                Some(reward) => state.with_reward(reward),
                None => state,
            };
            env.set(cell.row, cell.col, state);
        }

        for cell in self.cells.iter().filter(|c| !c.jumps.is_empty()) {
            env.set_jump_probabilities(cell.row, cell.col, cell.jumps.clone());
        }

        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertor::*;

    #[test]
    fn default_maze() {
        let env = MazeConfig::default().build();

        assert_eq!((env.row_count(), env.col_count()), (6, 6));
        assert_eq!(env.reset().position(), (5, 0));
        assert!(env.state(5, 5).is_end());
        assert_eq!(env.state(5, 5).reward(), 0.);
        let holes = env
            .states()
            .filter(|s| s.kind() == StateKind::Hole)
            .map(|s| s.position())
            .collect::<Vec<_>>();
        assert_that!(holes).contains_exactly(vec![(5, 1), (5, 2), (5, 3), (5, 4)]);
        assert!(!env.state(4, 2).is_100_percent_welcoming());
        assert!(env.state(4, 0).is_100_percent_welcoming());
    }

    #[test]
    fn empty_json_is_the_default() {
        let config = ExperimentConfig::from_json("{}").unwrap();

        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn json_round_trip_keeps_the_maze() {
        let config = ExperimentConfig::default();
        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(ExperimentConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn cells_from_json() {
        let config = ExperimentConfig::from_json(
            r#"{
                "seed": 1,
                "maze": {
                    "rows": 2,
                    "cols": 3,
                    "reward_spaces": -2,
                    "cells": [
                        { "row": 0, "col": 1, "kind": "Space", "jumps": [
                            { "js": { "Absolute": [1, 2] }, "p": 0.25 },
                            { "js": "Welcome", "p": 0.75 }
                        ] },
                        { "row": 0, "col": 0, "kind": "Start" },
                        { "row": 1, "col": 2, "kind": "End", "reward": 5 },
                        { "row": 1, "col": 1, "kind": "Wall" }
                    ]
                },
                "value_iteration": { "gamma": 0.5 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.seed, 1);
        assert_eq!(config.value_iteration.gamma, 0.5);
        assert_eq!(config.value_iteration.iterations_max, 1000);
        assert_eq!(config.q_learning, QLearningParams::default());

        let env = config.maze.build();
        assert_eq!(env.reward_bounce_back(), -1.);
        assert_eq!(env.state(0, 2).reward(), -2.);
        assert_eq!(env.state(0, 1).reward(), -2.);
        assert_eq!(env.state(1, 2).reward(), 5.);
        assert_eq!(env.state(1, 1).kind(), StateKind::Wall);
        assert_eq!(
            env.state(0, 1).jump_probabilities(),
            &[
                JumpProbability::new(JumpSpecification::Absolute(1, 2), 0.25),
                JumpProbability::new(JumpSpecification::Welcome, 0.75),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "don't sum to 1.0")]
    fn bad_jumps_fail_on_build() {
        let mut maze = MazeConfig::default();
        maze.cells[2].jumps[0].p = 0.4;

        maze.build();
    }

    #[test]
    fn missing_file() {
        assert!(ExperimentConfig::load("/nonexistent/gridmaze.json").is_err());
    }
}
