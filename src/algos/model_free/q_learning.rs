use super::policy::Policy;
use crate::common::defs::*;
use crate::envs::{grid_maze::GridMazeEnvironment, state::State};
use crate::tables::q_table::QTable;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningParams {
    pub episodes: usize,
    pub learning_rate: Continous,
    pub discount: Continous,
    pub epsilon: Continous,
    /// Episodes not reaching an end state by then are cut short.
    pub max_steps_per_episode: usize,
    /// Episodes between progress logs, 0 disables them.
    pub report_interval: usize,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            episodes: 5000,
            learning_rate: 0.1,
            discount: 0.9,
            epsilon: 0.1,
            max_steps_per_episode: 10000,
            report_interval: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QLearningReport {
    pub q_table: QTable,
    pub episodes: usize,
    pub total_steps: usize,
    /// Number of episodes that ended on each end state.
    pub end_counts: BTreeMap<Position, usize>,
}

/// Tabular one step Q-learning.
///
/// `Q(s,a) <- (1 - alpha) * Q(s,a) + alpha * (r + gamma * max_a' Q(s',a'))`
pub fn q_learning(
    env: &GridMazeEnvironment,
    policy: &dyn Policy,
    params: &QLearningParams,
    rng: &mut dyn RngCore,
) -> QLearningReport {
    let alpha = params.learning_rate;
    let gamma = params.discount;
    let mut q_table = env.create_q_table_from_uniform(0.);
    let mut end_counts = BTreeMap::new();
    let mut total_steps = 0;
    let mut window_steps = 0;

    for episode in 1..=params.episodes {
        let mut state = env.reset();
        let mut steps = 0;
        while !state.is_end() && steps < params.max_steps_per_episode {
            let action = policy.select_action(rng, &q_table, state);
            let (reward, s_prime) = env.step(rng, state, action);

            let (row, col) = state.position();
            q_table[(row, col, action)] = (1. - alpha) * q_table[(row, col, action)]
                + alpha * (reward + gamma * q_table.max_value(s_prime));

            state = s_prime;
            steps += 1;
        }

        if state.is_end() {
            *end_counts.entry(state.position()).or_insert(0) += 1;
        }
        total_steps += steps;
        window_steps += steps;

        if params.report_interval > 0 && episode % params.report_interval == 0 {
            info!(
                "At episode: {episode}, average steps per episode: {}",
                window_steps as Continous / params.report_interval as Continous
            );
            window_steps = 0;
        }
    }

    info!(
        "Trained for: {} episodes, total steps: {total_steps}",
        params.episodes
    );
    QLearningReport {
        q_table,
        episodes: params.episodes,
        total_steps,
        end_counts,
    }
}

/// Cells visited from the start when always taking the first max action and
/// its most likely outcome. Stops at an end state or after `max_len` cells.
pub fn greedy_path(env: &GridMazeEnvironment, q_table: &QTable, max_len: usize) -> Vec<Position> {
    let mut state = env.reset();
    let mut path = vec![state.position()];
    while !state.is_end() && path.len() < max_len {
        state = most_likely_next(env, q_table, state);
        path.push(state.position());
    }

    path
}

fn most_likely_next<'a>(
    env: &'a GridMazeEnvironment,
    q_table: &QTable,
    state: &State,
) -> &'a State {
    let action = q_table[state.position()].max_action_values()[0].action;
    let transitions = env.probe_action_with_probabilities(state, action);
    let best = transitions
        .iter()
        .skip(1)
        .fold(transitions[0], |best, t| {
            if t.probability > best.probability {
                *t
            } else {
                best
            }
        });

    let (row, col) = best.next_state;
    env.state(row, col)
}

#[cfg(test)]
mod tests {
    use super::super::policy::*;
    use super::*;
    use crate::envs::{action::Action, state::*};
    use rand::prelude::*;

    fn corridor() -> GridMazeEnvironment {
        let mut env = GridMazeEnvironment::new(1, 4, -1., -1.);
        env.set(0, 0, State::start());
        env.set(0, 3, State::end().with_reward(10.));
        env
    }

    #[test]
    fn params_default_from_empty_json() {
        let params: QLearningParams = serde_json::from_str("{}").unwrap();

        assert_eq!(params, QLearningParams::default());
    }

    #[test]
    fn params_partial_json() {
        let params: QLearningParams =
            serde_json::from_str(r#"{"episodes": 10, "epsilon": 0.5}"#).unwrap();

        assert_eq!(params.episodes, 10);
        assert_eq!(params.epsilon, 0.5);
        assert_eq!(params.learning_rate, 0.1);
    }

    #[test]
    fn learns_to_walk_the_corridor() {
        let env = corridor();
        let params = QLearningParams {
            episodes: 300,
            report_interval: 0,
            ..Default::default()
        };
        let rng = &mut StdRng::seed_from_u64(42);

        let report = q_learning(&env, &EpsilonGreedy::new(0.1), &params, rng);

        assert_eq!(report.episodes, 300);
        assert_eq!(report.end_counts[&(0, 3)], 300);
        assert!(report.total_steps >= 900);
        assert!(report.q_table[(0, 3)].is_terminal());
        for col in 0..3 {
            let max = report.q_table[(0, col)].max_action_values();
            assert_eq!(max.len(), 1);
            assert_eq!(max[0].action, Action::Right);
        }
        assert_eq!(
            greedy_path(&env, &report.q_table, 10),
            vec![(0, 0), (0, 1), (0, 2), (0, 3)]
        );
    }

    #[test]
    fn step_cap_cuts_episodes_short() {
        let env = corridor();
        let params = QLearningParams {
            episodes: 5,
            max_steps_per_episode: 1,
            report_interval: 0,
            ..Default::default()
        };
        let rng = &mut StdRng::seed_from_u64(42);

        let report = q_learning(&env, &Greedy, &params, rng);

        assert_eq!(report.total_steps, 5);
        assert!(report.end_counts.is_empty());
    }

    #[test]
    fn greedy_path_is_capped() {
        let env = corridor();
        // Untrained, every action ties and Left comes first.
        let q = env.create_q_table_from_uniform(0.);

        assert_eq!(greedy_path(&env, &q, 3), vec![(0, 0), (0, 0), (0, 0)]);
    }
}
