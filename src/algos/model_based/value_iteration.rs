use crate::algos::stop_condition::StopTrainingCondition;
use crate::common::defs::*;
use crate::envs::{action::Action, grid_maze::GridMazeEnvironment, state::State};
use crate::tables::{q_table::QTable, v_table::VTable};
use tracing::info;

/// Synchronous value iteration over the full model of the maze.
///
/// Ref: Sutton & Barto 2018, section 4.4.
#[derive(Debug, Clone)]
pub struct ValueIteration<'a> {
    env: &'a GridMazeEnvironment,
    gamma: Continous,
    v_table: VTable,
}

impl<'a> ValueIteration<'a> {
    pub fn new(env: &'a GridMazeEnvironment, gamma: Continous) -> Self {
        assert!(
            (0. ..=1.).contains(&gamma),
            "Discount must be within [0, 1], got: {gamma}"
        );

        Self {
            env,
            gamma,
            v_table: VTable::new(env.row_count(), env.col_count()),
        }
    }

    /// One Bellman optimality backup of every visitable state, computed from
    /// the previous V table only. Non-visitable states stay at 0.
    pub fn sweep(&mut self) -> &VTable {
        let mut v_table = VTable::new(self.env.row_count(), self.env.col_count());
        for s in self.env.states().filter(|s| s.is_visitable()) {
            v_table[s.position()] = Action::ALL
                .into_iter()
                .map(|a| self.q_star(s, a))
                .fold(Continous::NEG_INFINITY, Continous::max);
        }

        self.v_table = v_table;
        &self.v_table
    }

    /// Sweeps until `stop` reports done. Returns the number of sweeps run.
    pub fn exec(&mut self, stop: &mut StopTrainingCondition) -> usize {
        stop.reset();
        loop {
            self.sweep();
            if stop.report_iteration(&self.v_table) {
                break;
            }
        }

        info!(
            "Value iteration: {} sweeps. {}",
            stop.iteration_count(),
            stop.termination_str()
        );
        stop.iteration_count()
    }

    pub fn v_table(&self) -> &VTable {
        &self.v_table
    }

    pub fn v_star(&self, state: &State) -> Continous {
        self.v_table[state.position()]
    }

    /// Expected return of taking `action` in `state`, then following the
    /// current V table.
    pub fn q_star(&self, state: &State, action: Action) -> Continous {
        self.env
            .probe_action_with_probabilities(state, action)
            .iter()
            .map(|t| t.probability * (t.reward + self.gamma * self.v_table[t.next_state]))
            .sum()
    }

    /// One step deterministic lookahead of the current V table.
    pub fn q_table(&self) -> QTable {
        self.env.create_q_table_from_v_table(&self.v_table)
    }

    /// All actions maximizing [`Self::q_star`], ties kept. Empty for
    /// non-visitable states.
    pub fn pi_star(&self, state: &State) -> Vec<Action> {
        if !state.is_visitable() {
            return vec![];
        }

        let q = Action::ALL.map(|a| self.q_star(state, a));
        let max = q.iter().copied().fold(Continous::NEG_INFINITY, Continous::max);
        Action::ALL
            .into_iter()
            .zip(q)
            .filter(|&(_, v)| v == max)
            .map(|(a, _)| a)
            .collect()
    }
}
