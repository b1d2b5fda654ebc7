use crate::common::defs::*;
use crate::envs::{action::Action, state::State};
use crate::tables::q_table::QTable;
use rand::{seq::SliceRandom, Rng, RngCore};

/// Behaviour policy used while learning a Q table.
pub trait Policy {
    fn select_action(&self, rng: &mut dyn RngCore, q_table: &QTable, state: &State) -> Action;
}

/// A random action among the max valued ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Policy for Greedy {
    fn select_action(&self, rng: &mut dyn RngCore, q_table: &QTable, state: &State) -> Action {
        random_max_action(rng, q_table, state)
    }
}

/// Greedy with probability `1 - epsilon`, otherwise a random non-max action.
#[derive(Debug, Clone, Copy)]
pub struct EpsilonGreedy {
    pub epsilon: Continous,
}

impl EpsilonGreedy {
    pub fn new(epsilon: Continous) -> Self {
        assert!(
            (0. ..=1.).contains(&epsilon),
            "Epsilon must be within [0, 1], got: {epsilon}"
        );
        Self { epsilon }
    }
}

impl Policy for EpsilonGreedy {
    fn select_action(&self, rng: &mut dyn RngCore, q_table: &QTable, state: &State) -> Action {
        let max_actions = max_actions(q_table, state);
        let is_greedy = rng.gen::<Continous>() >= self.epsilon;
        if is_greedy || max_actions.len() == Action::ALL.len() {
            return pick(rng, &max_actions);
        }

        let others = Action::ALL
            .into_iter()
            .filter(|a| !max_actions.contains(a))
            .collect::<Vec<_>>();
        pick(rng, &others)
    }
}

fn random_max_action(rng: &mut dyn RngCore, q_table: &QTable, state: &State) -> Action {
    pick(rng, &max_actions(q_table, state))
}

fn pick(rng: &mut dyn RngCore, actions: &[Action]) -> Action {
    *actions
        .choose(rng)
        .unwrap_or_else(|| panic!("Cannot pick an action from an empty list"))
}

fn max_actions(q_table: &QTable, state: &State) -> Vec<Action> {
    let max_actions = q_table
        .max_action_values(state, None)
        .into_iter()
        .map(|av| av.action)
        .collect::<Vec<_>>();
    assert!(
        !max_actions.is_empty(),
        "Cannot select an action in state {:?}, it has no action values",
        state.position()
    );

    max_actions
}
