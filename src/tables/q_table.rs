use crate::common::{defs::*, math::softmax};
use crate::envs::{action::Action, state::State};
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::BTreeSet;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionValue {
    pub action: Action,
    pub value: Continous,
}

impl ActionValue {
    pub fn new(action: Action, value: Continous) -> Self {
        Self { action, value }
    }
}

/// Values of the actions available in a cell. Empty means a terminal state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionValueList {
    action_values: Vec<ActionValue>,
}

impl ActionValueList {
    pub fn new(action_values: Vec<ActionValue>) -> Self {
        Self { action_values }
    }

    pub fn terminal() -> Self {
        Self::default()
    }

    /// Values given in [`Action::ALL`] order.
    pub fn from_values(values: [Continous; 4]) -> Self {
        Self::new(
            Action::ALL
                .iter()
                .zip(values)
                .map(|(&a, v)| ActionValue::new(a, v))
                .collect(),
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.action_values.is_empty()
    }

    pub fn action_values(&self) -> &[ActionValue] {
        &self.action_values
    }

    pub fn actions(&self) -> BTreeSet<Action> {
        self.action_values.iter().map(|av| av.action).collect()
    }

    pub fn get(&self, action: Action) -> Option<&ActionValue> {
        self.action_values.iter().find(|av| av.action == action)
    }

    pub fn max_value(&self) -> Continous {
        assert!(
            !self.is_terminal(),
            "Operation not supported for terminal states"
        );
        self.action_values
            .iter()
            .map(|av| av.value)
            .fold(Continous::NEG_INFINITY, Continous::max)
    }

    /// All action values equal to the max, ties kept, in stored order.
    pub fn max_action_values(&self) -> Vec<ActionValue> {
        let max = self.max_value();
        let max_action_values = self
            .action_values
            .iter()
            .filter(|av| av.value == max)
            .copied()
            .collect::<Vec<_>>();
        assert!(
            !max_action_values.is_empty(),
            "No max action value in {:?}",
            self.action_values
        );

        max_action_values
    }

    /// Same set of actions present, values ignored.
    pub fn is_action_equivalent(&self, other: &ActionValueList) -> bool {
        self.actions() == other.actions()
    }

    /// Softmax of the 4 action values.
    pub fn normalize_to_probability_distribution(&self) -> Self {
        if self.is_terminal() {
            return Self::terminal();
        }

        let values = Action::ALL.map(|a| self[a]);
        let p = softmax(&values);
        Self::from_values([p[0], p[1], p[2], p[3]])
    }

    /// Keep the actions with the max value. With a `tie_breaker` exactly one of
    /// them is kept, picked uniformly. With `adjust_probability_to_1` the kept
    /// values are rewritten to form a uniform distribution.
    pub fn reduce_to_max(
        &self,
        tie_breaker: Option<&mut dyn RngCore>,
        adjust_probability_to_1: bool,
    ) -> Self {
        if self.is_terminal() {
            return Self::terminal();
        }

        let mut kept = self.max_action_values();
        if let Some(rng) = tie_breaker {
            kept = kept.choose(rng).into_iter().copied().collect();
        }

        if adjust_probability_to_1 {
            let part = 1. / kept.len() as Continous;
            kept.iter_mut().for_each(|av| av.value = part);
        }

        Self::new(kept)
    }
}

impl Index<Action> for ActionValueList {
    type Output = Continous;

    fn index(&self, action: Action) -> &Self::Output {
        assert!(
            !self.is_terminal(),
            "Operation not supported for terminal states"
        );
        &self
            .get(action)
            .unwrap_or_else(|| panic!("Action {action:?} is not in {:?}", self.action_values))
            .value
    }
}

impl IndexMut<Action> for ActionValueList {
    fn index_mut(&mut self, action: Action) -> &mut Self::Output {
        assert!(
            !self.is_terminal(),
            "Operation not supported for terminal states"
        );
        match self.action_values.iter_mut().find(|av| av.action == action) {
            Some(av) => &mut av.value,
            None => panic!("Action {action:?} is not in the action value list"),
        }
    }
}

/// Action values, one [`ActionValueList`] per cell of the maze.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    table: Array2<ActionValueList>,
}

impl QTable {
    /// All cells terminal.
    pub fn new(row_count: usize, col_count: usize) -> Self {
        Self {
            table: Array2::from_elem((row_count, col_count), ActionValueList::terminal()),
        }
    }

    pub fn from_shape_fn<F>(row_count: usize, col_count: usize, f: F) -> Self
    where
        F: FnMut(Position) -> ActionValueList,
    {
        Self {
            table: Array2::from_shape_fn((row_count, col_count), f),
        }
    }

    pub fn row_count(&self) -> usize {
        self.table.nrows()
    }

    pub fn col_count(&self) -> usize {
        self.table.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.table.dim()
    }

    pub fn indexed_iter(&self) -> impl Iterator<Item = (Position, &ActionValueList)> + '_ {
        self.table.indexed_iter()
    }

    pub fn max_value(&self, state: &State) -> Continous {
        if !state.is_visitable() {
            return 0.;
        }

        self[state.position()].max_value()
    }

    /// The actions with the max value at `state`, ties kept unless a
    /// `tie_breaker` is given.
    pub fn max_action_values(
        &self,
        state: &State,
        tie_breaker: Option<&mut dyn RngCore>,
    ) -> Vec<ActionValue> {
        if !state.is_visitable() {
            return vec![];
        }

        let mut max_action_values = self[state.position()].max_action_values();
        if let Some(rng) = tie_breaker {
            max_action_values = max_action_values
                .choose(rng)
                .into_iter()
                .copied()
                .collect();
        }

        max_action_values
    }

    pub fn is_action_equivalent(&self, other: &QTable) -> bool {
        if self.dim() != other.dim() {
            return false;
        }

        self.table
            .iter()
            .zip(other.table.iter())
            .all(|(avl1, avl2)| avl1.is_action_equivalent(avl2))
    }

    pub fn normalize_to_probability_distribution(&self) -> QTable {
        Self {
            table: self
                .table
                .map(ActionValueList::normalize_to_probability_distribution),
        }
    }

    /// Greedy view of the table, see [`ActionValueList::reduce_to_max`].
    pub fn reduce_to_max_table(
        &self,
        mut tie_breaker: Option<&mut dyn RngCore>,
        adjust_probability_to_1: bool,
    ) -> QTable {
        let mut table = self.table.clone();
        for avl in table.iter_mut() {
            let tie_breaker = tie_breaker
                .as_mut()
                .map(|rng| &mut **rng as &mut dyn RngCore);
            *avl = avl.reduce_to_max(tie_breaker, adjust_probability_to_1);
        }

        Self { table }
    }
}

impl Index<(usize, usize)> for QTable {
    type Output = ActionValueList;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.table[[row, col]]
    }
}

impl IndexMut<(usize, usize)> for QTable {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.table[[row, col]]
    }
}

impl Index<(usize, usize, Action)> for QTable {
    type Output = Continous;

    fn index(&self, (row, col, action): (usize, usize, Action)) -> &Self::Output {
        &self.table[[row, col]][action]
    }
}

impl IndexMut<(usize, usize, Action)> for QTable {
    fn index_mut(&mut self, (row, col, action): (usize, usize, Action)) -> &mut Self::Output {
        &mut self.table[[row, col]][action]
    }
}
