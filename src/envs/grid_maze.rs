use super::{action::Action, state::*};
use crate::common::{defs::*, sampling::*};
use crate::tables::{q_table::*, v_table::VTable};
use ndarray::Array2;
use rand::Rng;

/// One possible outcome of taking an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub probability: Continous,
    pub reward: Continous,
    pub next_state: Position,
    pub done: bool,
}

impl Weighted<(Continous, Position)> for Transition {
    fn s(&self) -> (Continous, Position) {
        (self.reward, self.next_state)
    }

    fn p(&self) -> Continous {
        self.probability
    }
}

/// Grid maze MDP. States are owned by the grid, indexed by (row, col).
#[derive(Debug, Clone)]
pub struct GridMazeEnvironment {
    maze: Array2<State>,
    /// E.g. taking Left from (0,0) gives S',R = (0,0),reward_bounce_back.
    reward_bounce_back: Continous,
}

impl GridMazeEnvironment {
    pub fn new(
        row_count: usize,
        col_count: usize,
        reward_spaces: Continous,
        reward_bounce_back: Continous,
    ) -> Self {
        assert!(row_count > 0, "Maze must have at least 1 row");
        assert!(col_count > 0, "Maze must have at least 1 column");

        let maze = Array2::from_shape_fn((row_count, col_count), |(row, col)| {
            let mut state = State::space(reward_spaces);
            state.place(row, col);
            state
        });

        Self {
            maze,
            reward_bounce_back,
        }
    }

    /// Build a maze from explicit rows of states.
    pub fn from_rows(rows: Vec<Vec<State>>, reward_bounce_back: Continous) -> Self {
        assert!(!rows.is_empty(), "Maze must have at least 1 row");
        let col_count = rows[0].len();
        assert!(col_count > 0, "Maze must have at least 1 column");
        for row in rows.iter() {
            assert!(
                row.len() == col_count,
                "All rows in maze must be of size {col_count}"
            );
        }

        let row_count = rows.len();
        let states = rows
            .into_iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.into_iter().enumerate().map(move |(c, mut state)| {
                    state.place(r, c);
                    state
                })
            })
            .collect::<Vec<_>>();
        let maze = Array2::from_shape_vec((row_count, col_count), states)
            .unwrap_or_else(|e| panic!("Cannot shape maze as {row_count}x{col_count}: {e}"));

        Self {
            maze,
            reward_bounce_back,
        }
    }

    pub fn row_count(&self) -> usize {
        self.maze.nrows()
    }

    pub fn col_count(&self) -> usize {
        self.maze.ncols()
    }

    pub fn reward_bounce_back(&self) -> Continous {
        self.reward_bounce_back
    }

    pub fn state(&self, row: usize, col: usize) -> &State {
        self.check_bounds(row, col);
        &self.maze[[row, col]]
    }

    /// Replace the state at (row, col).
    pub fn set(&mut self, row: usize, col: usize, mut state: State) {
        self.check_bounds(row, col);
        state.place(row, col);
        self.maze[[row, col]] = state;
    }

    pub fn set_jump_probabilities(
        &mut self,
        row: usize,
        col: usize,
        jump_probabilities: Vec<JumpProbability>,
    ) {
        self.check_bounds(row, col);
        self.maze[[row, col]].set_jump_probabilities(jump_probabilities);
    }

    /// States in row-major order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.maze.iter()
    }

    pub fn reset(&self) -> &State {
        let starts = self.states().filter(|s| s.is_start()).collect::<Vec<_>>();
        assert!(
            starts.len() == 1,
            "Need 1, but also only supports 1 start state, found: {}",
            starts.len()
        );

        let state = starts[0];
        assert!(
            state.is_visitable(),
            "Cannot return a non-visitable state from reset() @ {:?}",
            state.position()
        );
        state
    }

    pub fn step<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &State,
        action: Action,
    ) -> (Continous, &State) {
        let transitions = self.probe_action_with_probabilities(state, action);
        let (reward, (row, col)) = pick_next(rng, &transitions[..]);

        (reward, self.state(row, col))
    }

    /// All outcomes of taking `action` from `from_state`, probabilities summing to 1.
    pub fn probe_action_with_probabilities(
        &self,
        from_state: &State,
        action: Action,
    ) -> Vec<Transition> {
        let (row, col) = from_state.position();
        let from_state = self.state(row, col);
        assert!(
            from_state.is_visitable(),
            "Cannot probe_action_with_probabilities from non-visitable state @ ({row},{col})"
        );

        let (s_prime, bounced) = self.s_prime_with_bounce(from_state, action);
        if bounced {
            return vec![self.transition(1., self.reward_bounce_back, from_state)];
        }

        let jps = s_prime.jump_probabilities();
        if jps.is_empty() {
            return vec![self.transition(1., s_prime.reward(), s_prime)];
        }

        jps.iter()
            .map(|jp| {
                let target = self.target_state_from_jump_specification(from_state, s_prime, jp.js);
                let reward = match jp.js {
                    JumpSpecification::BounceBack => self.reward_bounce_back,
                    _ => target.reward(),
                };
                self.transition(jp.p, reward, target)
            })
            .collect()
    }

    /// The single outcome of a move that has no stochastic jumps.
    pub fn probe_action(&self, from_state: &State, action: Action) -> (Continous, &State) {
        let transitions = self.probe_action_with_probabilities(from_state, action);
        assert!(
            transitions.len() == 1,
            "probe_action does not support probabilities in target state jump specifications"
        );

        let (row, col) = transitions[0].next_state;
        (transitions[0].reward, self.state(row, col))
    }

    /// New position taking `action` from `from_state`, ignoring jump specifications.
    /// Moving beyond a border bounces back to `from_state`. Any state within the
    /// board is returned, even walls.
    pub fn s_prime_with_bounce(&self, from_state: &State, action: Action) -> (&State, bool) {
        let (row, col) = from_state.position();
        match self.offset((row, col), action.delta()) {
            Some((r, c)) => (self.state(r, c), false),
            None => (self.state(row, col), true),
        }
    }

    pub fn create_q_table_from_uniform(&self, distribution_total: Continous) -> QTable {
        let value_each = distribution_total / 4.;
        QTable::from_shape_fn(self.row_count(), self.col_count(), |(row, col)| {
            if self.maze[[row, col]].is_end() {
                ActionValueList::terminal()
            } else {
                ActionValueList::from_values([value_each; 4])
            }
        })
    }

    /// One step deterministic lookahead: each action is valued `V(s') + R(s')`
    /// of its raw destination, jump specifications ignored.
    pub fn create_q_table_from_v_table(&self, v_table: &VTable) -> QTable {
        assert!(
            self.row_count() == v_table.row_count(),
            "Row count mismatch between maze, vtable"
        );
        assert!(
            self.col_count() == v_table.col_count(),
            "Column count mismatch between maze, vtable"
        );

        QTable::from_shape_fn(self.row_count(), self.col_count(), |(row, col)| {
            let state = &self.maze[[row, col]];
            if state.is_end() {
                return ActionValueList::terminal();
            }

            ActionValueList::from_values(Action::ALL.map(|a| {
                let (s_prime, _) = self.s_prime_with_bounce(state, a);
                v_table[s_prime.position()] + s_prime.reward()
            }))
        })
    }

    fn target_state_from_jump_specification<'a>(
        &'a self,
        from_state: &'a State,
        js_state: &'a State,
        js: JumpSpecification,
    ) -> &'a State {
        let target = match js {
            JumpSpecification::Welcome => js_state,
            JumpSpecification::BounceBack => from_state,
            JumpSpecification::Absolute(row, col) => {
                assert!(
                    row < self.row_count() && col < self.col_count(),
                    "Absolute jump target ({row},{col}) is outside the maze"
                );
                self.state(row, col)
            }
            JumpSpecification::Relative(dr, dc) => {
                let (row, col) = self
                    .offset(js_state.position(), (dr, dc))
                    .unwrap_or_else(|| {
                        panic!(
                            "Relative jump ({dr},{dc}) from {:?} is outside the maze",
                            js_state.position()
                        )
                    });
                self.state(row, col)
            }
        };

        // Only 1-step jumps are supported, i.e. we cannot jump to a state having
        // jump specifications of its own.
        assert!(
            js == JumpSpecification::Welcome || target.is_100_percent_welcoming(),
            "In state {:?}. Target state {:?} was not purely welcoming",
            from_state.position(),
            target.position()
        );
        target
    }

    fn transition(&self, probability: Continous, reward: Continous, next: &State) -> Transition {
        Transition {
            probability,
            reward,
            next_state: next.position(),
            done: next.is_end(),
        }
    }

    fn offset(&self, (row, col): Position, (dr, dc): (isize, isize)) -> Option<Position> {
        let row = row.checked_add_signed(dr)?;
        let col = col.checked_add_signed(dc)?;
        (row < self.row_count() && col < self.col_count()).then_some((row, col))
    }

    fn check_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.row_count() && col < self.col_count(),
            "({row},{col}) is outside the {}x{} maze",
            self.row_count(),
            self.col_count()
        );
    }
}
