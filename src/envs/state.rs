use crate::common::defs::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SPACE_REWARD: Continous = -1.;
pub const DEFAULT_END_REWARD: Continous = 0.;
pub const DEFAULT_HOLE_REWARD: Continous = -100.;
pub const DEFAULT_WALL_REWARD: Continous = -1.;

/// What happens when an agent attempts to enter a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpSpecification {
    /// Entry is accepted.
    Welcome,
    /// Entry is rejected, the agent stays where it came from (e.g. a wall).
    BounceBack,
    /// Teleport to an offset from the entered cell.
    Relative(isize, isize),
    /// Teleport to a fixed cell.
    Absolute(usize, usize),
}

impl fmt::Display for JumpSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpSpecification::Welcome => write!(f, "Welcome"),
            JumpSpecification::BounceBack => write!(f, "BounceBack"),
            JumpSpecification::Relative(r, c) => write!(f, "Relative ({r},{c})"),
            JumpSpecification::Absolute(r, c) => write!(f, "Absolute ({r},{c})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpProbability {
    pub js: JumpSpecification,
    pub p: Continous,
}

impl JumpProbability {
    pub fn new(js: JumpSpecification, p: Continous) -> Self {
        Self { js, p }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Space,
    Start,
    End,
    Hole,
    Wall,
    BounceBack,
}

impl StateKind {
    /// One letter used when dumping a maze.
    pub fn tag(&self) -> char {
        match self {
            StateKind::Space => '.',
            StateKind::Start => 'S',
            StateKind::End => 'G',
            StateKind::Hole => 'H',
            StateKind::Wall => 'W',
            StateKind::BounceBack => 'B',
        }
    }
}

/// A cell of the maze.
///
/// States are owned by value by the [`GridMazeEnvironment`](super::grid_maze::GridMazeEnvironment)
/// grid, which stamps their position when they are placed.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    kind: StateKind,
    position: Option<Position>,
    reward: Continous,
    /// false if there is no V or Q value for this state (e.g. final state, wall).
    is_visitable: bool,
    is_start: bool,
    is_end: bool,
    /// Empty is the same as a single Welcome with probability 1.
    jump_probabilities: Vec<JumpProbability>,
}

impl State {
    pub fn new(
        kind: StateKind,
        reward: Continous,
        jump_probabilities: Vec<JumpProbability>,
        is_visitable: bool,
        is_start: bool,
        is_end: bool,
    ) -> Self {
        let mut state = Self {
            kind,
            position: None,
            reward,
            is_visitable,
            is_start,
            is_end,
            jump_probabilities: vec![],
        };
        state.set_jump_probabilities(jump_probabilities);
        state
    }

    pub fn space(reward: Continous) -> Self {
        Self::new(StateKind::Space, reward, vec![], true, false, false)
    }

    pub fn start() -> Self {
        Self::new(
            StateKind::Start,
            DEFAULT_SPACE_REWARD,
            vec![],
            true,
            true,
            false,
        )
    }

    pub fn end() -> Self {
        Self::new(
            StateKind::End,
            DEFAULT_END_REWARD,
            vec![JumpProbability::new(JumpSpecification::Welcome, 1.)],
            false,
            false,
            true,
        )
    }

    pub fn hole() -> Self {
        Self::new(
            StateKind::Hole,
            DEFAULT_HOLE_REWARD,
            vec![JumpProbability::new(JumpSpecification::Welcome, 1.)],
            false,
            false,
            true,
        )
    }

    pub fn wall() -> Self {
        Self::new(
            StateKind::Wall,
            DEFAULT_WALL_REWARD,
            vec![JumpProbability::new(JumpSpecification::BounceBack, 1.)],
            false,
            false,
            false,
        )
    }

    pub fn bounce_back() -> Self {
        Self::new(
            StateKind::BounceBack,
            DEFAULT_WALL_REWARD,
            vec![JumpProbability::new(JumpSpecification::BounceBack, 1.)],
            false,
            false,
            false,
        )
    }

    /// Build a preset of the given kind with its default reward.
    pub fn of_kind(kind: StateKind) -> Self {
        match kind {
            StateKind::Space => Self::space(DEFAULT_SPACE_REWARD),
            StateKind::Start => Self::start(),
            StateKind::End => Self::end(),
            StateKind::Hole => Self::hole(),
            StateKind::Wall => Self::wall(),
            StateKind::BounceBack => Self::bounce_back(),
        }
    }

    pub fn with_reward(mut self, reward: Continous) -> Self {
        self.reward = reward;
        self
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn reward(&self) -> Continous {
        self.reward
    }

    pub fn is_visitable(&self) -> bool {
        self.is_visitable
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_end(&self) -> bool {
        self.is_end
    }

    pub fn position(&self) -> Position {
        self.position.unwrap_or_else(|| {
            panic!(
                "State '{}' has not been placed in a maze",
                self.kind.tag()
            )
        })
    }

    pub(crate) fn place(&mut self, row: usize, col: usize) {
        self.position = Some((row, col));
    }

    pub fn jump_probabilities(&self) -> &[JumpProbability] {
        &self.jump_probabilities
    }

    /// Defines probability and behavior when attempting to enter this state.
    pub fn set_jump_probabilities(&mut self, jump_probabilities: Vec<JumpProbability>) {
        if !jump_probabilities.is_empty() {
            assert!(
                jump_probabilities.iter().all(|jp| jp.p >= 0.),
                "Jump probabilities must be non-negative: {jump_probabilities:?}"
            );
            let sum = jump_probabilities.iter().map(|jp| jp.p).sum::<Continous>();
            assert!(
                (sum - 1.).abs() <= PROBABILITY_TOLERANCE,
                "Jump probabilities don't sum to 1.0, got: {sum}"
            );
        }

        self.jump_probabilities = jump_probabilities;
    }

    /// True if entering this state never redirects the agent.
    pub fn is_100_percent_welcoming(&self) -> bool {
        match self.jump_probabilities.as_slice() {
            [] => true,
            [jp] if jp.js == JumpSpecification::Welcome => {
                assert!(
                    (jp.p - 1.).abs() <= PROBABILITY_TOLERANCE,
                    "Single welcome requires 1.0 probability, got: {}",
                    jp.p
                );
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(State::space(-1.), true, false, false, -1., true)]
    #[case(State::start(), true, true, false, -1., true)]
    #[case(State::end(), false, false, true, 0., true)]
    #[case(State::hole(), false, false, true, -100., true)]
    #[case(State::wall(), false, false, false, -1., false)]
    #[case(State::bounce_back(), false, false, false, -1., false)]
    fn presets(
        #[case] state: State,
        #[case] is_visitable: bool,
        #[case] is_start: bool,
        #[case] is_end: bool,
        #[case] reward: f64,
        #[case] welcoming: bool,
    ) {
        assert_eq!(state.is_visitable(), is_visitable);
        assert_eq!(state.is_start(), is_start);
        assert_eq!(state.is_end(), is_end);
        assert_eq!(state.reward(), reward);
        assert_eq!(state.is_100_percent_welcoming(), welcoming);
    }

    #[rstest]
    #[case(vec![], true)]
    #[case(vec![JumpProbability::new(JumpSpecification::Welcome, 1.)], true)]
    #[case(vec![JumpProbability::new(JumpSpecification::BounceBack, 1.)], false)]
    #[case(vec![JumpProbability::new(JumpSpecification::Relative(1, 0), 1.)], false)]
    #[case(vec![JumpProbability::new(JumpSpecification::Absolute(0, 0), 1.)], false)]
    #[case(
        vec![
            JumpProbability::new(JumpSpecification::Relative(1, 0), 0.5),
            JumpProbability::new(JumpSpecification::Welcome, 0.5),
        ],
        false
    )]
    fn welcoming_classification(#[case] jumps: Vec<JumpProbability>, #[case] expected: bool) {
        let mut state = State::space(-1.);
        state.set_jump_probabilities(jumps);

        assert_eq!(state.is_100_percent_welcoming(), expected);
    }

    #[test]
    fn probabilities_within_tolerance_are_accepted() {
        let mut state = State::space(-1.);
        state.set_jump_probabilities(vec![
            JumpProbability::new(JumpSpecification::Welcome, 0.1),
            JumpProbability::new(JumpSpecification::Welcome, 0.2),
            JumpProbability::new(JumpSpecification::BounceBack, 0.7),
        ]);

        assert_eq!(state.jump_probabilities().len(), 3);
    }

    #[test]
    #[should_panic(expected = "don't sum to 1.0")]
    fn probabilities_must_sum_to_one() {
        let mut state = State::space(-1.);
        state.set_jump_probabilities(vec![
            JumpProbability::new(JumpSpecification::Relative(1, 0), 0.5),
            JumpProbability::new(JumpSpecification::Welcome, 0.4),
        ]);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_probabilities_are_rejected() {
        State::space(-1.).set_jump_probabilities(vec![
            JumpProbability::new(JumpSpecification::Welcome, 1.5),
            JumpProbability::new(JumpSpecification::BounceBack, -0.5),
        ]);
    }

    #[test]
    fn jump_list_can_be_cleared() {
        let mut state = State::wall();
        state.set_jump_probabilities(vec![]);

        assert!(state.is_100_percent_welcoming());
    }

    #[test]
    #[should_panic(expected = "has not been placed")]
    fn unplaced_state_has_no_position() {
        State::start().position();
    }

    #[test]
    fn with_reward_overrides_preset() {
        let end = State::end().with_reward(10.);

        assert_eq!(end.reward(), 10.);
        assert_eq!(end.kind(), StateKind::End);
    }

    #[test]
    fn jump_specifications_display() {
        assert_eq!(JumpSpecification::Welcome.to_string(), "Welcome");
        assert_eq!(JumpSpecification::BounceBack.to_string(), "BounceBack");
        assert_eq!(JumpSpecification::Relative(1, -2).to_string(), "Relative (1,-2)");
        assert_eq!(JumpSpecification::Absolute(3, 4).to_string(), "Absolute (3,4)");
    }
}
