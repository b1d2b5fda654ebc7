use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Left,
    Up,
    Down,
    Right,
}

impl Action {
    /// All actions, in the order tables store them.
    pub const ALL: [Action; 4] = [Action::Left, Action::Up, Action::Down, Action::Right];

    /// (row, col) displacement of a single step.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Action::Left => (0, -1),
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Right => (0, 1),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Action::Left => '<',
            Action::Up => 'A',
            Action::Down => 'V',
            Action::Right => '>',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
