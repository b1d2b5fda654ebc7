pub type Continous = f64;

/// (row, col) of a cell in the maze.
pub type Position = (usize, usize);

/// Tolerance used when checking that a probability distribution sums to 1.
pub const PROBABILITY_TOLERANCE: Continous = 1e-9;
