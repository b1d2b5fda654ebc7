pub mod action;
pub mod grid_maze;
pub mod state;
