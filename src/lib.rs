extern crate itertools;
extern crate ndarray;
extern crate rand;
extern crate serde;
extern crate serde_json;
extern crate tracing;

pub mod algos;
pub mod common;
pub mod config;
pub mod envs;
pub mod tables;
pub mod ui;

pub use algos::{
    model_based::value_iteration::ValueIteration,
    model_free::{policy::*, q_learning::*},
    stop_condition::*,
};
pub use common::defs::*;
pub use config::*;
pub use envs::{action::Action, grid_maze::*, state::*};
pub use tables::{q_table::*, v_table::VTable};
pub use ui::{render_maze_and_tables, RenderOptions};
