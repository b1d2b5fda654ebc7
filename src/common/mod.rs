pub mod defs;
pub mod math;
pub mod sampling;
