pub mod policy;
pub mod q_learning;
