pub mod q_table;
pub mod v_table;
