pub mod model_based;
pub mod model_free;
pub mod stop_condition;
