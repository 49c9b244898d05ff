pub mod data_model;
pub mod edit_session;
pub mod filter;
pub mod record_store;
pub mod render_planner;
pub mod table_state;
