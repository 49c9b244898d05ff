pub mod actions;
pub mod app;
pub mod edit_sheet;
pub mod table;
pub mod toolbar;
