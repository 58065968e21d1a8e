pub mod setup;
pub mod ui;
