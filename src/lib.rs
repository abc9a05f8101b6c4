pub mod app;
pub mod color;
pub mod data;
pub mod settings;
pub mod state;
pub mod ui;
