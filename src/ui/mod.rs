//! egui rendering of the dashboard. Everything here reads pipeline output;
//! state changes go through [`crate::state::DashboardState`].

pub mod charts;
pub mod panels;
pub mod table;
