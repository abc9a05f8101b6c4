use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::{Dataset, Dimension};
use crate::state::DashboardState;

/// Requests from the top bar that the app root carries out.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    Open(PathBuf),
    Reload,
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the sidebar filters.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState, dataset: Option<&Dataset>) {
    ui.heading("Dashboard Filters");
    ui.separator();

    let (Some(dataset), Some(criteria)) = (dataset, state.criteria.as_ref()) else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Order date range ----
    let mut start = criteria.date_range.start;
    let mut end = criteria.date_range.end;
    let start_key = state.widget_key("date_start");
    let end_key = state.widget_key("date_end");

    ui.strong("Order Date Range");
    let mut dates_changed = false;
    egui::Grid::new(state.widget_key("date_grid"))
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            dates_changed |= ui.add(DatePickerButton::new(&mut start).id_salt(&start_key)).changed();
            ui.end_row();
            ui.label("To");
            dates_changed |= ui.add(DatePickerButton::new(&mut end).id_salt(&end_key)).changed();
            ui.end_row();
        });
    if dates_changed {
        state.set_date_range(dataset, Some(start), Some(end));
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::FILTERS {
                dimension_filter(ui, state, dataset, dim);
            }
        });

    ui.separator();
    if ui.button("Reset Filters").clicked() {
        state.reset(dataset);
    }
}

/// Collapsible multi-select for one dimension.
fn dimension_filter(ui: &mut Ui, state: &mut DashboardState, dataset: &Dataset, dim: Dimension) {
    let all_values = dataset.options_for(dim);
    let n_selected = state
        .criteria
        .as_ref()
        .and_then(|c| c.selected(dim))
        .map_or(0, |s| s.len());
    let header_text = format!("{dim}  ({n_selected}/{})", all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(state.widget_key(dim.column_name()))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dataset, dim);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dim);
                }
            });

            for value in &all_values {
                let mut checked = state
                    .criteria
                    .as_ref()
                    .and_then(|c| c.selected(dim))
                    .is_some_and(|s| s.contains(value));
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    state.toggle_filter_value(dim, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &DashboardState) -> Option<MenuAction> {
    let mut action = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                action = open_file_dialog().map(MenuAction::Open);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                action = Some(MenuAction::Reload);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    action
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("CSV", &["csv"])
        .pick_file()
}

/// Row counts shown above the tabs.
pub fn row_counts(total: usize, visible: usize) -> String {
    format!("{total} rows loaded, {visible} match the filters")
}
