use eframe::egui::{self, ScrollArea, Ui};

use crate::data::export::{export_to_path, preview};
use crate::data::filter::Filtered;
use crate::data::model::Dataset;
use crate::settings::Settings;

/// Render the Data tab: a preview of the filtered rows and the CSV download.
///
/// Returns a status message when a download was attempted.
pub fn data_tab(ui: &mut Ui, dataset: &Dataset, data: &Filtered<'_>, settings: &Settings) -> Option<String> {
    let mut status = None;

    ui.heading("Filtered Data View");
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "Showing {} of {} rows",
            data.len().min(settings.preview_rows),
            data.len()
        ));
        if ui.button("Download Filtered CSV").clicked() {
            status = download(dataset, data, settings);
        }
    });
    ui.separator();

    let (header, rows) = preview(dataset, data, settings.preview_rows);
    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("data_preview")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for name in &header {
                        ui.strong(name);
                    }
                    ui.end_row();
                    for row in &rows {
                        for cell in row {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });

    status
}

fn download(dataset: &Dataset, data: &Filtered<'_>, settings: &Settings) -> Option<String> {
    let path = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(settings.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file()?;

    match export_to_path(dataset, data, &path) {
        Ok(()) => Some(format!("Saved {} rows to {}", data.len(), path.display())),
        Err(e) => {
            log::error!("Export failed: {e:#}");
            Some(format!("Error: {e:#}"))
        }
    }
}
