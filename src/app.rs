use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::cache::DatasetCache;
use crate::data::filter::filter;
use crate::data::views::{CustomersView, OverviewView, ProductsView};
use crate::settings::Settings;
use crate::state::{DashboardState, Tab};
use crate::ui::panels::MenuAction;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub settings: Settings,
    pub state: DashboardState,
    cache: DatasetCache,
    /// Set when the current path failed to load; cleared by Open/Reload.
    load_error: Option<String>,
}

impl DashboardApp {
    pub fn new(settings: Settings) -> Self {
        let cache = DatasetCache::new(settings.data_path.clone());
        Self {
            settings,
            state: DashboardState::default(),
            cache,
            load_error: None,
        }
    }

    /// Load the dataset on first use; failures are remembered so the file is
    /// not re-read on every frame.
    fn ensure_loaded(&mut self) {
        if self.load_error.is_some() || self.cache.is_loaded() {
            return;
        }
        match self.cache.get() {
            Ok(dataset) => self.state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.state.status_message = Some(format!("Error: {e}"));
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn apply(&mut self, action: MenuAction) {
        match action {
            MenuAction::Open(path) => {
                log::info!("Opening {}", path.display());
                self.cache.set_path(path);
            }
            MenuAction::Reload => self.cache.invalidate(),
        }
        self.load_error = None;
        self.state.criteria = None;
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_loaded();

        let dataset = if self.load_error.is_none() {
            self.cache.get().ok()
        } else {
            None
        };
        let mut action = None;

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui: &mut Ui| {
            action = panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui: &mut Ui| {
                panels::side_panel(ui, &mut self.state, dataset);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            ui.heading("Global Superstore - Interactive Business Dashboard");
            ui.label(
                RichText::new("BI-style dashboard to analyze Sales, Profit, and segment-wise performance.")
                    .color(Color32::GRAY),
            );
            ui.separator();

            let (Some(ds), Some(criteria)) = (dataset, self.state.criteria.as_ref()) else {
                let msg = match &self.load_error {
                    Some(e) => format!(
                        "Could not load {}: {e}\nUse File → Open… to pick another file.",
                        self.cache.path().display()
                    ),
                    None => "Loading…".to_string(),
                };
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading(msg);
                });
                return;
            };

            // Filtered once per frame, after the sidebar has applied its edits.
            let filtered = match filter(ds, criteria) {
                Ok(filtered) => filtered,
                Err(e) => {
                    ui.label(RichText::new(panels::row_counts(ds.len(), 0)).color(Color32::GRAY));
                    ui.label(RichText::new(e.to_string()).color(Color32::from_rgb(0xd9, 0x8c, 0x00)));
                    return;
                }
            };
            ui.label(RichText::new(panels::row_counts(ds.len(), filtered.len())).color(Color32::GRAY));

            ui.horizontal(|ui: &mut Ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.state.active_tab, tab, tab.label());
                }
            });
            ui.separator();

            let limits = self.settings.view_limits();
            match self.state.active_tab {
                Tab::Overview => {
                    egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                        charts::overview(ui, &OverviewView::build(&filtered), criteria);
                    });
                }
                Tab::Customers => {
                    egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                        charts::customers(ui, &CustomersView::build(&filtered, &limits));
                    });
                }
                Tab::Products => {
                    egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                        charts::products(ui, &ProductsView::build(&filtered, &limits));
                    });
                }
                Tab::Data => {
                    if let Some(msg) = table::data_tab(ui, ds, &filtered, &self.settings) {
                        self.state.status_message = Some(msg);
                    }
                }
            }
        });

        if let Some(action) = action {
            self.apply(action);
        }
    }
}
