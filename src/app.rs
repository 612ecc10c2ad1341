use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AnimeDashboardApp {
    pub state: AppState,
}

impl AnimeDashboardApp {
    /// Build the app and load the configured dataset once for the session.
    pub fn new(config: &AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.load(&config.data_path);
        Self { state }
    }
}

impl eframe::App for AnimeDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sidebar ----
        egui::SidePanel::left("explore_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, tabs, footer ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Anime Dataset Dashboard");
                    ui.add_space(4.0);

                    if self.state.dataset.is_none() {
                        ui.label("Open a file to explore anime  (File → Open…)");
                    } else {
                        panels::raw_data(ui, &self.state);
                        panels::metric_tiles(ui, &self.state.views.metrics);
                        ui.add_space(8.0);
                        tabs::tab_bar(ui, &mut self.state);
                        tabs::active_tab(ui, &mut self.state);
                    }

                    ui.add_space(12.0);
                    panels::footer(ui);
                });
        });
    }
}
