use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Rankings,
    Distributions,
    Map,
    Table,
}

pub struct IncidentExplorerApp {
    pub state: AppState,
    tab: Tab,
}

impl IncidentExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            tab: Tab::default(),
        }
    }
}

impl eframe::App for IncidentExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a file to explore incidents  (File → Open…)");
                });
                return;
            }

            ui.horizontal(|ui: &mut Ui| {
                ui.selectable_value(&mut self.tab, Tab::Rankings, "Rankings");
                ui.selectable_value(&mut self.tab, Tab::Distributions, "Distributions");
                ui.selectable_value(&mut self.tab, Tab::Map, "Map");
                ui.selectable_value(&mut self.tab, Tab::Table, "Table");
            });
            ui.separator();

            match self.tab {
                Tab::Rankings => {
                    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                        charts::rankings(ui, &mut self.state);
                    });
                }
                Tab::Distributions => {
                    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                        charts::distributions(ui, &self.state);
                    });
                }
                Tab::Map => map::incident_map(ui, &self.state),
                Tab::Table => table::subset_table(ui, &self.state),
            }
        });
    }
}
