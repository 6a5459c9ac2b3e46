use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::RankScope;
use crate::data::model::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        if !state.filters.is_empty() && ui.small_button("Clear all").clicked() {
            state.clear_all_filters();
        }
    });
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Collect option lists up front so we can mutate state inside the loop.
    let options: Vec<(Dimension, Vec<String>)> = state
        .config
        .filter_dimensions
        .iter()
        .map(|&dim| (dim, dataset.unique_values(dim).to_vec()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (dim, values) in &options {
                filter_section(ui, state, *dim, values);
            }

            if !state.rejected.is_empty() {
                ui.separator();
                rejected_rows(ui, state);
            }
        });
}

const MAX_REJECTED_SHOWN: usize = 200;

/// Rows the projector dropped, so data loss is visible.
fn rejected_rows(ui: &mut Ui, state: &AppState) {
    let header = format!("Dropped rows ({})", state.rejected.len());
    egui::CollapsingHeader::new(RichText::new(header).color(Color32::YELLOW))
        .id_salt("rejected_rows")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for rejected in state.rejected.iter().take(MAX_REJECTED_SHOWN) {
                ui.label(format!("Row {}: {}", rejected.row, rejected.reason));
            }
            if state.rejected.len() > MAX_REJECTED_SHOWN {
                ui.label(format!("… and {} more", state.rejected.len() - MAX_REJECTED_SHOWN));
            }
        });
}

/// One collapsible multi-select for a dimension.
fn filter_section(ui: &mut Ui, state: &mut AppState, dim: Dimension, values: &[String]) {
    // Show count of selected / total in the header
    let n_selected = state.filters.selection(dim).map_or(0, |s| s.len());
    let header_text = if n_selected == 0 {
        format!("{dim}  (any of {})", values.len())
    } else {
        format!("{dim}  ({n_selected}/{})", values.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(dim)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                let search = state.filter_search.entry(dim).or_default();
                ui.add(egui::TextEdit::singleline(search).hint_text("Search…"));
                if ui.small_button("Clear").clicked() {
                    state.clear_filter(dim);
                }
            });

            let needle = state
                .filter_search
                .get(&dim)
                .map(|s| s.to_lowercase())
                .unwrap_or_default();

            ScrollArea::vertical()
                .id_salt(("filter_values", dim))
                .max_height(220.0)
                .show(ui, |ui: &mut Ui| {
                    for val in values {
                        if !needle.is_empty() && !val.to_lowercase().contains(&needle) {
                            continue;
                        }
                        let mut checked = state.filters.is_selected(dim, val);
                        if ui.checkbox(&mut checked, val.as_str()).changed() {
                            state.toggle_filter_value(dim, val);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.dataset.is_some() {
            ui.label(state.summary.to_string());
            ui.separator();

            ui.label("Rank over:");
            for scope in [RankScope::Subset, RankScope::Dataset] {
                if ui
                    .selectable_label(state.rank_scope == scope, scope.label())
                    .clicked()
                {
                    state.set_rank_scope(scope);
                }
            }
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open incident reports")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
