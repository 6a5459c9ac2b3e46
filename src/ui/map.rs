use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::state::AppState;

/// Scatter of the filtered incidents by longitude / latitude, one series per
/// category so the legend doubles as a colour key.
pub fn incident_map(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.label("Open a file to see incident locations.");
        return;
    };

    let mut by_category: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for rec in state.subset.records(dataset) {
        by_category
            .entry(rec.category.as_str())
            .or_default()
            .push([rec.longitude, rec.latitude]);
    }

    ui.label(format!("{} incident locations", state.subset.len()));

    Plot::new("incident_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show(ui, |plot_ui| {
            for (category, coords) in by_category {
                let points: PlotPoints = coords.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(category)
                        .color(state.category_colors.color_for(category))
                        .radius(1.5),
                );
            }
        });
}
