use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

use crate::color::CountGradient;
use crate::state::{AppState, Distribution};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Ranking panels (top neighborhoods, top categories)
// ---------------------------------------------------------------------------

/// Render every ranking panel with its own N selector.
pub fn rankings(ui: &mut Ui, state: &mut AppState) {
    let gradient = CountGradient::default();
    let scope = state.rank_scope.label();

    for idx in 0..state.rankings.len() {
        let panel = &state.rankings[idx];
        let dimension = panel.dimension;
        let mut n = panel.n;
        let max_n = panel.distinct.max(1);

        ui.horizontal(|ui: &mut Ui| {
            ui.heading(format!("Top {n} {dimension} values ({scope})"));
            ui.add(
                egui::DragValue::new(&mut n)
                    .range(1..=max_n)
                    .speed(0.2)
                    .prefix("N = "),
            );
        });
        if n != state.rankings[idx].n {
            state.set_top_n(idx, n);
        }

        match &state.rankings[idx].result {
            Ok(result) if result.is_empty() => {
                ui.label("No incidents to rank.");
            }
            Ok(result) => {
                let max = result.max_count();
                let bars: Vec<Bar> = result
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, (value, count))| {
                        Bar::new(i as f64, *count as f64)
                            .name(format!("{value}: {count}"))
                            .fill(gradient.color_for(*count, max))
                            .width(0.8)
                    })
                    .collect();

                Plot::new(("ranking", dimension))
                    .height(CHART_HEIGHT)
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .y_axis_label("Count")
                    .show(ui, |plot_ui| {
                        plot_ui.bar_chart(BarChart::new(bars).name(dimension.column_name()));
                    });

                egui::Grid::new(("ranking_table", dimension))
                    .striped(true)
                    .show(ui, |ui: &mut Ui| {
                        for (rank, (value, count)) in result.entries.iter().enumerate() {
                            ui.label(format!("{}.", rank + 1));
                            ui.label(value.as_str());
                            ui.label(count.to_string());
                            ui.end_row();
                        }
                    });
            }
            Err(e) => {
                ui.label(RichText::new(e.to_string()).color(Color32::RED));
            }
        }
        ui.add_space(12.0);
    }
}

// ---------------------------------------------------------------------------
// Distribution charts over the filtered subset
// ---------------------------------------------------------------------------

/// Render the day-of-week, date, category and subcategory charts.
pub fn distributions(ui: &mut Ui, state: &AppState) {
    if state.distributions.is_empty() {
        ui.label("Open a file to see distributions.");
        return;
    }
    for dist in &state.distributions {
        ui.heading(format!("Incidents per {}", dist.dimension));
        if dist.table.is_empty() {
            ui.label("No incidents match the filters.");
        } else if dist.by_value {
            time_series(ui, dist);
        } else {
            frequency_bars(ui, dist);
        }
        ui.add_space(12.0);
    }
}

fn frequency_bars(ui: &mut Ui, dist: &Distribution) {
    let bars: Vec<Bar> = dist
        .table
        .entries()
        .iter()
        .enumerate()
        .map(|(i, (value, count))| {
            Bar::new(i as f64, *count as f64)
                .name(format!("{value}: {count}"))
                .width(0.8)
        })
        .collect();

    Plot::new(("distribution", dist.dimension))
        .height(CHART_HEIGHT)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(dist.dimension.column_name())
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

/// Counts in value order, one point per distinct value (e.g. per day).
fn time_series(ui: &mut Ui, dist: &Distribution) {
    let entries = dist.table.entries();
    let points: PlotPoints = entries
        .iter()
        .enumerate()
        .map(|(i, (_, count))| [i as f64, *count as f64])
        .collect();

    if let (Some((first, _)), Some((last, _))) = (entries.first(), entries.last()) {
        ui.label(format!("{first} … {last}"));
    }

    Plot::new(("distribution", dist.dimension))
        .height(CHART_HEIGHT)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name(dist.dimension.column_name())
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
        });
}
