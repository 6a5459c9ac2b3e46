use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const HEADERS: [&str; 10] = [
    "Incident Date",
    "Year",
    "Day of Week",
    "Category",
    "Subcategory",
    "Police District",
    "Neighborhood",
    "Supervisor District",
    "Latitude",
    "Longitude",
];

/// Virtualised table of the filtered incidents.
pub fn subset_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.label("Open a file to see incidents.");
        return;
    };

    let records = dataset.records();
    let indices = state.subset.indices();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), HEADERS.len())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let Some(rec) = indices.get(row.index()).and_then(|&i| records.get(i)) else {
                    return;
                };
                let cells = [
                    rec.incident_date.clone(),
                    rec.incident_year.to_string(),
                    rec.day_of_week.clone(),
                    rec.category.clone(),
                    rec.subcategory.clone(),
                    rec.police_district.clone(),
                    rec.neighborhood.clone(),
                    rec.supervisor_district.clone(),
                    format!("{:.5}", rec.latitude),
                    format!("{:.5}", rec.longitude),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
