use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Filtered preview (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered rows, or the raw preview of a rejected file.
pub fn preview(ui: &mut Ui, state: &AppState) {
    if let Some(rejected) = &state.rejected {
        ui.label(RichText::new("Raw preview (first rows, not validated)").strong());
        let rows: Vec<usize> = (0..rejected.preview.len()).collect();
        table_view(ui, "rejected_preview", &rejected.preview, &rows);
        return;
    }

    let Some(ds) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to start  (File → Open…, or drop it here)");
        });
        return;
    };

    if ds.is_empty() {
        ui.label("The file has a header but no data rows.");
        return;
    }

    ui.label(format!(
        "Matching rows: {} / {}",
        state.visible_indices.len(),
        ds.len()
    ));
    ui.separator();
    table_view(ui, "filtered_preview", &ds.table, &state.visible_indices);
}

/// Render `rows` of `table` with one column per header.
fn table_view(ui: &mut Ui, id: &str, table: &Table, rows: &[usize]) {
    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(
                    Column::initial(120.0).at_least(40.0).clip(true),
                    table.headers.len(),
                )
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    for name in &table.headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let cells = &table.rows[rows[row.index()]];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.add(egui::Label::new(cell.as_str()).truncate());
                            });
                        }
                    });
                });
        });
    });
}
